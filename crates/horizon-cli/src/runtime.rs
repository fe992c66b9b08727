// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use horizon_api::Client;
use horizon_app::{
    InquiryPayload, InquiryReceipt, LoadTicket, PendingSubmission, Project, RemoteFailure,
};
use horizon_testkit::PortfolioFaker;
use horizon_tui::{AppRuntime, CompletionGuard, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info};

pub const DEMO_SEED: u64 = 42;
const DEMO_PROJECTS: usize = 18;

/// Talks to the portfolio backend. Requests run on worker threads so the
/// event loop keeps drawing while they are in flight.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for ApiRuntime {
    fn fetch_projects(&mut self) -> Result<Vec<Project>, RemoteFailure> {
        self.client.fetch_projects()
    }

    fn submit_inquiry(
        &mut self,
        payload: &InquiryPayload,
    ) -> Result<InquiryReceipt, RemoteFailure> {
        self.client.submit_inquiry(payload)
    }

    fn spawn_fetch(&mut self, ticket: LoadTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name("horizon-fetch".to_owned())
            .spawn(move || {
                let completion = CompletionGuard::load(ticket, tx);
                let result = client.fetch_projects();
                if let Err(error) = completion.complete(InternalEvent::CatalogLoaded { ticket, result })
                {
                    debug!(%error, "catalog result dropped");
                }
            })
            .context("spawn catalog fetch worker")?;
        Ok(())
    }

    fn spawn_submission(
        &mut self,
        pending: PendingSubmission,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name("horizon-inquiry".to_owned())
            .spawn(move || {
                let token = pending.token;
                let completion = CompletionGuard::submission(token, tx);
                let result = client.submit_inquiry(&pending.payload);
                if let Err(error) = completion.complete(InternalEvent::InquiryResolved { token, result })
                {
                    debug!(%error, "inquiry result dropped");
                }
            })
            .context("spawn inquiry worker")?;
        Ok(())
    }
}

/// Offline runtime: serves a deterministic catalog and accepts every
/// inquiry without sending it anywhere.
pub struct DemoRuntime {
    collection: Vec<Project>,
}

impl DemoRuntime {
    pub fn new(seed: u64) -> Self {
        let mut faker = PortfolioFaker::new(seed);
        Self {
            collection: faker.collection(DEMO_PROJECTS),
        }
    }

    pub fn collection(&self) -> &[Project] {
        &self.collection
    }

    pub fn featured(&self) -> Vec<Project> {
        self.collection
            .iter()
            .filter(|project| project.featured)
            .cloned()
            .collect()
    }
}

impl AppRuntime for DemoRuntime {
    fn fetch_projects(&mut self) -> Result<Vec<Project>, RemoteFailure> {
        Ok(self.collection.clone())
    }

    fn submit_inquiry(
        &mut self,
        payload: &InquiryPayload,
    ) -> Result<InquiryReceipt, RemoteFailure> {
        info!(service_type = %payload.service_type, "demo inquiry accepted locally");
        Ok(InquiryReceipt {
            message: Some("Demo mode: inquiry kept on this machine".to_owned()),
        })
    }
}
