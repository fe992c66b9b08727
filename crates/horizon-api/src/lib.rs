// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use horizon_app::{InquiryPayload, InquiryReceipt, Project, RemoteFailure};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

const PROJECTS_PATH: &str = "/api/projects";
const FEATURED_PROJECTS_PATH: &str = "/api/projects/featured";
const SERVICE_INQUIRY_PATH: &str = "/api/service-inquiry";
const HEALTH_PATH: &str = "/api/health";

/// Blocking client for the portfolio backend. Every call is bounded by the
/// optional timeout; without one the request waits on the server.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Option<Duration>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        // The blocking builder defaults to 30s, so `None` has to be passed explicitly.
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn fetch_projects(&self) -> Result<Vec<Project>, RemoteFailure> {
        self.get_projects(PROJECTS_PATH)
    }

    pub fn fetch_featured_projects(&self) -> Result<Vec<Project>, RemoteFailure> {
        self.get_projects(FEATURED_PROJECTS_PATH)
    }

    pub fn submit_inquiry(
        &self,
        payload: &InquiryPayload,
    ) -> Result<InquiryReceipt, RemoteFailure> {
        let endpoint = self.endpoint(SERVICE_INQUIRY_PATH);
        debug!(%endpoint, service_type = %payload.service_type, "submitting inquiry");
        let response = self
            .http
            .post(&endpoint)
            .json(payload)
            .send()
            .map_err(|error| transport_failure(&endpoint, &error))?;
        let (status, body) = read_body(&endpoint, response)?;
        decode_inquiry_ack(&endpoint, status, &body)
    }

    /// Probes the health endpoint. Any 2xx counts as healthy.
    pub fn health(&self) -> Result<(), RemoteFailure> {
        let endpoint = self.endpoint(HEALTH_PATH);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .map_err(|error| transport_failure(&endpoint, &error))?;
        let (status, body) = read_body(&endpoint, response)?;
        if !status.is_success() {
            return Err(status_failure(&endpoint, status, &body));
        }
        Ok(())
    }

    fn get_projects(&self, path: &str) -> Result<Vec<Project>, RemoteFailure> {
        let endpoint = self.endpoint(path);
        debug!(%endpoint, "fetching projects");
        let response = self
            .http
            .get(&endpoint)
            .send()
            .map_err(|error| transport_failure(&endpoint, &error))?;
        let (status, body) = read_body(&endpoint, response)?;
        let projects = decode_projects(&endpoint, status, &body)?;
        debug!(%endpoint, count = projects.len(), "projects decoded");
        Ok(projects)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Trims trailing slashes and rejects anything that is not an absolute
/// http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("api.base_url must not be empty");
    }
    let parsed = Url::parse(trimmed)
        .with_context(|| format!("api.base_url {trimmed:?} is not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "api.base_url must use http or https, got {:?} -- use e.g. http://localhost:3001",
            parsed.scheme()
        );
    }
    Ok(trimmed.to_owned())
}

/// Validates a projects envelope. Anything other than a 2xx with
/// `success: true` and a well-formed `data` array is a protocol failure.
pub fn decode_projects(
    endpoint: &str,
    status: StatusCode,
    body: &str,
) -> Result<Vec<Project>, RemoteFailure> {
    if !status.is_success() {
        return Err(status_failure(endpoint, status, body));
    }
    let envelope: ProjectsEnvelope = serde_json::from_str(body)
        .map_err(|error| RemoteFailure::protocol(endpoint, format!("decode projects: {error}")))?;
    if !envelope.success {
        return Err(RemoteFailure::protocol(
            endpoint,
            rejection_detail(envelope.message.as_deref()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| RemoteFailure::protocol(endpoint, "response is missing `data`"))
}

pub fn decode_inquiry_ack(
    endpoint: &str,
    status: StatusCode,
    body: &str,
) -> Result<InquiryReceipt, RemoteFailure> {
    if !status.is_success() {
        return Err(status_failure(endpoint, status, body));
    }
    let ack: AckEnvelope = serde_json::from_str(body).map_err(|error| {
        RemoteFailure::protocol(endpoint, format!("decode acknowledgement: {error}"))
    })?;
    if !ack.success {
        return Err(RemoteFailure::protocol(
            endpoint,
            rejection_detail(ack.message.as_deref()),
        ));
    }
    Ok(InquiryReceipt {
        message: ack.message.filter(|message| !message.trim().is_empty()),
    })
}

fn read_body(endpoint: &str, response: Response) -> Result<(StatusCode, String), RemoteFailure> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|error| transport_failure(endpoint, &error))?;
    debug!(%endpoint, status = status.as_u16(), bytes = body.len(), "response received");
    Ok((status, body))
}

fn transport_failure(endpoint: &str, error: &reqwest::Error) -> RemoteFailure {
    let detail = if error.is_timeout() {
        format!("timed out ({error})")
    } else {
        error.to_string()
    };
    warn!(%endpoint, %detail, "request did not complete");
    RemoteFailure::transport(endpoint, detail)
}

fn status_failure(endpoint: &str, status: StatusCode, body: &str) -> RemoteFailure {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = parsed
            .error
            .or(parsed.message)
            .filter(|message| !message.trim().is_empty());
        if let Some(message) = message {
            return RemoteFailure::protocol(
                endpoint,
                format!("server error ({}): {message}", status.as_u16()),
            );
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return RemoteFailure::protocol(
            endpoint,
            format!("server error ({}): {}", status.as_u16(), body.trim()),
        );
    }

    RemoteFailure::protocol(endpoint, format!("server returned {}", status.as_u16()))
}

fn rejection_detail(message: Option<&str>) -> String {
    match message.map(str::trim).filter(|message| !message.is_empty()) {
        Some(message) => format!("server rejected the request: {message}"),
        None => "server rejected the request".to_owned(),
    }
}

#[derive(Debug, Deserialize)]
struct ProjectsEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<Project>>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
