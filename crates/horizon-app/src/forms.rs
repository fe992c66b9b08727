// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    ContactMethod, NotificationSink, RemoteFailure, ServiceOffering, find_service,
    inquiry_failure_notice, inquiry_success_notice,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub message: String,
    pub preferred_contact_method: ContactMethod,
}

/// Free-text and pick-list fields the user edits directly. `project_type`
/// is only reachable through service selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryField {
    Name,
    Email,
    Phone,
    Company,
    Budget,
    Timeline,
    Message,
}

impl InquiryField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Company,
        Self::Budget,
        Self::Timeline,
        Self::Message,
    ];

    pub const REQUIRED: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Company => "Company Name",
            Self::Budget => "Budget Range",
            Self::Timeline => "Timeline",
            Self::Message => "Project Details",
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::Email | Self::Message)
    }
}

impl InquiryForm {
    pub fn field(&self, field: InquiryField) -> &str {
        match field {
            InquiryField::Name => &self.name,
            InquiryField::Email => &self.email,
            InquiryField::Phone => &self.phone,
            InquiryField::Company => &self.company,
            InquiryField::Budget => &self.budget,
            InquiryField::Timeline => &self.timeline,
            InquiryField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: InquiryField) -> &mut String {
        match field {
            InquiryField::Name => &mut self.name,
            InquiryField::Email => &mut self.email,
            InquiryField::Phone => &mut self.phone,
            InquiryField::Company => &mut self.company,
            InquiryField::Budget => &mut self.budget,
            InquiryField::Timeline => &mut self.timeline,
            InquiryField::Message => &mut self.message,
        }
    }

    pub fn missing_required(&self) -> Vec<InquiryField> {
        InquiryField::REQUIRED
            .into_iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Display title of the selected service, or the raw project type when the
    /// selection does not match the catalog.
    pub fn service_type(&self, selected_service: Option<&str>) -> String {
        selected_service
            .and_then(find_service)
            .map(|service| service.title.to_owned())
            .unwrap_or_else(|| self.project_type.clone())
    }

    pub fn to_payload(&self, selected_service: Option<&str>) -> InquiryPayload {
        InquiryPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            project_type: self.project_type.clone(),
            budget: self.budget.clone(),
            timeline: self.timeline.clone(),
            message: self.message.clone(),
            preferred_contact_method: self.preferred_contact_method,
            service_type: self.service_type(selected_service),
        }
    }
}

/// JSON body posted to the inquiry endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub message: String,
    pub preferred_contact_method: ContactMethod,
    pub service_type: String,
}

/// Acknowledgement returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InquiryReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub token: SubmissionToken,
    pub payload: InquiryPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    InFlight,
    MissingFields(Vec<InquiryField>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionResolution {
    Succeeded,
    Failed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InquiryPipeline {
    form: InquiryForm,
    selected_service: Option<&'static str>,
    phase: SubmissionPhase,
    in_flight: Option<SubmissionToken>,
    next_token: u64,
}

impl InquiryPipeline {
    pub fn form(&self) -> &InquiryForm {
        &self.form
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn selected_service(&self) -> Option<&'static ServiceOffering> {
        self.selected_service.and_then(find_service)
    }

    pub fn set_field(&mut self, field: InquiryField, value: impl Into<String>) {
        *self.form.field_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: InquiryField, ch: char) {
        self.form.field_mut(field).push(ch);
    }

    pub fn pop_char(&mut self, field: InquiryField) {
        self.form.field_mut(field).pop();
    }

    pub fn set_contact_method(&mut self, method: ContactMethod) {
        self.form.preferred_contact_method = method;
    }

    /// Selects a catalog service and mirrors its id into `project_type`.
    /// Unknown ids leave the form untouched.
    pub fn select_service(&mut self, service_id: &str) -> bool {
        let Some(service) = find_service(service_id) else {
            return false;
        };
        self.selected_service = Some(service.id);
        self.form.project_type = service.id.to_owned();
        true
    }

    /// Submission guard: idle and every required field filled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.form.is_submittable()
    }

    /// Enters `Submitting` and hands out the payload to send. The caller must
    /// settle the returned token with [`InquiryPipeline::resolve`] on every
    /// exit path.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        if self.is_submitting() {
            debug!("submit ignored while a submission is in flight");
            return Err(SubmitBlocked::InFlight);
        }
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return Err(SubmitBlocked::MissingFields(missing));
        }

        self.next_token = self.next_token.saturating_add(1);
        let token = SubmissionToken(self.next_token);
        self.phase = SubmissionPhase::Submitting;
        self.in_flight = Some(token);
        Ok(PendingSubmission {
            token,
            payload: self.form.to_payload(self.selected_service),
        })
    }

    pub fn resolve(
        &mut self,
        token: SubmissionToken,
        result: Result<InquiryReceipt, RemoteFailure>,
        sink: &mut dyn NotificationSink,
    ) -> SubmissionResolution {
        if self.in_flight != Some(token) {
            return SubmissionResolution::Ignored;
        }
        self.in_flight = None;
        self.phase = SubmissionPhase::Idle;

        match result {
            Ok(receipt) => {
                info!(ack = receipt.message.as_deref(), "inquiry accepted");
                self.form = InquiryForm::default();
                self.selected_service = None;
                sink.notify(inquiry_success_notice());
                SubmissionResolution::Succeeded
            }
            Err(failure) => {
                warn!(kind = failure.kind(), %failure, "inquiry submission failed");
                sink.notify(inquiry_failure_notice());
                SubmissionResolution::Failed
            }
        }
    }
}

/// Failure recorded when a request ends without producing a result.
pub fn aborted_request_failure() -> RemoteFailure {
    RemoteFailure::transport("service inquiry", "request aborted before completion")
}
