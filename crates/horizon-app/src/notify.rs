// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

/// Surfaces transient messages. Fire-and-forget: the caller never waits on
/// or inspects delivery.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

pub fn inquiry_success_notice() -> Notification {
    Notification {
        title: "Thank you for getting started!".to_owned(),
        description: "We'll review your project details and get back to you within 24 hours with a custom proposal.".to_owned(),
        variant: NotificationVariant::Default,
    }
}

pub fn inquiry_failure_notice() -> Notification {
    Notification {
        title: "Error".to_owned(),
        description:
            "Failed to submit your request. Please try again or contact us directly.".to_owned(),
        variant: NotificationVariant::Destructive,
    }
}
