// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failure at the network boundary. Both kinds collapse to one
/// "unavailable" outcome for the user; the split only exists for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    #[error("cannot reach {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },

    #[error("unexpected response from {endpoint}: {detail}")]
    Protocol { endpoint: String, detail: String },
}

impl RemoteFailure {
    pub fn transport(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            detail: detail.into(),
        }
    }

    pub fn protocol(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint: endpoint.into(),
            detail: detail.into(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteFailure;

    #[test]
    fn display_names_endpoint_and_detail() {
        let failure = RemoteFailure::protocol("http://api/api/projects", "server returned 500");
        assert_eq!(
            failure.to_string(),
            "unexpected response from http://api/api/projects: server returned 500"
        );
        assert_eq!(failure.kind(), "protocol");
        assert_eq!(RemoteFailure::transport("x", "refused").kind(), "transport");
    }
}
