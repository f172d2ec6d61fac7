//! Error types for search calls.
//!
//! The controller treats every variant the same way: as a failed fetch whose
//! message is shown to the user. The split only exists so services can say
//! what went wrong.

use thiserror::Error;

/// Failure of a single search call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The call did not complete (connection refused, timeout, ...)
    #[error("search request failed{}", detail(.message))]
    Transport { message: Option<String> },

    /// The service answered with a non-success status
    #[error("search rejected with status {status}{}", detail(.message))]
    Rejected { status: u16, message: Option<String> },
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl SearchError {
    pub fn transport(message: impl Into<String>) -> Self {
        SearchError::Transport {
            message: Some(message.into()),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        SearchError::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// The human-readable message supplied by the service, if any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            SearchError::Transport { message } | SearchError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
        }
    }
}
