//! Backend-to-UI events and error modeling for the envelope window.

use client_core::{ClientError, SubmissionTicket};
use shared::domain::Envelope;

pub enum UiEvent {
    Info(String),
    BackendReady,
    CatalogLoaded(Result<Vec<Envelope>, ClientError>),
    SponsorshipFinished {
        ticket: SubmissionTicket,
        result: Result<(), ClientError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Catalog,
    Sponsorship,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) | ClientError::InvalidServerUrl(_) => {
                UiErrorCategory::Transport
            }
            ClientError::Status { .. } | ClientError::MalformedResponse(_) => {
                UiErrorCategory::Server
            }
            ClientError::NoSelection
            | ClientError::UnknownEnvelope(_)
            | ClientError::SubmissionInFlight
            | ClientError::MissingField(_)
            | ClientError::InvalidEmail => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("disconnected")
            || lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text for the inline hint under the form, phrased like a browser's
    /// native validation bubble.
    pub fn hint(&self) -> String {
        match self.category {
            UiErrorCategory::Validation => format!("Please fix the form: {}.", self.message),
            UiErrorCategory::Transport => {
                format!("Server unreachable; check the URL/network ({}).", self.message)
            }
            UiErrorCategory::Server => format!("Server error: {}", self.message),
            UiErrorCategory::Unknown => self.message.clone(),
        }
    }
}
