use shared::{domain::EnvelopeNumber, error::DomainError};
use thiserror::Error;

use crate::form::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    Status { status: u16 },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
    #[error("no envelope is selected")]
    NoSelection,
    #[error("envelope #{0} is not in the catalog")]
    UnknownEnvelope(EnvelopeNumber),
    #[error("a sponsorship submission is already in flight")]
    SubmissionInFlight,
    #[error("{0} is required")]
    MissingField(Field),
    #[error("email address is not valid")]
    InvalidEmail,
}

impl ClientError {
    /// Local guard failures never reach the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NoSelection
                | Self::UnknownEnvelope(_)
                | Self::SubmissionInFlight
                | Self::MissingField(_)
                | Self::InvalidEmail
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if let Some(status) = value.status() {
            return Self::Status {
                status: status.as_u16(),
            };
        }
        if value.is_decode() {
            return Self::MalformedResponse(value.to_string());
        }
        Self::Transport(value.to_string())
    }
}

impl From<DomainError> for ClientError {
    fn from(value: DomainError) -> Self {
        Self::MalformedResponse(value.to_string())
    }
}
