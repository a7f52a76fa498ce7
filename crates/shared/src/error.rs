use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid envelope amount: {0}")]
    InvalidAmount(f64),
    #[error("duplicate envelope number {0} in catalog")]
    DuplicateEnvelope(i64),
}
