use thiserror::Error;

use crate::domain::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain validation failed: {0}")]
    Validation(FieldErrors),
}
