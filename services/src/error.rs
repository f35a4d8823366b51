use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure categories surfaced by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness clash detected by a pre-check (duplicate code, number, reservation...).
    #[error("{0}")]
    Conflict(String),

    /// Input rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// A standard delete was blocked by dependents. `code` is the blocking record's code.
    #[error("{message}")]
    PrerequisiteFailed { code: String, message: String },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(format!("{entity} not found"))
    }

    /// Stable machine-readable code for the boundary layer.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::PrerequisiteFailed { .. } => "PREREQUISITE_FAILED",
            ServiceError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Database(_))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(common::format_validation_errors(&errors))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
