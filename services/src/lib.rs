//! Business operations of the student information system.
//!
//! Every mutating operation that touches more than one table runs inside a single
//! database transaction, and is audited after it commits.

pub mod audit_service;
pub mod cascade;
pub mod context;
pub mod course_service;
pub mod error;
pub mod grade_calculator;
pub mod grade_service;
pub mod ledger;
pub mod pagination;
pub mod reservation_service;
pub mod serde_helpers;
pub mod student_service;
pub mod subject_service;
pub mod user_service;

#[cfg(test)]
mod test_fixtures;

pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
