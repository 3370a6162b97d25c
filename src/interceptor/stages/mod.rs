//! Stock stages of the directory core.
//!
//! The default "before" pipeline runs, in order: [`AuthenticationStage`],
//! [`ExceptionStage`], [`SchemaStage`], [`OperationalAttributeStage`]. The
//! "after" pipeline holds [`AuditStage`] and the failure pipeline
//! [`FailureLogStage`].

pub mod authentication;
pub mod exception;
pub mod logging;
pub mod operational;
pub mod schema;

pub use authentication::AuthenticationStage;
pub use exception::ExceptionStage;
pub use logging::{AuditStage, FailureLogStage};
pub use operational::OperationalAttributeStage;
pub use schema::SchemaStage;
