//! Error types for directory operations.
//!
//! This module provides the error taxonomy shared by the schema engine, the
//! interceptor pipeline and the backend nexus. Schema violations are domain
//! errors and travel through the pipeline unchanged; anything else raised by a
//! stage is wrapped into an [`InterceptorFailure`] naming the stage.

use std::sync::Arc;

/// Main error type for directory operations.
///
/// Every variant is cheap to clone: root causes are held behind an `Arc` so a
/// failure can be recorded on an invocation and re-raised to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// The entry or modification violates the directory schema
    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// An entry with this name already exists
    #[error("Entry already exists: {dn}")]
    EntryAlreadyExists { dn: String },

    /// The named entry does not exist
    #[error("No such entry: {dn}")]
    NoSuchEntry { dn: String },

    /// The operation is only allowed on leaf entries
    #[error("Operation not allowed on non-leaf entry: {dn}")]
    NotAllowedOnNonLeaf { dn: String },

    /// The session is not allowed to perform the operation
    #[error("Insufficient access rights for {operation}: {reason}")]
    InsufficientAccessRights { operation: String, reason: String },

    /// The entry changed between being read and being written
    #[error("Entry {dn} was modified concurrently")]
    Conflict { dn: String },

    /// A distinguished name could not be parsed
    #[error("Invalid DN '{dn}': {reason}")]
    InvalidDn { dn: String, reason: String },

    /// A non-domain failure raised inside a pipeline stage
    #[error("{0}")]
    Interceptor(InterceptorFailure),

    /// Errors from the backend nexus
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal consistency errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Schema violations detected while validating entries and modifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    /// Attribute type not present in the schema registry
    #[error("Unrecognized attribute '{attribute}'")]
    UnrecognizedAttribute { attribute: String },

    /// Object class not present in the schema registry
    #[error("Unknown object class '{object_class}'")]
    UnknownObjectClass { object_class: String },

    /// No structural object class in the entry's lineage
    #[error("Entry {dn} has no structural object class")]
    MissingStructuralObjectClass { dn: String },

    /// More than one unrelated structural object class
    #[error("Entry {dn} has conflicting structural object classes: {object_classes:?}")]
    ConflictingStructuralObjectClasses {
        dn: String,
        object_classes: Vec<String>,
    },

    /// One or more MUST attributes are absent
    #[error("Entry {dn} is missing mandatory attributes: {attributes:?}")]
    MissingMandatoryAttribute { dn: String, attributes: Vec<String> },

    /// A single-valued attribute carries several values
    #[error("Attribute '{attribute}' is single-valued but has {count} values")]
    MultiValuedSingleValueAttribute { attribute: String, count: usize },

    /// Attribute outside the MUST/MAY sets of the entry's object classes
    #[error("Attribute '{attribute}' is not allowed by the object classes of {dn}")]
    AttributeNotAllowed { dn: String, attribute: String },

    /// A value fails the syntax checker of its attribute
    #[error("Attribute '{attribute}' has a value invalid for syntax {syntax}: {value}")]
    InvalidAttributeSyntax {
        attribute: String,
        syntax: String,
        value: String,
    },

    /// An RDN attribute value is not present on the entry
    #[error("Entry {dn} does not contain its RDN value {attribute}={value}")]
    RdnAttributeMissing {
        dn: String,
        attribute: String,
        value: String,
    },

    /// The value being added is already present
    #[error("Attribute '{attribute}' already contains value '{value}'")]
    AttributeInUse { attribute: String, value: String },

    /// The attribute or one of its values is absent
    #[error("No such attribute: {attribute}{}", .value.as_ref().map(|v| format!(" (value '{v}')")).unwrap_or_default())]
    NoSuchAttribute {
        attribute: String,
        value: Option<String>,
    },

    /// Incrementing would overflow the integer range
    #[error("Incrementing '{attribute}' by {increment} overflows")]
    IncrementOverflow { attribute: String, increment: i64 },

    /// The modification itself is malformed for the attribute
    #[error("Illegal modification of '{attribute}': {reason}")]
    IllegalModification { attribute: String, reason: String },

    /// Attempt to write an attribute that is not user-modifiable
    #[error("Attribute '{attribute}' is not user-modifiable")]
    NoPermissionOnOperationalAttribute { attribute: String },

    /// Attempt to remove a value that is part of the entry's RDN
    #[error("Cannot remove RDN value {attribute}={value}")]
    NotAllowedOnRdn { attribute: String, value: String },

    /// Modification would strip the entry of its object classes
    #[error("Object class modification rejected: {reason}")]
    ObjectClassModification { reason: String },
}

/// A non-domain failure raised by a pipeline stage.
///
/// Records the stage that failed and the invocation it was processing, with the
/// original error kept as the root cause.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Stage '{stage}' failed during {operation} (invocation {invocation_id}): {source}")]
pub struct InterceptorFailure {
    pub stage: String,
    pub operation: String,
    pub invocation_id: String,
    #[source]
    pub source: Arc<DirectoryError>,
}

/// Errors that can occur while building the directory core or loading schemas.
///
/// These are configuration errors and should surface during startup.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A schema document could not be parsed
    #[error("Failed to load schema '{schema}': {source}")]
    SchemaLoad {
        schema: String,
        #[source]
        source: serde_json::Error,
    },

    /// A requested embedded schema set does not exist
    #[error("Unknown schema set: {schema}")]
    UnknownSchema { schema: String },

    /// A schema element references something that is not defined
    #[error("Schema element '{element}' references undefined {kind} '{reference}'")]
    UndefinedReference {
        element: String,
        kind: &'static str,
        reference: String,
    },

    /// Two schema elements claim the same oid or name
    #[error("Duplicate schema element: {name}")]
    DuplicateElement { name: String },
}

impl DirectoryError {
    /// Create a no-such-entry error
    pub fn no_such_entry(dn: impl ToString) -> Self {
        Self::NoSuchEntry { dn: dn.to_string() }
    }

    /// Create an entry-already-exists error
    pub fn already_exists(dn: impl ToString) -> Self {
        Self::EntryAlreadyExists { dn: dn.to_string() }
    }

    /// Create a concurrent-update conflict error
    pub fn conflict(dn: impl ToString) -> Self {
        Self::Conflict { dn: dn.to_string() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a backend error with a message only
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary error raised by a backend or stage
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            message: error.to_string(),
            source: Some(Arc::new(error)),
        }
    }

    /// Whether this error is a directory-domain error.
    ///
    /// Domain errors cross pipeline stages unchanged; everything else is
    /// wrapped with the stage and invocation that raised it.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Self::Backend { .. } | Self::Internal { .. } | Self::Interceptor(_)
        )
    }

    /// The schema violation carried by this error, if any
    pub fn as_schema_violation(&self) -> Option<&SchemaViolation> {
        match self {
            Self::Schema(violation) => Some(violation),
            _ => None,
        }
    }
}

impl SchemaViolation {
    /// Create an unrecognized attribute error
    pub fn unrecognized(attribute: impl Into<String>) -> Self {
        Self::UnrecognizedAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create a no-such-attribute error without a value
    pub fn no_such_attribute(attribute: impl Into<String>) -> Self {
        Self::NoSuchAttribute {
            attribute: attribute.into(),
            value: None,
        }
    }

    /// Create an illegal modification error
    pub fn illegal_modification(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalModification {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

// Result type aliases for convenience
pub type DirectoryResult<T> = Result<T, DirectoryError>;
pub type SchemaResult<T> = Result<T, SchemaViolation>;
pub type BuildResult<T> = Result<T, BuildError>;
