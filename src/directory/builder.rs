//! Builder pattern for configuring directory core instances.
//!
//! The builder loads the schema sets named in the configuration, adds any
//! caller-supplied schema documents, and assembles the stock interceptor
//! pipelines with custom stages appended to each phase.

use super::core::DirectoryCore;
use crate::error::{BuildError, BuildResult};
use crate::interceptor::stages::{
    AuditStage, AuthenticationStage, ExceptionStage, FailureLogStage, OperationalAttributeStage,
    SchemaStage,
};
use crate::interceptor::{InterceptorChain, Pipeline, Stage};
use crate::nexus::Nexus;
use crate::schema::embedded::{self, DEFAULT_SCHEMAS};
use crate::schema::{SchemaRegistry, SchemaSnapshot, SharedSchema};
use log::info;
use std::collections::HashSet;
use std::sync::Arc;

/// Configuration for a directory core.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Whether sessions without a principal may write.
    pub allow_anonymous_writes: bool,

    /// Embedded schema sets to load. Dependencies of a set are loaded with it.
    pub schemas: Vec<String>,

    /// Whether entries must contain the values of their own RDN.
    pub check_rdn_attributes: bool,

    /// Whether timestamps, creator/modifier names and entry UUIDs are maintained.
    pub stamp_operational_attributes: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            allow_anonymous_writes: false,
            schemas: DEFAULT_SCHEMAS.iter().map(|name| name.to_string()).collect(),
            check_rdn_attributes: true,
            stamp_operational_attributes: true,
        }
    }
}

impl DirectoryConfig {
    /// Validate the configuration.
    ///
    /// At least one schema set must be named, every name must be an embedded
    /// set, and no set may be listed twice.
    pub fn validate(&self) -> BuildResult<()> {
        if self.schemas.is_empty() {
            return Err(BuildError::InvalidConfiguration {
                message: "at least one schema set must be loaded".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.schemas {
            if embedded::schema_set(name).is_none() {
                return Err(BuildError::UnknownSchema {
                    schema: name.clone(),
                });
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(BuildError::InvalidConfiguration {
                    message: format!("schema set '{}' is listed more than once", name),
                });
            }
        }
        Ok(())
    }
}

/// Builder for configuring and creating directory core instances.
///
/// # Examples
///
/// ```rust
/// use directory_core::DirectoryCoreBuilder;
/// use directory_core::entry::Dn;
/// use directory_core::nexus::InMemoryPartition;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let partition = InMemoryPartition::with_suffix(Dn::parse("dc=example,dc=com")?);
///
/// let core = DirectoryCoreBuilder::new(partition)
///     .with_schemas(["system", "core"])
///     .allow_anonymous_writes(true)
///     .build()?;
///
/// assert!(core.schema().registry().lookup_object_class("person").is_some());
/// # Ok(())
/// # }
/// ```
pub struct DirectoryCoreBuilder<N> {
    nexus: N,
    config: DirectoryConfig,
    schema_documents: Vec<String>,
    before: Vec<Arc<dyn Stage>>,
    after: Vec<Arc<dyn Stage>>,
    failure: Vec<Arc<dyn Stage>>,
}

impl<N: Nexus + 'static> DirectoryCoreBuilder<N> {
    /// Create a new builder with default configuration.
    pub fn new(nexus: N) -> Self {
        Self {
            nexus,
            config: DirectoryConfig::default(),
            schema_documents: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            failure: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn allow_anonymous_writes(mut self, allow: bool) -> Self {
        self.config.allow_anonymous_writes = allow;
        self
    }

    /// Set the embedded schema sets to load, replacing the defaults.
    pub fn with_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.schemas = schemas.into_iter().map(Into::into).collect();
        self
    }

    pub fn check_rdn_attributes(mut self, check: bool) -> Self {
        self.config.check_rdn_attributes = check;
        self
    }

    pub fn stamp_operational_attributes(mut self, stamp: bool) -> Self {
        self.config.stamp_operational_attributes = stamp;
        self
    }

    /// Add a schema document (JSON) loaded after the embedded sets.
    ///
    /// Documents load in the order they were added; one may depend on sets
    /// loaded before it.
    pub fn with_schema_json(mut self, document: impl Into<String>) -> Self {
        self.schema_documents.push(document.into());
        self
    }

    /// Append a stage to the "before" phase, after the stock stages.
    pub fn with_before_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.before.push(Arc::new(stage));
        self
    }

    /// Append a stage to the "after" phase, after the audit stage.
    pub fn with_after_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.after.push(Arc::new(stage));
        self
    }

    /// Append a stage to the failure phase.
    pub fn with_failure_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.failure.push(Arc::new(stage));
        self
    }

    /// Build the directory core.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the configuration is invalid or a schema
    /// set or document cannot be loaded.
    pub fn build(self) -> BuildResult<DirectoryCore<N>> {
        self.config.validate()?;

        let mut registry = SchemaRegistry::with_embedded_schemas(&self.config.schemas)?;
        for document in &self.schema_documents {
            registry.load_schema_str(document)?;
        }
        let snapshot =
            SchemaSnapshot::new(registry).with_rdn_check(self.config.check_rdn_attributes);
        let schema = Arc::new(SharedSchema::new(snapshot));
        let nexus = Arc::new(self.nexus);

        let mut before = Pipeline::fail_fast("before")
            .with_stage(AuthenticationStage::new(self.config.allow_anonymous_writes))
            .with_stage(ExceptionStage::new(Arc::clone(&nexus)))
            .with_stage(SchemaStage::new(Arc::clone(&schema)));
        if self.config.stamp_operational_attributes {
            before = before.with_stage(OperationalAttributeStage::new());
        }
        let mut after = Pipeline::fail_fast("after").with_stage(AuditStage);
        let mut failure = Pipeline::collect_all("failure").with_stage(FailureLogStage);

        for stage in self.before {
            before.push(stage);
        }
        for stage in self.after {
            after.push(stage);
        }
        for stage in self.failure {
            failure.push(stage);
        }

        info!(
            "Directory core built with schema sets {:?} and before stages {:?}",
            self.config.schemas,
            before.stage_names()
        );

        Ok(DirectoryCore {
            nexus,
            schema,
            chain: InterceptorChain::new(before, after, failure),
            config: self.config,
        })
    }
}
