//! Core directory structure and initialization.

use super::builder::{DirectoryConfig, DirectoryCoreBuilder};
use crate::error::BuildResult;
use crate::interceptor::InterceptorChain;
use crate::nexus::Nexus;
use crate::schema::SharedSchema;
use std::sync::Arc;

/// Schema-enforcing directory in front of a backend nexus.
///
/// Owns the published schema snapshot, the backend and the interceptor chain
/// every operation runs through. There is no process-wide state: each core is
/// built explicitly and can be shared behind an `Arc`.
///
/// # Type Parameters
///
/// * `N` - The backend type that implements [`Nexus`]
///
/// # Examples
///
/// ```rust
/// use directory_core::DirectoryCore;
/// use directory_core::entry::{Dn, Entry};
/// use directory_core::nexus::InMemoryPartition;
/// use directory_core::operation::RequestContext;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let suffix = Dn::parse("dc=example,dc=com")?;
/// let core = DirectoryCore::new(InMemoryPartition::with_suffix(suffix.clone()))?;
/// let admin = RequestContext::authenticated(Dn::parse("cn=admin,dc=example,dc=com")?);
///
/// let domain = Entry::new(suffix)
///     .with_attribute("objectClass", ["domain"])
///     .with_attribute("dc", ["example"]);
/// core.add(domain, &admin).await?;
/// # Ok(())
/// # }
/// ```
pub struct DirectoryCore<N> {
    pub(super) nexus: Arc<N>,
    pub(super) schema: Arc<SharedSchema>,
    pub(super) chain: InterceptorChain,
    pub(super) config: DirectoryConfig,
}

impl<N: Nexus + 'static> DirectoryCore<N> {
    /// Creates a directory core with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`](crate::error::BuildError) if the embedded
    /// schemas cannot be loaded.
    pub fn new(nexus: N) -> BuildResult<Self> {
        DirectoryCoreBuilder::new(nexus).build()
    }

    /// Creates a directory core with the given configuration.
    pub fn with_config(nexus: N, config: DirectoryConfig) -> BuildResult<Self> {
        DirectoryCoreBuilder::new(nexus).with_config(config).build()
    }

    pub fn nexus(&self) -> &N {
        &self.nexus
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }
}
