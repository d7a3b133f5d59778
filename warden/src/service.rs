//! Services tracked by the registry

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ProbeError, WardenError};
use crate::probe::Probe;

/// A named subordinate service whose health can be evaluated.
///
/// `restart` and `stop` are lifecycle hooks for the host's own service management.
/// The registry never calls them; they default to doing nothing.
#[async_trait]
pub trait Service: Debug + Send + Sync {
    /// Stable identifier, used as the key in the registry
    fn name(&self) -> &str;

    /// Evaluate the current health of the service
    async fn health_check(&self) -> Result<(), ProbeError>;

    async fn restart(&self) -> Result<(), WardenError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), WardenError> {
        Ok(())
    }
}

/// Binding of a service name to the [Probe] that evaluates it
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    name: String,
    probe: Arc<dyn Probe>,
}

impl ServiceEntry {
    /// Create a new ServiceEntry with a name and its probe
    pub fn new<S: Into<String>>(name: S, probe: impl Probe + 'static) -> Self {
        Self {
            name: name.into(),
            probe: Arc::new(probe),
        }
    }

    /// Create a ServiceEntry sharing an existing probe
    pub fn with_shared<S: Into<String>>(name: S, probe: Arc<dyn Probe>) -> Self {
        Self {
            name: name.into(),
            probe,
        }
    }

    pub fn probe(&self) -> &Arc<dyn Probe> {
        &self.probe
    }
}

#[async_trait]
impl Service for ServiceEntry {
    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> Result<(), ProbeError> {
        self.probe.check().await
    }
}
