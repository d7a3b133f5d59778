/// Manual probe provides a health probe that is explicitly enabled and disabled.
use super::Probe;
use crate::error::ProbeError;
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A health probe that is manually controlled. Allowing the developer to
/// enable, disable or toggle it as appropriate.
///
/// Clones share the same state so a host can keep one copy and hand another
/// to the registry.
#[derive(Debug, Clone)]
pub struct Manual {
    enabled: Arc<AtomicBool>,
}

impl Manual {
    /// Create a new Manual probe with the given enabled state
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Enable the probe
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disable the probe
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Toggle the probe
    pub fn toggle(&self) {
        self.enabled.fetch_xor(true, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Probe for Manual {
    async fn check(&self) -> Result<(), ProbeError> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(ProbeError::Failed("disabled".to_owned()))
        }
    }
}
