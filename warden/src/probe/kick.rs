//! Specific Kick style for health probes

use super::Probe;
use crate::error::ProbeError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A health probe that automatically fails when the timer has not been reset before
/// the margin. Equivalent of a dead mans handle.
#[derive(Debug, Clone)]
pub struct Kick {
    /// The time of the last kick, shared across clones
    latest: Arc<Mutex<Instant>>,
    margin: Duration,
}

impl Kick {
    /// Create a new Kick probe with the given margin. The timer starts now.
    pub fn new(margin: Duration) -> Self {
        Self {
            latest: Arc::new(Mutex::new(Instant::now())),
            margin,
        }
    }

    fn latest(&self) -> MutexGuard<'_, Instant> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the timer
    pub fn kick(&self) {
        *self.latest() = Instant::now();
    }

    /// Evaluate the probe against a given point in time
    pub fn check_at(&self, now: Instant) -> Result<(), ProbeError> {
        let latest = *self.latest();
        if now <= latest + self.margin {
            Ok(())
        } else {
            Err(ProbeError::Failed(format!(
                "not kicked for {:?} (margin {:?})",
                now.duration_since(latest),
                self.margin
            )))
        }
    }
}

#[async_trait]
impl Probe for Kick {
    async fn check(&self) -> Result<(), ProbeError> {
        self.check_at(Instant::now())
    }
}
