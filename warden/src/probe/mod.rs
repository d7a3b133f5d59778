use crate::error::{panic_message, ProbeError};
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt::Debug;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// This module contains the closure adapter probe
pub mod func;
/// This module contains the kick probe
pub mod kick;
/// This module contains the manual probe
pub mod manual;

pub use func::{probe_fn, FnProbe};
pub use kick::Kick;
pub use manual::Manual;

/// A Probe evaluates the current health of a single service.
///
/// Ok(()) means the service is usable. An Err carries a human readable cause.
/// Probes are invoked repeatedly (once per sweep) so they must be safe to call
/// many times and are expected to answer promptly.
#[async_trait]
pub trait Probe: Debug + Send + Sync {
    async fn check(&self) -> Result<(), ProbeError>;
}

/// Run a probe with fault containment. See [guarded].
pub async fn guarded_check(probe: &dyn Probe, timeout: Option<Duration>) -> Result<(), ProbeError> {
    guarded(probe.check(), timeout).await
}

/// Drive a health check future with fault containment.
///
/// A panic inside the check becomes [ProbeError::Panicked]. When `timeout` is set a check
/// that does not complete in time becomes [ProbeError::Timeout]. A check that blocks its
/// thread without yielding cannot be interrupted by the timeout.
pub async fn guarded<F>(check: F, timeout: Option<Duration>) -> Result<(), ProbeError>
where
    F: Future<Output = Result<(), ProbeError>>,
{
    let guarded = AssertUnwindSafe(check).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => return Err(ProbeError::Timeout(limit)),
        },
        None => guarded.await,
    };

    match outcome {
        Ok(result) => result,
        Err(payload) => Err(ProbeError::Panicked(panic_message(payload.as_ref()))),
    }
}
