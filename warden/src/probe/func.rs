//! Adapt a plain closure into a [Probe]

use super::Probe;
use crate::error::{panic_message, ProbeError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A probe backed by a closure captured at registration.
///
/// The closure returns `Err(cause)` when the service is not usable. It runs on the
/// blocking thread pool so a closure stuck on I/O does not hold up the sweep once the
/// probe timeout has passed.
pub struct FnProbe<F> {
    check: Arc<F>,
}

impl<F> Clone for FnProbe<F> {
    fn clone(&self) -> Self {
        Self {
            check: self.check.clone(),
        }
    }
}

impl<F> FnProbe<F>
where
    F: Fn() -> Result<(), String> + Send + Sync + 'static,
{
    pub fn new(check: F) -> Self {
        Self {
            check: Arc::new(check),
        }
    }
}

/// Shorthand for [FnProbe::new]
pub fn probe_fn<F>(check: F) -> FnProbe<F>
where
    F: Fn() -> Result<(), String> + Send + Sync + 'static,
{
    FnProbe::new(check)
}

impl<F> fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnProbe")
    }
}

#[async_trait]
impl<F> Probe for FnProbe<F>
where
    F: Fn() -> Result<(), String> + Send + Sync + 'static,
{
    async fn check(&self) -> Result<(), ProbeError> {
        let check = self.check.clone();
        match tokio::task::spawn_blocking(move || (*check)()).await {
            Ok(reply) => reply.map_err(ProbeError::Failed),
            Err(err) if err.is_panic() => {
                Err(ProbeError::Panicked(panic_message(err.into_panic().as_ref())))
            }
            Err(err) => Err(ProbeError::Failed(format!("check aborted: {}", err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::probe::guarded_check;

    #[tokio::test]
    async fn closure_result_is_forwarded() {
        let ok = probe_fn(|| Ok(()));
        assert!(ok.check().await.is_ok());

        let failing = probe_fn(|| Err("no route to host".to_owned()));
        assert_eq!(
            failing.check().await,
            Err(ProbeError::Failed("no route to host".to_owned()))
        );
    }

    #[tokio::test]
    async fn closure_is_called_each_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let probe = probe_fn(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        for _ in 0..3 {
            probe.check().await.expect("probe ok");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn closure_panic_is_contained() {
        let exploding = probe_fn(|| panic!("socket gone"));
        assert_eq!(
            exploding.check().await,
            Err(ProbeError::Panicked("socket gone".to_owned()))
        );
    }

    #[tokio::test]
    async fn blocking_closure_is_bounded_by_timeout() {
        let blocked = probe_fn(|| {
            thread::sleep(Duration::from_millis(800));
            Ok(())
        });
        let limit = Duration::from_millis(50);

        let started = Instant::now();
        assert_eq!(
            guarded_check(&blocked, Some(limit)).await,
            Err(ProbeError::Timeout(limit))
        );
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
