//! Background loop driving periodic sweeps of a [Registry]

use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{error, info};
use tokio_util::sync::CancellationToken;

use crate::{error::WardenError, registry::Registry, tokio_tools::run_in_tokio};

/// Sweep the registry, then sleep for `interval`, until `ct` is cancelled.
///
/// Cancellation wakes the sleep immediately. A sweep already in progress is allowed to
/// finish. Returns the number of sweeps performed.
pub async fn run_loop(registry: Registry, interval: Duration, ct: CancellationToken) -> u64 {
    let mut sweeps = 0;

    while !ct.is_cancelled() {
        let report = registry.check_all().await;
        sweeps += 1;
        if !report.jailed.is_empty() || !report.released.is_empty() {
            info!("Sweep {}: {}", sweeps, report);
        }

        tokio::select! {
            _ = ct.cancelled() => {
                info!("Received Cancellation token after {} sweeps", sweeps);
            },
            _ = tokio::time::sleep(interval) => {},
        }
    }

    sweeps
}

/// Lifecycle of a [Scheduler]. Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Runs [run_loop] on a dedicated thread with its own tokio runtime
#[derive(Debug)]
pub struct Scheduler {
    registry: Registry,
    interval: Duration,
    state: SchedulerState,
    /// Cancellation token to enable easy shutdown
    ct: CancellationToken,
    /// joinhandle to wait when shutting down the loop
    thread_jh: Option<JoinHandle<Result<u64, WardenError>>>,
    sweeps: u64,
}

impl Scheduler {
    /// Create a scheduler using the check interval from the registry configuration
    pub fn new(registry: Registry) -> Scheduler {
        let interval = registry.config().check_interval;
        Scheduler::with_interval(registry, interval)
    }

    pub fn with_interval(registry: Registry, interval: Duration) -> Scheduler {
        Scheduler {
            registry,
            interval,
            state: SchedulerState::Idle,
            ct: CancellationToken::new(),
            thread_jh: None,
            sweeps: 0,
        }
    }

    /// Current lifecycle state. A started loop is Stopped as soon as its token is
    /// cancelled, whether or not [Scheduler::stop] has been called.
    pub fn state(&self) -> SchedulerState {
        match self.state {
            SchedulerState::Running if self.ct.is_cancelled() => SchedulerState::Stopped,
            state => state,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Token that stops the loop when cancelled. Hosts may tie it to their own shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.ct.clone()
    }

    /// Sweeps performed by a loop that has been stopped
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Start the loop on a background thread and return immediately
    pub fn start(&mut self) -> Result<(), WardenError> {
        if self.state != SchedulerState::Idle {
            return Err(WardenError::AlreadyStarted);
        }
        info!("Starting scheduler with interval {:?}", self.interval);

        let registry = self.registry.clone();
        let interval = self.interval;
        let ct = self.ct.clone();

        let thread_jh = thread::Builder::new()
            .name("warden-scheduler".to_owned())
            .spawn(move || {
                run_in_tokio(async move { Ok(run_loop(registry, interval, ct).await) })
            })?;

        self.thread_jh = Some(thread_jh);
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Raise the stop signal without waiting. Safe to call any number of times.
    pub fn cancel(&self) {
        self.ct.cancel();
    }

    /// Stop the loop and wait for its thread to finish.
    ///
    /// Returns within one interval plus the duration of any probe already running.
    pub fn stop(&mut self) -> Result<(), WardenError> {
        match self.state {
            SchedulerState::Idle => return Err(WardenError::NotRunning),
            SchedulerState::Stopped => return Ok(()),
            SchedulerState::Running => {}
        }
        info!("Stopping scheduler");

        self.ct.cancel();
        self.state = SchedulerState::Stopped;

        if let Some(thread_jh) = self.thread_jh.take() {
            let reply = thread_jh.join().map_err(WardenError::from_join)?;
            match reply {
                Ok(sweeps) => self.sweeps = sweeps,
                Err(err) => {
                    error!("Scheduler loop ended with error: {}", err);
                    return Err(err);
                }
            }
        }
        info!("Scheduler stopped after {} sweeps", self.sweeps);
        Ok(())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.ct.cancel();
    }
}
