//! Warden keeps a live view of which subordinate services are usable.
//!
//! Services are registered into a [Registry] together with a [Probe]. A [Scheduler]
//! sweeps the registry on a fixed interval, jailing services whose probe fails and
//! releasing them once the probe succeeds again.

pub mod config;
pub mod error;
pub mod probe;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod tokio_tools;

pub use config::{RegistryConfig, RegistryConfigBuilder, ReregisterPolicy};
pub use error::{ProbeError, WardenError};
pub use probe::{probe_fn, Kick, Manual, Probe};
pub use registry::{Registry, RegistryListing, ServiceStatus, SweepReport};
pub use scheduler::{run_loop, Scheduler, SchedulerState};
pub use service::{Service, ServiceEntry};

/// Name of the Crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Version of the Crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
