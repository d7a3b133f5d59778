use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use log::{debug, error, info, warn};

use crate::{
    config::{RegistryConfig, ReregisterPolicy},
    error::ProbeError,
    probe::guarded,
    service::Service,
};

mod listing;

pub use listing::{RegistryListing, ServiceStatus, SweepReport};

/// State kept for each registered name
#[derive(Debug)]
struct Slot {
    service: Arc<dyn Service>,
    status: ServiceStatus,
    /// Time the current status was entered
    since: SystemTime,
    /// Cause reported by the most recent failed probe
    last_error: Option<String>,
    /// Bumped on every re-registration so stale probe results can be discarded
    generation: u64,
}

impl Slot {
    fn healthy(service: Arc<dyn Service>) -> Self {
        Self {
            service,
            status: ServiceStatus::Healthy,
            since: SystemTime::now(),
            last_error: None,
            generation: 0,
        }
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Concurrent registry of named services split into a healthy and a jailed partition.
///
/// Each name maps to exactly one slot carrying its status, so a name is always in
/// exactly one partition. Clones share the same state.
///
/// ```mermaid
/// sequenceDiagram
///     participant Host
///     participant Registry
///     participant Probe
///
///     Host->>Registry: add_service(entry)
///     rect rgba(50,50,255,0.1)
///     note right of Registry: check_all (one sweep)
///     Registry->>Registry: snapshot under read lock
///     loop each registered service
///         Registry->>+Probe: health_check (no lock held)
///         Probe->>-Registry: Ok / Err(cause)
///         Registry->>Registry: move between partitions under write lock
///     end
///     end
///     Host->>Registry: list()
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    slots: Arc<RwLock<HashMap<String, Slot>>>,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(RegistryConfig::default())
    }
}

impl Registry {
    /// Returns an empty Registry using the given configuration
    pub fn new(config: RegistryConfig) -> Registry {
        Registry {
            slots: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Slot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Slot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a service under its name.
    ///
    /// A new name starts healthy. An existing name keeps its partition, unless it is
    /// jailed and the registry is configured with [ReregisterPolicy::Reset].
    pub fn add_service<S: Service + 'static>(&self, service: S) {
        self.add_shared(Arc::new(service));
    }

    /// Insert or replace a service that is already shared. See [Registry::add_service].
    pub fn add_shared(&self, service: Arc<dyn Service>) {
        let name = service.name().to_owned();
        let mut slots = self.write();

        match slots.get_mut(&name) {
            Some(slot) => {
                slot.service = service;
                slot.generation += 1;
                if slot.status == ServiceStatus::Jailed
                    && self.config.reregister == ReregisterPolicy::Reset
                {
                    slot.status = ServiceStatus::Healthy;
                    slot.since = SystemTime::now();
                    slot.last_error = None;
                    info!("[{}] re-registered, released from jail", name);
                } else {
                    debug!("[{}] re-registered as {}", name, slot.status);
                }
            }
            None => {
                info!("[{}] registered", name);
                slots.insert(name, Slot::healthy(service));
            }
        }
    }

    /// Names of the healthy and jailed services, each sorted
    pub fn list(&self) -> RegistryListing {
        let mut listing = RegistryListing::default();
        {
            let slots = self.read();
            for (name, slot) in slots.iter() {
                match slot.status {
                    ServiceStatus::Healthy => listing.healthy.push(name.clone()),
                    ServiceStatus::Jailed => listing.jailed.push(name.clone()),
                }
            }
        }
        listing.healthy.sort();
        listing.jailed.sort();
        listing
    }

    /// Produce the listing and report it through the log
    pub fn log_listing(&self) -> RegistryListing {
        let listing = self.list();
        match serde_json::to_string(&listing) {
            Ok(json) => info!("Registry services: {}", json),
            Err(err) => warn!("Registry services: {} ({})", listing, err),
        }
        listing
    }

    pub fn is_jailed(&self, name: &str) -> bool {
        self.status(name) == Some(ServiceStatus::Jailed)
    }

    pub fn status(&self, name: &str) -> Option<ServiceStatus> {
        self.read().get(name).map(|slot| slot.status)
    }

    /// Time the service entered the jail, None when not jailed or unknown
    pub fn jailed_since(&self, name: &str) -> Option<SystemTime> {
        self.read()
            .get(name)
            .filter(|slot| slot.status == ServiceStatus::Jailed)
            .map(|slot| slot.since)
    }

    /// Cause reported by the latest failed probe of a jailed service
    pub fn last_error(&self, name: &str) -> Option<String> {
        self.read()
            .get(name)
            .and_then(|slot| slot.last_error.clone())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run one sweep: probe every registered service (healthy and jailed) in turn and
    /// move it between partitions according to the result.
    ///
    /// The registry is only locked while taking the snapshot and while applying each
    /// result, never while a probe runs. Services registered during the sweep are probed
    /// on the next one, and a result is dropped if its name was re-registered meanwhile.
    ///
    /// Must be driven inside a tokio runtime: probe timeouts use tokio timers and closure
    /// probes run on the runtime's blocking pool.
    pub async fn check_all(&self) -> SweepReport {
        let mut snapshot: Vec<(String, u64, Arc<dyn Service>)> = {
            let slots = self.read();
            slots
                .iter()
                .map(|(name, slot)| (name.clone(), slot.generation, slot.service.clone()))
                .collect()
        };
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = SweepReport::default();

        for (name, generation, service) in snapshot {
            let result = guarded(service.health_check(), self.config.probe_timeout).await;

            if let Err(err) = &result {
                error!("[{}] health check failed: {}", name, err);
            }

            match self.apply(&name, generation, result) {
                Some(ServiceStatus::Jailed) => report.jailed.push(name.clone()),
                Some(ServiceStatus::Healthy) => report.released.push(name.clone()),
                None => {}
            }
            report.checked.push(name);
        }

        debug!("Sweep complete: {}", report);
        report
    }

    /// Record a probe result, returning the new status when it changed
    fn apply(
        &self,
        name: &str,
        generation: u64,
        result: Result<(), ProbeError>,
    ) -> Option<ServiceStatus> {
        let mut slots = self.write();
        let slot = slots.get_mut(name)?;

        if slot.generation != generation {
            debug!("[{}] re-registered during sweep, result dropped", name);
            return None;
        }

        match result {
            Ok(()) => {
                slot.last_error = None;
                if slot.status == ServiceStatus::Jailed {
                    slot.status = ServiceStatus::Healthy;
                    slot.since = SystemTime::now();
                    info!("[{}] recovered, released from jail", name);
                    return Some(ServiceStatus::Healthy);
                }
                None
            }
            Err(err) => {
                slot.last_error = Some(err.to_string());
                if slot.status == ServiceStatus::Healthy {
                    slot.status = ServiceStatus::Jailed;
                    slot.since = SystemTime::now();
                    warn!("[{}] jailed", name);
                    return Some(ServiceStatus::Jailed);
                }
                None
            }
        }
    }
}
