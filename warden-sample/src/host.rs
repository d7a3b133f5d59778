//! Host wiring: builds services from configuration, registers them and drives the scheduler

use std::{sync::Arc, time::Duration};

use log::{error, info};
use tokio::signal::unix::{signal, SignalKind};
use warden::{Registry, RegistryListing, Scheduler, Service};

use crate::{config::Config, sampleerror::SampleError, services::HttpService};

pub struct Host {
    registry: Registry,
    services: Vec<Arc<HttpService>>,
    scheduler: Scheduler,
}

impl Host {
    /// Build every configured service and register it
    pub fn new(config: &Config) -> Result<Host, SampleError> {
        let registry = Registry::new(config.warden.clone());
        let mut services = Vec::with_capacity(config.services.len());

        for service_config in config.services.iter() {
            let service = Arc::new(HttpService::from_config(service_config)?);
            info!("Registering {} at {}", service.name(), service.url());
            registry.add_shared(service.clone());
            services.push(service);
        }

        let scheduler = Scheduler::new(registry.clone());
        Ok(Host {
            registry,
            services,
            scheduler,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run a single sweep and return the resulting listing
    pub async fn check_once(&self) -> RegistryListing {
        let report = self.registry.check_all().await;
        info!("Single sweep: {}", report);
        self.registry.list()
    }

    pub fn start(&mut self) -> Result<(), SampleError> {
        self.scheduler.start()?;
        Ok(())
    }

    /// Log the listing every check interval until ctrl-c or TERM is received
    pub async fn watch(&self) -> Result<(), SampleError> {
        let mut sig_terminate = signal(SignalKind::terminate())?;
        let mut ticker =
            tokio::time::interval(self.scheduler.interval().max(Duration::from_millis(1)));
        let ct = self.scheduler.cancellation_token();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received ctrl-c signal");
                    break;
                },
                _ = sig_terminate.recv() => {
                    info!("Received TERM signal");
                    break;
                },
                _ = ct.cancelled() => {
                    info!("Scheduler cancelled");
                    break;
                },
                _ = ticker.tick() => {
                    self.registry.log_listing();
                },
            }
        }
        Ok(())
    }

    /// Stop the scheduler, waiting for any running sweep to finish
    pub fn stop(&mut self) -> Result<(), SampleError> {
        self.scheduler.stop()?;
        info!("Scheduler stopped after {} sweeps", self.scheduler.sweeps());
        Ok(())
    }

    /// Call the stop hook of every service. Failures are logged and counted.
    pub async fn stop_services(&self) -> usize {
        let mut failures = 0;
        for service in self.services.iter() {
            if let Err(err) = service.stop().await {
                error!("[{}] stop failed: {}", service.name(), err);
                failures += 1;
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use url::Url;
    use warden::RegistryConfigBuilder;

    use super::*;
    use crate::config::ServiceConfig;

    fn config() -> Config {
        Config {
            warden: RegistryConfigBuilder::default()
                .check_interval(Duration::from_millis(20))
                .probe_timeout(Some(Duration::from_millis(500)))
                .build()
                .unwrap(),
            services: vec![
                ServiceConfig {
                    name: "orders".to_owned(),
                    url: Url::parse("http://127.0.0.1:9/health").unwrap(),
                },
                ServiceConfig {
                    name: "billing".to_owned(),
                    url: Url::parse("http://127.0.0.1:9/status").unwrap(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn unreachable_services_are_jailed() {
        let host = Host::new(&config()).unwrap();
        assert_eq!(host.registry().len(), 2);
        assert_eq!(host.registry().list().healthy, vec!["billing", "orders"]);

        let listing = host.check_once().await;
        assert!(listing.healthy.is_empty());
        assert_eq!(listing.jailed, vec!["billing", "orders"]);
    }

    #[tokio::test]
    async fn stop_services_calls_hooks() {
        let host = Host::new(&config()).unwrap();

        assert_eq!(host.stop_services().await, 0);
        // second stop finds clients already closed
        assert_eq!(host.stop_services().await, 2);
    }

    #[test]
    fn scheduler_lifecycle() {
        let mut host = Host::new(&config()).unwrap();
        host.start().unwrap();
        std::thread::sleep(Duration::from_millis(100));
        host.stop().unwrap();
        assert!(host.registry().is_jailed("orders"));
    }
}
