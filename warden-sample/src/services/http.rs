use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use url::Url;
use warden::{ProbeError, Service, WardenError};

use crate::config::ServiceConfig;

/// A service reached over HTTP. Healthy while its health endpoint answers 2xx.
///
/// `stop` drops the client (closing pooled connections) and `restart` builds a new one.
#[derive(Debug)]
pub struct HttpService {
    name: String,
    url: Url,
    client: Mutex<Option<Client>>,
}

impl HttpService {
    pub fn new<S: Into<String>>(name: S, url: Url) -> Result<Self, reqwest::Error> {
        Ok(Self {
            name: name.into(),
            url,
            client: Mutex::new(Some(Client::builder().build()?)),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        HttpService::new(config.name.clone(), config.url.clone())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn client(&self) -> MutexGuard<'_, Option<Client>> {
        self.client.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Service for HttpService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> Result<(), ProbeError> {
        let client = self
            .client()
            .clone()
            .ok_or_else(|| ProbeError::Failed("stopped".to_owned()))?;

        let reply = client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| ProbeError::Failed(format!("request to {} failed: {}", self.url, err)))?;

        if reply.status().is_success() {
            Ok(())
        } else {
            Err(ProbeError::Failed(format!(
                "{} replied {}",
                self.url,
                reply.status()
            )))
        }
    }

    async fn restart(&self) -> Result<(), WardenError> {
        let client = Client::builder()
            .build()
            .map_err(|err| WardenError::Message(format!("failed to build client: {}", err)))?;
        *self.client() = Some(client);
        info!("[{}] client restarted", self.name);
        Ok(())
    }

    async fn stop(&self) -> Result<(), WardenError> {
        match self.client().take() {
            Some(_client) => {
                info!("[{}] client closed", self.name);
                Ok(())
            }
            None => Err(WardenError::Message(format!(
                "[{}] client already closed",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> HttpService {
        // port 9 (discard) on loopback is not expected to answer http
        HttpService::new("nobody", Url::parse("http://127.0.0.1:9/health").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails() {
        let service = unreachable();
        let reply = service.health_check().await;
        match reply {
            Err(ProbeError::Failed(cause)) => assert!(cause.contains("127.0.0.1:9")),
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[tokio::test]
    async fn stop_and_restart_hooks() {
        let service = unreachable();

        service.stop().await.unwrap();
        assert_eq!(
            service.health_check().await,
            Err(ProbeError::Failed("stopped".to_owned()))
        );
        assert!(service.stop().await.is_err());

        service.restart().await.unwrap();
        assert_ne!(
            service.health_check().await,
            Err(ProbeError::Failed("stopped".to_owned()))
        );
    }

    #[test]
    fn from_config_keeps_name_and_url() {
        let config = ServiceConfig {
            name: "orders".to_owned(),
            url: Url::parse("http://localhost:8080/health").unwrap(),
        };
        let service = HttpService::from_config(&config).unwrap();
        assert_eq!(service.name(), "orders");
        assert_eq!(service.url().path(), "/health");
    }
}
