use std::path::Path;

use serde::Deserialize;
use url::Url;
use warden::RegistryConfig;

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};

/// A subordinate service to watch over HTTP
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    /// Health endpoint, any 2xx reply is healthy
    pub url: Url,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub warden: RegistryConfig,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl Config {
    /// Load from a YAML file, then let `WARDEN_` prefixed variables override it
    /// (eg `WARDEN_WARDEN__CHECK_INTERVAL=1`).
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("WARDEN_").split("__"))
    }
}
