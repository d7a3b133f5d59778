use derive_builder::Builder;
use serde::Deserialize;
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::time::Duration;

/// What to do when a name that is currently jailed is registered again
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReregisterPolicy {
    /// Replace the entry but keep it in the jail until a sweep releases it
    #[default]
    Preserve,
    /// Treat the registration as a fresh service instance and mark it healthy
    Reset,
}

#[serde_as]
#[derive(Deserialize, Builder, Debug, Clone, PartialEq)]
#[serde(default)]
#[builder(default)]
pub struct RegistryConfig {
    /// Time to sleep between health sweeps, in seconds (fractions allowed)
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub check_interval: Duration,
    /// Upper bound for a single probe call, in seconds. None waits for ever.
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub probe_timeout: Option<Duration>,
    /// Policy applied when a jailed name is registered again
    pub reregister: ReregisterPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(5),
            probe_timeout: Some(Duration::from_secs(2)),
            reregister: ReregisterPolicy::Preserve,
        }
    }
}
