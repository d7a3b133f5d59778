use serde::Serialize;
use std::fmt::{self, Display};

/// Partition a registered service currently belongs to
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Jailed,
}

impl Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Healthy => write!(f, "healthy"),
            ServiceStatus::Jailed => write!(f, "jailed"),
        }
    }
}

/// Names of registered services split by partition, each sorted
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryListing {
    pub healthy: Vec<String>,
    pub jailed: Vec<String>,
}

impl RegistryListing {
    pub fn len(&self) -> usize {
        self.healthy.len() + self.jailed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.healthy.is_empty() && self.jailed.is_empty()
    }
}

impl Display for RegistryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "healthy: [{}] jailed: [{}]",
            self.healthy.join(", "),
            self.jailed.join(", ")
        )
    }
}

/// Outcome of one sweep over the registry
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Every name probed in this sweep
    pub checked: Vec<String>,
    /// Names moved from healthy to jailed
    pub jailed: Vec<String>,
    /// Names moved from jailed back to healthy
    pub released: Vec<String>,
}

impl Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checked {} jailed [{}] released [{}]",
            self.checked.len(),
            self.jailed.join(", "),
            self.released.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_display() {
        let listing = RegistryListing {
            healthy: vec!["alpha".to_owned(), "beta".to_owned()],
            jailed: vec!["gamma".to_owned()],
        };
        assert_eq!(listing.to_string(), "healthy: [alpha, beta] jailed: [gamma]");
        assert_eq!(listing.len(), 3);
        assert!(!listing.is_empty());
        assert!(RegistryListing::default().is_empty());
    }

    #[test]
    fn listing_json() {
        let listing = RegistryListing {
            healthy: vec!["alpha".to_owned()],
            jailed: vec![],
        };
        assert_eq!(
            serde_json::to_string(&listing).unwrap(),
            r#"{"healthy":["alpha"],"jailed":[]}"#
        );
        assert_eq!(
            serde_json::to_string(&ServiceStatus::Jailed).unwrap(),
            r#""jailed""#
        );
    }
}
