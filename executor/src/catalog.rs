//! Known-service whitelist for the executor.
//!
//! The executor only acts on service keys listed here; everything else is
//! answered with an unknown-service failure before any docker call is made.

use std::collections::HashSet;

/// Environment variable naming the manageable services, comma-separated.
pub const SERVICES_ENV_VAR: &str = "STEWARD_EXECUTOR_SERVICES";

#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    keys: HashSet<String>,
}

impl ServiceCatalog {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Catalog read from [`SERVICES_ENV_VAR`]. Unset or blank means empty.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_list(&std::env::var(SERVICES_ENV_VAR).unwrap_or_default())
    }

    /// Parse a comma-separated service list, dropping blanks.
    #[must_use]
    pub fn from_list(listed: &str) -> Self {
        Self::new(
            listed
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty()),
        )
    }

    #[must_use]
    pub fn is_known(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_trimmed_and_blank_entries_dropped() {
        let catalog = ServiceCatalog::from_list(" svc-a, svc-b ,,");
        assert!(catalog.is_known("svc-a"));
        assert!(catalog.is_known("svc-b"));
        assert!(!catalog.is_known("svc-c"));
        assert!(!catalog.is_known(""));
    }

    #[test]
    fn blank_list_knows_nothing() {
        let catalog = ServiceCatalog::from_list("");
        assert!(!catalog.is_known("svc-a"));
    }
}
