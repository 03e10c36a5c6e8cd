//! Global kill-switch for remote mutating calls.

use crate::config::SearchSyncConfig;

/// Decides, once, whether any settings push, upsert or delete may reach the
/// remote service.
///
/// A closed gate turns every mutating operation into a silent no-op. It is
/// consulted before any other work, so automated tests and ad hoc scripts
/// never touch the remote index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingGate {
    enabled: bool,
}

impl IndexingGate {
    /// Compute the gate from configuration.
    pub fn from_config(config: &SearchSyncConfig) -> Self {
        Self {
            enabled: config.indexing_enabled(),
        }
    }

    pub fn open() -> Self {
        Self { enabled: true }
    }

    pub fn closed() -> Self {
        Self { enabled: false }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_from_config() {
        let config = SearchSyncConfig {
            environment: "test".to_string(),
            ..SearchSyncConfig::default()
        };
        assert!(!IndexingGate::from_config(&config).enabled());
        assert!(IndexingGate::from_config(&config.with_indexing_disabled(false)).enabled());
        assert!(IndexingGate::from_config(&SearchSyncConfig::default()).enabled());
    }
}
