//! Default configuration values for memscan

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub initial_capacity: usize,
    pub scan_timeout_ms: u64,
    pub monitor_interval_ms: u64,
    pub min_monitor_addresses: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub with_target: bool,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            initial_capacity: 1024,
            scan_timeout_ms: 0, // no deadline
            monitor_interval_ms: 10_000,
            min_monitor_addresses: 10,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            with_target: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_defaults() {
        let config = default_config();
        assert_eq!(config.scanner.initial_capacity, 1024);
        assert_eq!(config.scanner.scan_timeout_ms, 0);
        assert_eq!(config.scanner.monitor_interval_ms, 10_000);
        assert_eq!(config.scanner.min_monitor_addresses, 10);
    }

    #[test]
    fn test_logging_defaults() {
        let config = default_config();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.with_target);
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("initial_capacity"));
        assert!(serialized.contains("level"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.scanner.initial_capacity,
            config.scanner.initial_capacity
        );
        assert_eq!(deserialized.logging.level, config.logging.level);
    }
}
