//! Built-in defaults (layer 1)
//!
//! Hardcoded fallbacks for every field that must have a value in the
//! effective configuration.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Runtime identifier (default: "nodejs20.x")
    pub runtime: String,

    /// Memory size in MB (default: 1024)
    pub memory_size: u32,

    /// Timeout in seconds (default: 6)
    pub timeout: u32,

    /// Publish a new version on each deploy (default: true)
    pub version_functions: bool,

    /// Deployment stage (default: "dev")
    pub stage: String,

    /// Deployment region (default: "us-east-1")
    pub region: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            runtime: "nodejs20.x".to_string(),
            memory_size: 1024,
            timeout: 6,
            version_functions: true,
            stage: "dev".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.runtime, "nodejs20.x");
        assert_eq!(defaults.memory_size, 1024);
        assert_eq!(defaults.timeout, 6);
        assert!(defaults.version_functions);
        assert_eq!(defaults.stage, "dev");
        assert_eq!(defaults.region, "us-east-1");
    }
}
