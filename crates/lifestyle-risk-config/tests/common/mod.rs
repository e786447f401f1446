// crates/lifestyle-risk-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for config validation tests.
// =============================================================================

//! Shared config fixtures for the config test binaries.

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]

use lifestyle_risk_config::ConfigError;
use lifestyle_risk_config::RiskConfig;

/// Parses a minimal valid config.
pub fn minimal_config() -> Result<RiskConfig, ConfigError> {
    RiskConfig::from_toml_str(
        r#"
[model]
path = "models/lifestyle-risk-forest.json"
"#,
    )
}

/// Returns `Ok` when `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
