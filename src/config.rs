//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for zest-report, supporting:
//! - Environment variables for service credentials and overrides
//! - Sensible defaults for local runs
//! - Partial overrides merged over defaults (later values win)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ZEST_SERVICE_URL` | External test-management API base URL | (empty) |
//! | `ZEST_SERVICE_API_KEY` | Bearer token for the external API | (empty) |
//! | `ZEST_TEST_CYCLE_KEY` | Test cycle to resolve executions in | (empty) |
//! | `ZEST_OUTPUT_DIR` | Output directory for JSON reports | `test-results` |
//! | `ZEST_SAVE_SCREENSHOTS` | Force disk-saving of screenshots (`true`) | unset |
//!
//! # Example
//!
//! ```bash
//! export ZEST_SERVICE_URL="https://api.example.com/v2/"
//! export ZEST_SERVICE_API_KEY="..."
//! export ZEST_TEST_CYCLE_KEY="CYCLE-42"
//! ```

use serde::Deserialize;
use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default output directory for JSON reports
pub const DEFAULT_OUTPUT_DIR: &str = "test-results";

/// Fixed file name of the persisted JSON report
pub const REPORT_FILE_NAME: &str = "test-results.json";

/// Default delay between successive external pushes (milliseconds)
pub const DEFAULT_PUSH_DELAY_MS: u64 = 3000;

/// Default connection timeout for external API calls (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the external API base URL
pub const ENV_SERVICE_URL: &str = "ZEST_SERVICE_URL";

/// Environment variable for the external API key
pub const ENV_SERVICE_API_KEY: &str = "ZEST_SERVICE_API_KEY";

/// Environment variable for the external test cycle key
pub const ENV_TEST_CYCLE_KEY: &str = "ZEST_TEST_CYCLE_KEY";

/// Environment variable for the report output directory
pub const ENV_OUTPUT_DIR: &str = "ZEST_OUTPUT_DIR";

/// Environment variable forcing screenshots to disk regardless of configuration
pub const ENV_SAVE_SCREENSHOTS: &str = "ZEST_SAVE_SCREENSHOTS";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for zest-report
#[derive(Debug, Clone)]
pub struct Config {
    /// Reporter output settings
    pub reporter: ReporterSettings,
    /// Screenshot capture settings
    pub screenshots: ScreenshotSettings,
    /// External test-management service settings
    pub external: ExternalServiceSettings,
}

/// Reporter output settings
#[derive(Debug, Clone)]
pub struct ReporterSettings {
    /// Save test results to a JSON file
    pub save_json_report: bool,
    /// Output directory for JSON reports
    pub output_dir: String,
    /// Print test results to the console
    pub print_to_console: bool,
}

/// Screenshot capture settings
#[derive(Debug, Clone)]
pub struct ScreenshotSettings {
    /// Enable screenshot capture after steps
    pub enabled: bool,
    /// Include screenshot payloads in the JSON report
    pub include_in_report: bool,
    /// Capture screenshots only when a step fails
    pub only_on_failure: bool,
    /// Capture the full page rather than the viewport
    pub full_page: bool,
    /// Save screenshots to disk at the end of the run
    pub save_to_disk: bool,
}

/// External test-management service settings
#[derive(Debug, Clone)]
pub struct ExternalServiceSettings {
    /// Enable the external integration
    pub enabled: bool,
    /// API base URL (trailing slash expected)
    pub api_url: String,
    /// Bearer token, sourced from the environment
    pub api_key: String,
    /// Test cycle to resolve open executions in
    pub test_cycle_key: String,
    /// Push step results to the external service after the run
    pub update_results: bool,
    /// Delay between successive pushes (milliseconds)
    pub push_delay_ms: u64,
    /// Connection timeout for API calls (seconds)
    pub connect_timeout_secs: u64,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            reporter: ReporterSettings::from_env(),
            screenshots: ScreenshotSettings::defaults(),
            external: ExternalServiceSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            reporter: ReporterSettings::defaults(),
            screenshots: ScreenshotSettings::defaults(),
            external: ExternalServiceSettings::defaults(),
        }
    }

    /// Merge partial overrides over this configuration (later values win)
    pub fn merged(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(r) = &overrides.reporter {
            merge(&mut self.reporter.save_json_report, &r.save_json_report);
            merge(&mut self.reporter.output_dir, &r.output_dir);
            merge(&mut self.reporter.print_to_console, &r.print_to_console);
        }
        if let Some(s) = &overrides.screenshots {
            merge(&mut self.screenshots.enabled, &s.enabled);
            merge(&mut self.screenshots.include_in_report, &s.include_in_report);
            merge(&mut self.screenshots.only_on_failure, &s.only_on_failure);
            merge(&mut self.screenshots.full_page, &s.full_page);
            merge(&mut self.screenshots.save_to_disk, &s.save_to_disk);
        }
        if let Some(e) = &overrides.external {
            merge(&mut self.external.enabled, &e.enabled);
            merge(&mut self.external.api_url, &e.api_url);
            merge(&mut self.external.api_key, &e.api_key);
            merge(&mut self.external.test_cycle_key, &e.test_cycle_key);
            merge(&mut self.external.update_results, &e.update_results);
            merge(&mut self.external.push_delay_ms, &e.push_delay_ms);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl ReporterSettings {
    /// Create reporter settings from environment variables
    pub fn from_env() -> Self {
        Self {
            output_dir: env::var(ENV_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string()),
            ..Self::defaults()
        }
    }

    /// Create reporter settings with defaults
    pub fn defaults() -> Self {
        Self {
            save_json_report: true,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            print_to_console: false,
        }
    }
}

impl ScreenshotSettings {
    /// Create screenshot settings with defaults
    pub fn defaults() -> Self {
        Self {
            enabled: true,
            include_in_report: true,
            only_on_failure: false,
            full_page: true,
            save_to_disk: false,
        }
    }
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ExternalServiceSettings {
    /// Create external service settings from environment variables.
    /// Credentials are never hard-coded; they only come from the environment.
    pub fn from_env() -> Self {
        Self {
            api_url: env::var(ENV_SERVICE_URL).unwrap_or_default(),
            api_key: env::var(ENV_SERVICE_API_KEY).unwrap_or_default(),
            test_cycle_key: env::var(ENV_TEST_CYCLE_KEY).unwrap_or_default(),
            ..Self::defaults()
        }
    }

    /// Create external service settings with defaults (no environment)
    pub fn defaults() -> Self {
        Self {
            enabled: false,
            api_url: String::new(),
            api_key: String::new(),
            test_cycle_key: String::new(),
            update_results: false,
            push_delay_ms: DEFAULT_PUSH_DELAY_MS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// ============================================================================
// Partial Overrides
// ============================================================================

/// Partial configuration merged over defaults, deserializable from JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    /// Reporter overrides
    pub reporter: Option<ReporterOverrides>,
    /// Screenshot overrides
    pub screenshots: Option<ScreenshotOverrides>,
    /// External service overrides
    #[serde(alias = "externalService")]
    pub external: Option<ExternalServiceOverrides>,
}

/// Partial reporter settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterOverrides {
    pub save_json_report: Option<bool>,
    pub output_dir: Option<String>,
    pub print_to_console: Option<bool>,
}

/// Partial screenshot settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotOverrides {
    pub enabled: Option<bool>,
    pub include_in_report: Option<bool>,
    pub only_on_failure: Option<bool>,
    pub full_page: Option<bool>,
    pub save_to_disk: Option<bool>,
}

/// Partial external service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceOverrides {
    pub enabled: Option<bool>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub test_cycle_key: Option<String>,
    pub update_results: Option<bool>,
    pub push_delay_ms: Option<u64>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// True when the environment forces screenshots to disk regardless of config
pub fn screenshots_forced_to_disk() -> bool {
    env::var(ENV_SAVE_SCREENSHOTS)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.reporter.save_json_report);
        assert_eq!(config.reporter.output_dir, DEFAULT_OUTPUT_DIR);
        assert!(!config.reporter.print_to_console);
        assert!(config.screenshots.enabled);
        assert!(!config.screenshots.only_on_failure);
        assert!(!config.external.enabled);
        assert_eq!(config.external.push_delay_ms, DEFAULT_PUSH_DELAY_MS);
    }

    #[test]
    fn test_merge_overrides_later_values_win() {
        let overrides: ConfigOverrides = serde_json::from_str(
            r#"{
                "reporter": { "printToConsole": true, "outputDir": "out" },
                "screenshots": { "onlyOnFailure": true },
                "externalService": { "enabled": true, "updateResults": true }
            }"#,
        )
        .unwrap();

        let config = Config::defaults().merged(&overrides);
        assert!(config.reporter.print_to_console);
        assert_eq!(config.reporter.output_dir, "out");
        // Untouched fields keep their defaults
        assert!(config.reporter.save_json_report);
        assert!(config.screenshots.only_on_failure);
        assert!(config.screenshots.enabled);
        assert!(config.external.enabled);
        assert!(config.external.update_results);
    }

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let config = Config::defaults().merged(&ConfigOverrides::default());
        assert_eq!(config.reporter.output_dir, DEFAULT_OUTPUT_DIR);
        assert!(config.screenshots.include_in_report);
    }
}
