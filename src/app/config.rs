//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file, with credentials layered in
//! from the environment (never from the file itself) — `dotenvy::dotenv()`
//! runs once at process start, then `Config::load(path)` reads the rest.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

/// `[reasoner]`: which LLM vendor backs the Reasoner Adapter, if any.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReasonerConfig {
    /// `anthropic` | `openai` | `none`. Anything else (or a vendor whose
    /// API key is unset) runs the pipeline rules-only.
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_model() -> String {
    "default".to_string()
}
fn default_max_tokens() -> usize {
    1024
}
fn default_temperature() -> f64 {
    0.3
}
fn default_timeout_ms() -> u64 {
    8_000
}

/// `[thresholds]`: the tunable constants from §9's open questions.
///
/// Safety Gate's own four constants are hard-compiled (§4.2) — these
/// fields exist so an operator can see them, not so they can loosen them.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_safe_max_ratio")]
    pub safe_max_ratio: f64,
    #[serde(default = "default_hard_ceiling_ratio")]
    pub hard_ceiling_ratio: f64,
    #[serde(default = "default_minimum_budget")]
    pub minimum_budget: f64,
    #[serde(default = "default_overpayment_ratio")]
    pub overpayment_ratio: f64,
    #[serde(default = "default_concentration_ratio")]
    pub concentration_ratio: f64,
    #[serde(default = "default_aggression_band")]
    pub aggression_cluster_window: f64,
    #[serde(default = "default_reaction_time_band")]
    pub reaction_time_cluster_window_s: f64,
    #[serde(default = "default_min_cluster_samples")]
    pub min_cluster_samples: u32,
}

fn default_safe_max_ratio() -> f64 {
    0.70
}
fn default_hard_ceiling_ratio() -> f64 {
    0.80
}
fn default_minimum_budget() -> f64 {
    100.0
}
fn default_overpayment_ratio() -> f64 {
    1.30
}
fn default_concentration_ratio() -> f64 {
    0.50
}
fn default_aggression_band() -> f64 {
    2.0
}
fn default_reaction_time_band() -> f64 {
    60.0
}
fn default_min_cluster_samples() -> u32 {
    5
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            safe_max_ratio: default_safe_max_ratio(),
            hard_ceiling_ratio: default_hard_ceiling_ratio(),
            minimum_budget: default_minimum_budget(),
            overpayment_ratio: default_overpayment_ratio(),
            concentration_ratio: default_concentration_ratio(),
            aggression_cluster_window: default_aggression_band(),
            reaction_time_cluster_window_s: default_reaction_time_band(),
            min_cluster_samples: default_min_cluster_samples(),
        }
    }
}

impl ThresholdsConfig {
    /// Refuse a configuration that would loosen Safety Gate's hard-compiled
    /// contract (§4.2/§10: thresholds may only tighten it further).
    fn validate(&self) -> Result<(), ConfigError> {
        if self.safe_max_ratio <= 0.0 || self.safe_max_ratio > self.hard_ceiling_ratio {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.safe_max_ratio",
                reason: "must be positive and not exceed hard_ceiling_ratio".to_string(),
            });
        }
        if self.hard_ceiling_ratio <= 0.0 || self.hard_ceiling_ratio > 0.80 {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.hard_ceiling_ratio",
                reason: "must be positive and no looser than the compiled-in 0.80 ceiling".to_string(),
            });
        }
        if self.overpayment_ratio < 1.30 {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.overpayment_ratio",
                reason: "must be at least the compiled-in 1.30 floor".to_string(),
            });
        }
        if self.concentration_ratio <= 0.0 || self.concentration_ratio > 0.50 {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.concentration_ratio",
                reason: "must be positive and no looser than the compiled-in 0.50 ceiling".to_string(),
            });
        }
        Ok(())
    }
}

/// `[store]`: the SQLite-backed history store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> String {
    "closeout.sqlite".to_string()
}
fn default_pool_size() -> u32 {
    5
}
fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// `[intelligence]`: where the three pattern-statistics tables live.
#[derive(Debug, Clone, Deserialize)]
pub struct IntelligenceConfig {
    #[serde(default = "default_tables_dir")]
    pub tables_dir: String,
    /// Reload interval in seconds; 0 disables periodic reload.
    #[serde(default)]
    pub reload_interval_s: u64,
}

fn default_tables_dir() -> String {
    "tables".to_string()
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self {
            tables_dir: default_tables_dir(),
            reload_interval_s: 0,
        }
    }
}

/// `[logging]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reasoner: ReasonerConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub intelligence: IntelligenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate configuration from `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file can't be read,
    /// [`ConfigError::Parse`] if it isn't valid TOML, or
    /// [`ConfigError::InvalidValue`]/[`ConfigError::MissingField`] if a
    /// validation rule fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.store.database_path.is_empty() {
            return Err(ConfigError::MissingField {
                field: "store.database_path",
            });
        }
        if self.intelligence.tables_dir.is_empty() {
            return Err(ConfigError::MissingField {
                field: "intelligence.tables_dir",
            });
        }
        if let Some(vendor) = &self.reasoner.vendor {
            if !matches!(vendor.as_str(), "anthropic" | "openai" | "none") {
                return Err(ConfigError::InvalidValue {
                    field: "reasoner.vendor",
                    reason: format!("unknown vendor {vendor:?}, expected anthropic|openai|none"),
                });
            }
        }
        Ok(())
    }

    /// Whether the configured reasoner is usable: a known vendor with its
    /// credential present in the environment.
    #[must_use]
    pub fn reasoner_configured(&self) -> bool {
        match self.reasoner.vendor.as_deref() {
            Some("anthropic") => std::env::var("ANTHROPIC_API_KEY").is_ok(),
            Some("openai") => std::env::var("OPENAI_API_KEY").is_ok(),
            _ => false,
        }
    }

    /// Initialize the global `tracing` subscriber from `[logging]`.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("closeout-config-test-{}.toml", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn empty_file_loads_with_defaults() {
        let path = write_config("");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.thresholds.safe_max_ratio, 0.70);
        assert_eq!(config.store.database_path, "closeout.sqlite");
    }

    #[test]
    fn unknown_vendor_fails_validation() {
        let path = write_config("[reasoner]\nvendor = \"cohere\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn loosened_hard_ceiling_fails_validation() {
        let path = write_config("[thresholds]\nhard_ceiling_ratio = 0.95\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn loosened_overpayment_floor_fails_validation() {
        let path = write_config("[thresholds]\noverpayment_ratio = 1.10\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load("/nonexistent/closeout-config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn reasoner_not_configured_when_vendor_is_none() {
        let path = write_config("[reasoner]\nvendor = \"none\"\n");
        let config = Config::load(&path).unwrap();
        assert!(!config.reasoner_configured());
    }
}
