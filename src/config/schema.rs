//! Configuration schema types
//!
//! This module defines the configuration structure for Caravan. The pipeline
//! itself is small; configuration covers the request limits the validators
//! enforce, the host-facing batch bounds, and logging.

use serde::{Deserialize, Serialize};

/// Main Caravan configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaravanConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export pipeline limits
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CaravanConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violation found as a `(field, message)` string.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()
    }
}

impl Default for CaravanConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in log output
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("application.name cannot be empty".to_string());
        }
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!(
                "application.log_level must be one of trace, debug, info, warn, error; got '{other}'"
            )),
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Export pipeline limits
///
/// `max_batch_size` bounds how many identifiers one batch activity receives;
/// `batch_thread_count` is the host-facing bound on how many batches run
/// concurrently (the pipeline only validates it); `max_identifiers` caps how
/// many identifiers a single export request may carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Maximum identifiers per dequeued batch (1-1000)
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Maximum concurrently running batches (1-100)
    #[serde(default = "default_batch_thread_count")]
    pub batch_thread_count: usize,

    /// Maximum identifiers in one export request (1-100000)
    #[serde(default = "default_max_identifiers")]
    pub max_identifiers: usize,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_batch_size == 0 || self.max_batch_size > 1_000 {
            return Err(format!(
                "export.max_batch_size must be between 1 and 1000; got {}",
                self.max_batch_size
            ));
        }
        if self.batch_thread_count == 0 || self.batch_thread_count > 100 {
            return Err(format!(
                "export.batch_thread_count must be between 1 and 100; got {}",
                self.batch_thread_count
            ));
        }
        if self.max_identifiers == 0 || self.max_identifiers > 100_000 {
            return Err(format!(
                "export.max_identifiers must be between 1 and 100000; got {}",
                self.max_identifiers
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            batch_thread_count: default_batch_thread_count(),
            max_identifiers: default_max_identifiers(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to console output
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for rotated log files
    #[serde(default = "default_log_path")]
    pub local_path: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when logging.local_enabled is true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
        }
    }
}

fn default_app_name() -> String {
    "caravan".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_batch_size() -> usize {
    100
}

fn default_batch_thread_count() -> usize {
    5
}

fn default_max_identifiers() -> usize {
    10_000
}

fn default_log_path() -> String {
    "./logs".to_string()
}
