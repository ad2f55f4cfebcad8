//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CaravanConfig;
use crate::domain::errors::CaravanError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CaravanConfig`]
/// 4. Applies `CARAVAN_*` environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, a referenced
/// environment variable is unset, parsing fails, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<CaravanConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CaravanError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CaravanError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CaravanConfig = toml::from_str(&contents)
        .map_err(|e| CaravanError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| CaravanError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. All missing variables are reported at
/// once so a broken deployment surfaces its full shape in one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let substituted = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }
            }
        });
        result.push_str(&substituted);
        result.push('\n');
    }

    if missing_vars.is_empty() {
        Ok(result)
    } else {
        Err(CaravanError::Configuration(format!(
            "Missing environment variables: {}",
            missing_vars.join(", ")
        )))
    }
}

/// Applies `CARAVAN_*` environment variable overrides
fn apply_env_overrides(config: &mut CaravanConfig) -> Result<()> {
    if let Ok(level) = std::env::var("CARAVAN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = level;
    }
    if let Ok(size) = std::env::var("CARAVAN_EXPORT_MAX_BATCH_SIZE") {
        config.export.max_batch_size = parse_override("CARAVAN_EXPORT_MAX_BATCH_SIZE", &size)?;
    }
    if let Ok(count) = std::env::var("CARAVAN_EXPORT_BATCH_THREAD_COUNT") {
        config.export.batch_thread_count =
            parse_override("CARAVAN_EXPORT_BATCH_THREAD_COUNT", &count)?;
    }
    if let Ok(max) = std::env::var("CARAVAN_EXPORT_MAX_IDENTIFIERS") {
        config.export.max_identifiers = parse_override("CARAVAN_EXPORT_MAX_IDENTIFIERS", &max)?;
    }
    Ok(())
}

fn parse_override(name: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| {
        CaravanError::Configuration(format!("{name} must be a positive integer; got '{value}'"))
    })
}
