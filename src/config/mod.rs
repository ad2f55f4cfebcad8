//! Configuration management for Caravan.
//!
//! TOML-based configuration loading with environment variable substitution
//! (`${VAR_NAME}`), typed schema structs, and validation that reports the
//! first violation found.
//!
//! ```rust,no_run
//! use caravan::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("caravan.toml")?;
//! println!("max batch size: {}", config.export.max_batch_size);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{ApplicationConfig, CaravanConfig, ExportConfig, LoggingConfig};
pub use secret::{secret_eq, secret_string, SecretString, SecretValue};
