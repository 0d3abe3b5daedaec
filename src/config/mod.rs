//! Configuration module for the prize wheel.
//!
//! This module provides configuration management for a wheel, including:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use prize_wheel::config::WheelSettings;
//!
//! // Load from a specific file
//! let settings = WheelSettings::from_file("wheel.toml").unwrap();
//!
//! // Override with environment variables
//! let settings = settings.merge_with_env();
//! ```

mod settings;

pub use settings::{CliArgs, ConfigError, WheelSettings, MAX_DURATION_MS};
