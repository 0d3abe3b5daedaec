//! Wheel settings and configuration management.
//!
//! This module loads a complete wheel definition (segments, animation, pointer
//! and spin controls) from multiple configuration sources with proper
//! precedence.

use crate::animation::{AnimationConfig, Easing};
use crate::wheel::{PointerConfig, PointerPosition, Segment, SegmentTarget};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest spin duration accepted, in milliseconds
pub const MAX_DURATION_MS: u64 = 600_000;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Complete wheel definition.
///
/// Holds everything a [`SpinDriver`](crate::animation::SpinDriver) needs. The
/// segment list is checked by [`validate`](crate::validation::validate) when a
/// driver is built; [`WheelSettings::validate`] covers the remaining
/// parameters.
///
/// # Configuration Precedence
///
/// Settings are applied in the following order (later sources override earlier):
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
/// 4. CLI arguments
///
/// # Example
///
/// ```rust
/// use prize_wheel::config::WheelSettings;
/// use prize_wheel::wheel::{PointerPosition, Segment};
///
/// let settings = WheelSettings::default()
///     .with_segments(vec![
///         Segment::new("1", "Prize 1", "#ff0000"),
///         Segment::new("2", "Prize 2", "#00ff00"),
///     ])
///     .with_pointer_position(PointerPosition::Right)
///     .with_spins(8);
///
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelSettings {
    /// Refuse spins while set.
    #[serde(default)]
    pub disabled: bool,

    /// Force every spin onto this segment (index or id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_result: Option<SegmentTarget>,

    /// Animation parameters.
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Pointer configuration.
    #[serde(default)]
    pub pointer: PointerConfig,

    /// Wheel segments in clockwise order.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl WheelSettings {
    /// Creates a new WheelSettings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use prize_wheel::config::WheelSettings;
    ///
    /// let settings = WheelSettings::from_file("wheel.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match file_extension(path).as_str() {
            "toml" => Ok(toml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Saves settings to a configuration file.
    ///
    /// The format is determined by the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let content = match file_extension(path).as_str() {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Loads settings from environment variables.
    ///
    /// Environment variables are prefixed with `PRIZE_WHEEL_`:
    /// - `PRIZE_WHEEL_DURATION_MS`
    /// - `PRIZE_WHEEL_EASING`
    /// - `PRIZE_WHEEL_SPINS`
    /// - `PRIZE_WHEEL_POINTER`
    /// - `PRIZE_WHEEL_DISABLED`
    /// - `PRIZE_WHEEL_TARGET_INDEX`
    /// - `PRIZE_WHEEL_TARGET_ID`
    ///
    /// Values that do not parse are ignored.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Applies environment variable overrides to current settings.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PRIZE_WHEEL_DURATION_MS") {
            if let Ok(duration) = val.parse() {
                self.animation.duration_ms = duration;
            }
        }

        if let Ok(val) = env::var("PRIZE_WHEEL_EASING") {
            if let Ok(easing) = val.parse::<Easing>() {
                self.animation.easing = easing;
            }
        }

        if let Ok(val) = env::var("PRIZE_WHEEL_SPINS") {
            if let Ok(spins) = val.parse() {
                self.animation.spins = spins;
            }
        }

        if let Ok(val) = env::var("PRIZE_WHEEL_POINTER") {
            if let Ok(position) = val.parse::<PointerPosition>() {
                self.pointer.position = position;
            }
        }

        if let Ok(val) = env::var("PRIZE_WHEEL_DISABLED") {
            self.disabled = val.to_lowercase() == "true" || val == "1";
        }

        // An id wins over an index when both are set
        if let Ok(val) = env::var("PRIZE_WHEEL_TARGET_INDEX") {
            if let Ok(index) = val.parse::<usize>() {
                self.predefined_result = Some(SegmentTarget::Index(index));
            }
        }

        if let Ok(val) = env::var("PRIZE_WHEEL_TARGET_ID") {
            if !val.is_empty() {
                self.predefined_result = Some(SegmentTarget::Id(val));
            }
        }
    }

    /// Merges current settings with environment variable overrides.
    pub fn merge_with_env(mut self) -> Self {
        self.apply_env_overrides();
        self
    }

    /// Merges settings with CLI arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prize_wheel::config::{CliArgs, WheelSettings};
    ///
    /// let args = CliArgs {
    ///     spins: Some(3),
    ///     target_index: Some(1),
    ///     ..Default::default()
    /// };
    ///
    /// let settings = WheelSettings::default().merge_with_args(&args);
    /// assert_eq!(settings.animation.spins, 3);
    /// ```
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        if let Some(duration) = args.duration_ms {
            self.animation.duration_ms = duration;
        }
        if let Some(easing) = args.easing {
            self.animation.easing = easing;
        }
        if let Some(spins) = args.spins {
            self.animation.spins = spins;
        }
        if let Some(position) = args.pointer {
            self.pointer.position = position;
        }
        if let Some(disabled) = args.disabled {
            self.disabled = disabled;
        }
        if let Some(index) = args.target_index {
            self.predefined_result = Some(SegmentTarget::Index(index));
        }
        if let Some(ref id) = args.target_id {
            self.predefined_result = Some(SegmentTarget::Id(id.clone()));
        }

        self
    }

    /// Validates the non-segment parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation.spins == 0 {
            return Err(ConfigError::ValidationError(
                "Spins must be at least 1".to_string(),
            ));
        }
        if self.animation.duration_ms > MAX_DURATION_MS {
            return Err(ConfigError::ValidationError(format!(
                "Duration cannot exceed {}ms (10 minutes)",
                MAX_DURATION_MS
            )));
        }
        if self.pointer.size == 0 {
            return Err(ConfigError::ValidationError(
                "Pointer size must be at least 1 pixel".to_string(),
            ));
        }

        Ok(())
    }

    // Builder-style methods for convenient configuration

    /// Sets the segments.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Sets the animation parameters.
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Sets the number of full rotations per spin.
    pub fn with_spins(mut self, spins: u32) -> Self {
        self.animation.spins = spins;
        self
    }

    /// Sets the pointer configuration.
    pub fn with_pointer(mut self, pointer: PointerConfig) -> Self {
        self.pointer = pointer;
        self
    }

    /// Moves the pointer.
    pub fn with_pointer_position(mut self, position: PointerPosition) -> Self {
        self.pointer.position = position;
        self
    }

    /// Enables or disables the wheel.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Forces the result of every spin.
    pub fn with_predefined_result(mut self, target: impl Into<SegmentTarget>) -> Self {
        self.predefined_result = Some(target.into());
        self
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// CLI argument structure for parsing command line options.
///
/// All fields are optional to allow partial overrides.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Spin duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Easing curve.
    pub easing: Option<Easing>,
    /// Full rotations per spin.
    pub spins: Option<u32>,
    /// Pointer position.
    pub pointer: Option<PointerPosition>,
    /// Disable the wheel.
    pub disabled: Option<bool>,
    /// Force the result by index.
    pub target_index: Option<usize>,
    /// Force the result by id.
    pub target_id: Option<String>,
    /// Configuration file path.
    pub config_file: Option<PathBuf>,
}

impl CliArgs {
    /// Creates an empty CliArgs instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the final settings by applying the full configuration chain.
    ///
    /// This method handles the complete configuration precedence:
    /// 1. Default values
    /// 2. Configuration file (if specified)
    /// 3. Environment variables
    /// 4. CLI arguments (self)
    pub fn load_settings(&self) -> Result<WheelSettings, ConfigError> {
        let mut settings = if let Some(ref config_file) = self.config_file {
            WheelSettings::from_file(config_file)?
        } else {
            WheelSettings::default()
        };

        settings = settings.merge_with_env();
        settings = settings.merge_with_args(self);
        settings.validate()?;

        Ok(settings)
    }
}
