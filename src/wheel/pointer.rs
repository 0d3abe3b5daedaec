//! Pointer configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the fixed pointer sits around the wheel
///
/// Offsets are measured clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPosition {
    /// 12 o'clock
    #[default]
    Top,
    /// 3 o'clock
    Right,
    /// 6 o'clock
    Bottom,
    /// 9 o'clock
    Left,
}

impl PointerPosition {
    /// All positions, clockwise from the top
    pub const ALL: [PointerPosition; 4] = [
        PointerPosition::Top,
        PointerPosition::Right,
        PointerPosition::Bottom,
        PointerPosition::Left,
    ];

    /// Clockwise offset from the top in degrees
    pub fn offset_degrees(self) -> f64 {
        match self {
            PointerPosition::Top => 0.0,
            PointerPosition::Right => 90.0,
            PointerPosition::Bottom => 180.0,
            PointerPosition::Left => 270.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PointerPosition::Top => "top",
            PointerPosition::Right => "right",
            PointerPosition::Bottom => "bottom",
            PointerPosition::Left => "left",
        }
    }
}

impl fmt::Display for PointerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointerPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(PointerPosition::Top),
            "right" => Ok(PointerPosition::Right),
            "bottom" => Ok(PointerPosition::Bottom),
            "left" => Ok(PointerPosition::Left),
            other => Err(format!(
                "Unknown pointer position: {}. Valid positions are: top, right, bottom, left",
                other
            )),
        }
    }
}

/// Pointer shape; only the presentation layer looks at it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerStyle {
    #[default]
    Arrow,
    Triangle,
    Circle,
}

/// Pointer settings handed over by the presentation layer
///
/// Only `position` influences the core; the rest is carried so a complete
/// wheel definition round-trips through configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Where the pointer sits
    #[serde(default)]
    pub position: PointerPosition,

    /// Pointer shape
    #[serde(default)]
    pub style: PointerStyle,

    /// Pointer fill colour
    #[serde(default = "default_pointer_color")]
    pub color: String,

    /// Pointer size in pixels
    #[serde(default = "default_pointer_size")]
    pub size: u32,
}

fn default_pointer_color() -> String {
    "#ff0000".to_string()
}

fn default_pointer_size() -> u32 {
    20
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            position: PointerPosition::default(),
            style: PointerStyle::default(),
            color: default_pointer_color(),
            size: default_pointer_size(),
        }
    }
}

impl PointerConfig {
    /// Default pointer at the given position
    pub fn at(position: PointerPosition) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
