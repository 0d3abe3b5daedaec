//! # Prize Wheel
//!
//! The core of a "wheel of fortune" prize selector, independent of any
//! rendering layer.
//!
//! ## Features
//!
//! - **Weighted Selection**: Roulette-style draws over enabled segments
//! - **Angle Geometry**: Target rotation for a segment and the segment under the pointer for a rotation
//! - **Validation**: Segment list checks with sanitized copies
//! - **Spin Animation**: Time-based, frame-driven state machine with easing
//! - **Flexible Configuration**: TOML/JSON files, environment variables, CLI arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use prize_wheel::selection::{pick_weighted, segment_at_rotation, target_rotation};
//! use prize_wheel::validation::validate;
//! use prize_wheel::wheel::{PointerPosition, Segment, SegmentTarget};
//!
//! let segments = vec![
//!     Segment::new("1", "Prize 1", "#ff0000").with_weight(2.0),
//!     Segment::new("2", "Prize 2", "#00ff00"),
//!     Segment::new("3", "Prize 3", "#0000ff"),
//! ];
//!
//! let report = validate(&segments);
//! assert!(report.is_valid());
//!
//! let picked = pick_weighted(&report.segments).unwrap();
//! let target = SegmentTarget::Index(picked.index);
//! let rotation = target_rotation(&report.segments, &target, 5, PointerPosition::Top).unwrap();
//!
//! let landed = segment_at_rotation(&report.segments, rotation, PointerPosition::Top).unwrap();
//! assert_eq!(landed.index, picked.index);
//! ```
//!
//! ## Module Overview
//!
//! - [`wheel`]: Segment and pointer types
//! - [`selection`]: Weighted sampler and angle geometry
//! - [`validation`]: Segment list validation and text sanitization
//! - [`animation`]: Spin driver, easing, clock and frame sources
//! - [`config`]: Configuration loading and management
//!
//! ## Architecture
//!
//! ```text
//!   settings ──> validation ──> SpinDriver::spin
//!                                  │
//!                     selection (pick + target rotation)
//!                                  │
//!            on_frame ──> eased rotation ──> segment_at_rotation ──> SpinResult
//! ```
//!
//! ## Angle Convention
//!
//! Rotation is clockwise-positive in degrees. Segment 0 starts at the
//! 3 o'clock position of the unrotated wheel and segments follow clockwise.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Segment and pointer types.
pub mod wheel;

/// Weighted selection and wheel angle geometry.
pub mod selection;

/// Segment list validation and text sanitization.
pub mod validation;

/// Spin state machine, easing, and injectable time sources.
pub mod animation;

/// Configuration management for loading settings from files, env, and CLI.
pub mod config;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

// Wheel types
pub use wheel::{PointerConfig, PointerPosition, PointerStyle, Segment, SegmentTarget, SelectedSegment};

// Selection types
pub use selection::{
    pick_weighted, segment_at_rotation, target_rotation, SelectionError, TargetError,
};

// Validation types
pub use validation::{validate, ValidationError, ValidationReport};

// Animation types
pub use animation::{
    AnimationConfig, Clock, Easing, FrameQueue, FrameScheduler, ManualClock, SpinDriver,
    SpinError, SpinOutcome, SpinResult, SystemClock, WheelEvent, WheelState,
};

// Config types
pub use config::{CliArgs, ConfigError, WheelSettings};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use prize_wheel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{
        Easing, FrameOutcome, FrameQueue, ManualClock, SpinDriver, SpinOutcome, SystemClock,
    };
    pub use crate::config::WheelSettings;
    pub use crate::selection::{pick_weighted, segment_at_rotation, target_rotation};
    pub use crate::validation::validate;
    pub use crate::wheel::{PointerPosition, Segment, SegmentTarget};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
