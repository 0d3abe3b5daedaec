//! Time-based spin animation
//!
//! The [`SpinDriver`] runs the `Idle -> Spinning -> Idle` state machine. It
//! interpolates the wheel rotation against elapsed time from an injected
//! [`Clock`], asks an injected [`FrameScheduler`] for frames, and reports the
//! landed segment exactly once per spin through a [`SpinTicket`].
//!
//! # Submodules
//!
//! - [`clock`] - Time and frame sources
//! - [`driver`] - The spin state machine
//! - [`easing`] - Progress easing curves
//!
//! # Example
//!
//! ```rust
//! use prize_wheel::animation::{FrameOutcome, FrameQueue, ManualClock, SpinDriver, SpinOutcome};
//! use prize_wheel::config::WheelSettings;
//! use prize_wheel::wheel::{Segment, SegmentTarget};
//!
//! let settings = WheelSettings::default()
//!     .with_segments(vec![
//!         Segment::new("1", "Prize 1", "#ff0000"),
//!         Segment::new("2", "Prize 2", "#00ff00"),
//!     ])
//!     .with_predefined_result(SegmentTarget::from("2"));
//!
//! let clock = ManualClock::new();
//! let frames = FrameQueue::new();
//! let mut driver = SpinDriver::new(&settings, clock.clone(), frames.clone());
//!
//! let SpinOutcome::Started(mut ticket) = driver.spin().unwrap() else {
//!     panic!("spin was ignored");
//! };
//!
//! loop {
//!     clock.advance(16.0);
//!     let mut done = false;
//!     for frame in frames.take_pending() {
//!         if let FrameOutcome::Completed(_) = driver.on_frame(frame) {
//!             done = true;
//!         }
//!     }
//!     if done {
//!         break;
//!     }
//! }
//!
//! let result = ticket.try_result().unwrap().unwrap();
//! assert_eq!(result.segment.id, "2");
//! ```

pub mod clock;
pub mod driver;
pub mod easing;

pub use clock::{Clock, FrameId, FrameQueue, FrameScheduler, ManualClock, SystemClock};
pub use driver::{
    FrameOutcome, IgnoreReason, SpinDriver, SpinOutcome, SpinPhase, SpinResult, SpinTicket,
    Subscription, WheelEvent, WheelState,
};
pub use easing::Easing;

use crate::selection::{SelectionError, TargetError, DEFAULT_SPINS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default spin duration in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Animation parameters of a wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of one spin in milliseconds
    pub duration_ms: u64,

    /// Easing applied to the spin progress
    pub easing: Easing,

    /// Full rotations before the wheel settles, at least 1
    pub spins: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            spins: DEFAULT_SPINS,
        }
    }
}

impl AnimationConfig {
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_spins(mut self, spins: u32) -> Self {
        self.spins = spins;
        self
    }
}

/// Errors that make [`SpinDriver::spin`] refuse to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    /// No segment could be drawn
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The predefined result could not be resolved
    #[error(transparent)]
    Target(#[from] TargetError),

    /// The spin was reset or its driver dropped before it completed
    #[error("Spin was cancelled before it completed")]
    Cancelled,
}
