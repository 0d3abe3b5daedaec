//! Wheel domain types
//!
//! This module holds the plain data the rest of the crate works on: the
//! segments a wheel is made of, the ways a caller can name a segment, and the
//! pointer the stopped wheel is read against.
//!
//! # Submodules
//!
//! - [`segment`] - Segment definition, forced-target addressing and lookup results
//! - [`pointer`] - Pointer position and (presentation-only) pointer styling
//!
//! # Example
//!
//! ```rust
//! use prize_wheel::wheel::{PointerPosition, Segment, SegmentTarget};
//!
//! let segments = vec![
//!     Segment::new("1", "Prize 1", "#ff6b6b"),
//!     Segment::new("2", "Prize 2", "#4ecdc4").with_weight(3.0),
//! ];
//!
//! assert_eq!(segments[1].effective_weight(), 3.0);
//! assert_eq!(PointerPosition::Right.offset_degrees(), 90.0);
//! assert_eq!(SegmentTarget::from("2"), SegmentTarget::Id("2".to_string()));
//! ```

pub mod pointer;
pub mod segment;

pub use pointer::{PointerConfig, PointerPosition, PointerStyle};
pub use segment::{Segment, SegmentTarget, SelectedSegment};
