//! Segment list validation
//!
//! A wheel only spins when its segment list passes every check here. The
//! checks never stop at the first problem: all errors are collected so the
//! presentation layer can show the complete list, and a single error makes the
//! whole list invalid.
//!
//! # Submodules
//!
//! - [`sanitize`] - Text cleanup applied to every segment label
//! - [`color`] - CSS colour grammar and contrast colour
//!
//! # Example
//!
//! ```rust
//! use prize_wheel::validation::validate;
//! use prize_wheel::wheel::Segment;
//!
//! let report = validate(&[
//!     Segment::new("1", "Prize <1>", "#ff0000"),
//!     Segment::new("2", "Prize 2", "invalid-color"),
//! ]);
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.messages(), vec!["Segment 2: Invalid color format".to_string()]);
//! assert_eq!(report.segments[0].text, "Prize 1");
//! ```

pub mod color;
pub mod sanitize;

pub use color::{contrast_color, is_valid_color};
pub use sanitize::{sanitize_text, MAX_TEXT_LENGTH};

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::wheel::Segment;

/// Fewest segments a wheel may have
pub const MIN_SEGMENTS: usize = 2;

/// Most segments a wheel may have
pub const MAX_SEGMENTS: usize = 100;

/// Required segment fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    Text,
    Color,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Id => write!(f, "id"),
            RequiredField::Text => write!(f, "text"),
            RequiredField::Color => write!(f, "color"),
        }
    }
}

/// Segment fields holding a colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Color,
    TextColor,
    BorderColor,
}

impl fmt::Display for ColorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorField::Color => write!(f, "color"),
            ColorField::TextColor => write!(f, "text color"),
            ColorField::BorderColor => write!(f, "border color"),
        }
    }
}

/// A single problem found in a segment list
///
/// Segment positions in messages are 1-based; the `index` fields are 0-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Untyped input was not a list
    #[error("Segments must be a valid array")]
    NotAnArray,

    /// A list whose entries could not be read as segments
    #[error("Segments could not be read: {0}")]
    Malformed(String),

    #[error("Wheel must have at least {min} segments", min = MIN_SEGMENTS)]
    TooFewSegments { count: usize },

    #[error("Wheel cannot have more than {max} segments", max = MAX_SEGMENTS)]
    TooManySegments { count: usize },

    #[error("Segment {}: Missing required '{field}' property", .index + 1)]
    MissingField { index: usize, field: RequiredField },

    #[error("Segment {}: Invalid {field} format", .index + 1)]
    InvalidColor {
        index: usize,
        field: ColorField,
        value: String,
    },

    /// Weight that is zero, negative or not finite
    #[error("Segment {}: Weight must be positive", .index + 1)]
    NonPositiveWeight { index: usize, weight: f64 },

    /// Every id used by more than one segment, each named once
    #[error("Duplicate segment IDs: {}", .ids.join(", "))]
    DuplicateIds { ids: Vec<String> },
}

/// Outcome of validating a segment list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Every problem found, in discovery order
    pub errors: Vec<ValidationError>,

    /// Copy of the input with sanitized text; the list consumers should use
    pub segments: Vec<Segment>,
}

impl ValidationReport {
    /// True when no errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable error messages
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validates a segment list
///
/// Checks cardinality (2 to 100 segments), required fields, colour formats,
/// weights and id uniqueness. Text is sanitized with [`sanitize_text`]; the
/// sanitized copy is returned in [`ValidationReport::segments`] and the input
/// is left untouched.
pub fn validate(segments: &[Segment]) -> ValidationReport {
    let mut errors = Vec::new();

    if segments.len() < MIN_SEGMENTS {
        errors.push(ValidationError::TooFewSegments {
            count: segments.len(),
        });
    }

    if segments.len() > MAX_SEGMENTS {
        errors.push(ValidationError::TooManySegments {
            count: segments.len(),
        });
    }

    let mut sanitized = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let mut clean = segment.clone();

        if segment.id.is_empty() {
            errors.push(ValidationError::MissingField {
                index,
                field: RequiredField::Id,
            });
        }

        // A label made only of stripped characters is as missing as an empty one.
        clean.text = sanitize_text(&segment.text);
        if clean.text.is_empty() {
            errors.push(ValidationError::MissingField {
                index,
                field: RequiredField::Text,
            });
        }

        if segment.color.is_empty() {
            errors.push(ValidationError::MissingField {
                index,
                field: RequiredField::Color,
            });
        } else if !is_valid_color(&segment.color) {
            errors.push(invalid_color(index, ColorField::Color, &segment.color));
        }

        if let Some(color) = segment.text_color.as_deref().filter(|c| !c.is_empty()) {
            if !is_valid_color(color) {
                errors.push(invalid_color(index, ColorField::TextColor, color));
            }
        }

        if let Some(color) = segment.border_color.as_deref().filter(|c| !c.is_empty()) {
            if !is_valid_color(color) {
                errors.push(invalid_color(index, ColorField::BorderColor, color));
            }
        }

        if let Some(weight) = segment.weight {
            if !(weight > 0.0 && weight.is_finite()) {
                errors.push(ValidationError::NonPositiveWeight { index, weight });
            }
        }

        sanitized.push(clean);
    }

    let duplicates = duplicate_ids(segments);
    if !duplicates.is_empty() {
        errors.push(ValidationError::DuplicateIds { ids: duplicates });
    }

    if !errors.is_empty() {
        debug!("Segment validation found {} error(s)", errors.len());
    }

    ValidationReport {
        errors,
        segments: sanitized,
    }
}

/// Validates untyped input, such as a JSON value taken straight from a host
///
/// # Example
///
/// ```rust
/// use prize_wheel::validation::{validate_value, ValidationError};
///
/// let report = validate_value(&serde_json::json!({"id": "1"}));
/// assert_eq!(report.errors, vec![ValidationError::NotAnArray]);
/// ```
pub fn validate_value(value: &serde_json::Value) -> ValidationReport {
    if !value.is_array() {
        return ValidationReport {
            errors: vec![ValidationError::NotAnArray],
            segments: Vec::new(),
        };
    }

    match serde_json::from_value::<Vec<Segment>>(value.clone()) {
        Ok(segments) => validate(&segments),
        Err(e) => ValidationReport {
            errors: vec![ValidationError::Malformed(e.to_string())],
            segments: Vec::new(),
        },
    }
}

fn invalid_color(index: usize, field: ColorField, value: &str) -> ValidationError {
    ValidationError::InvalidColor {
        index,
        field,
        value: value.to_string(),
    }
}

/// Ids used more than once, in order of their first repeat
fn duplicate_ids(segments: &[Segment]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for segment in segments.iter().filter(|s| !s.id.is_empty()) {
        if !seen.insert(segment.id.as_str()) && reported.insert(segment.id.as_str()) {
            duplicates.push(segment.id.clone());
        }
    }

    duplicates
}
