//! Segment definition and addressing
//!
//! A [`Segment`] is one wedge of the wheel. Its weight decides both its share
//! of the wheel's circumference and its chance of being picked; the two are
//! proportional, never independent.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::contrast_color;

/// Weight assumed for segments that do not declare one
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One wedge of the wheel
///
/// Field names serialize in camelCase (`textColor`, `borderWidth`, ...) so the
/// same JSON a web front end already uses can be loaded unchanged.
///
/// The required string fields (`id`, `text`, `color`) default to empty when
/// absent from a configuration file. An empty value is reported by
/// [`validate`](crate::validation::validate) as a missing field instead of
/// failing the whole parse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Unique identifier within the wheel
    #[serde(default)]
    pub id: String,

    /// Display text
    #[serde(default)]
    pub text: String,

    /// Background colour (any CSS colour accepted by the validator)
    #[serde(default)]
    pub color: String,

    /// Text colour; defaults to the contrast colour of `color`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    /// Selection weight, strictly positive; defaults to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Border colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    /// Border width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,

    /// Disabled segments keep their area on the wheel but are never selected
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl Segment {
    /// Creates an enabled segment with the default weight
    ///
    /// # Example
    ///
    /// ```rust
    /// use prize_wheel::wheel::Segment;
    ///
    /// let segment = Segment::new("jackpot", "Jackpot", "#ffd700");
    /// assert!(segment.is_enabled());
    /// assert_eq!(segment.effective_weight(), 1.0);
    /// ```
    pub fn new(id: impl Into<String>, text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    /// Sets the selection weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets an explicit text colour.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Sets the border colour and width.
    pub fn with_border(mut self, color: impl Into<String>, width: f64) -> Self {
        self.border_color = Some(color.into());
        self.border_width = Some(width);
        self
    }

    /// Enables or disables the segment.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Weight used for angular span and probability
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Whether the segment may be selected
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Text colour to render with: the explicit one, or black/white by contrast
    pub fn resolved_text_color(&self) -> String {
        match &self.text_color {
            Some(color) if !color.trim().is_empty() => color.clone(),
            _ => contrast_color(&self.color).to_string(),
        }
    }
}

/// Names a segment either by position or by id
///
/// Deserializes from a bare number (index) or a bare string (id), matching a
/// `predefinedResult: number | string` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentTarget {
    /// 0-based position in the segment list
    Index(usize),
    /// Segment `id`
    Id(String),
}

impl From<usize> for SegmentTarget {
    fn from(index: usize) -> Self {
        SegmentTarget::Index(index)
    }
}

impl From<&str> for SegmentTarget {
    fn from(id: &str) -> Self {
        SegmentTarget::Id(id.to_string())
    }
}

impl From<String> for SegmentTarget {
    fn from(id: String) -> Self {
        SegmentTarget::Id(id)
    }
}

impl fmt::Display for SegmentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentTarget::Index(index) => write!(f, "index {}", index),
            SegmentTarget::Id(id) => write!(f, "id '{}'", id),
        }
    }
}

/// A segment together with its position in the original, unfiltered list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedSegment<'a> {
    /// The segment
    pub segment: &'a Segment,
    /// Index into the list the segment was taken from
    pub index: usize,
}

impl<'a> SelectedSegment<'a> {
    pub(crate) fn at(segments: &'a [Segment], index: usize) -> Self {
        Self {
            segment: &segments[index],
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let segment = Segment::new("a", "Alpha", "#112233")
            .with_weight(2.5)
            .with_text_color("white")
            .with_border("#000", 2.0)
            .with_disabled(true);

        assert_eq!(segment.id, "a");
        assert_eq!(segment.effective_weight(), 2.5);
        assert_eq!(segment.text_color.as_deref(), Some("white"));
        assert_eq!(segment.border_color.as_deref(), Some("#000"));
        assert_eq!(segment.border_width, Some(2.0));
        assert!(!segment.is_enabled());
    }

    #[test]
    fn test_resolved_text_color() {
        assert_eq!(Segment::new("1", "x", "#ffffff").resolved_text_color(), "#000000");
        assert_eq!(Segment::new("1", "x", "#000000").resolved_text_color(), "#ffffff");
        assert_eq!(
            Segment::new("1", "x", "#000000")
                .with_text_color("red")
                .resolved_text_color(),
            "red"
        );
    }

    #[test]
    fn test_json_field_names() {
        let json = r##"{"id":"1","text":"Prize","color":"#f00","textColor":"#fff","borderWidth":2,"disabled":true}"##;
        let segment: Segment = serde_json::from_str(json).unwrap();

        assert_eq!(segment.text_color.as_deref(), Some("#fff"));
        assert_eq!(segment.border_width, Some(2.0));
        assert!(segment.disabled);
        assert_eq!(segment.weight, None);
    }

    #[test]
    fn test_missing_required_fields_parse_as_empty() {
        let segment: Segment = serde_json::from_str(r#"{"text":"No id"}"#).unwrap();
        assert!(segment.id.is_empty());
        assert!(segment.color.is_empty());
    }

    #[test]
    fn test_target_deserializes_number_or_string() {
        let index: SegmentTarget = serde_json::from_str("2").unwrap();
        let id: SegmentTarget = serde_json::from_str(r#""2""#).unwrap();

        assert_eq!(index, SegmentTarget::Index(2));
        assert_eq!(id, SegmentTarget::Id("2".to_string()));
        assert_eq!(index.to_string(), "index 2");
        assert_eq!(id.to_string(), "id '2'");
    }
}
