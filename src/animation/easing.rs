//! Easing curves for the spin animation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Easing function type
pub type EasingFn = fn(f64) -> f64;

/// Easing applied to animation progress
///
/// Names follow the CSS keywords (`ease-in`, `ease-out`, ...) but every curve
/// is a plain quadratic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, settles slowly onto the result
    #[default]
    EaseOut,
    /// Slow at both ends
    EaseInOut,
}

impl Easing {
    /// All curves
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`
    ///
    /// Input outside the range is clamped. Every curve maps 0 to 0 and 1 to 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prize_wheel::animation::Easing;
    ///
    /// assert_eq!(Easing::Linear.apply(0.25), 0.25);
    /// assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
    /// assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
    /// ```
    pub fn apply(self, progress: f64) -> f64 {
        (self.function())(progress.clamp(0.0, 1.0))
    }

    /// The curve as a plain function
    pub fn function(self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::EaseIn => ease_in_quad,
            Easing::EaseOut => ease_out_quad,
            Easing::EaseInOut => ease_in_out_quad,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Easing::Linear),
            "ease-in" | "ease_in" => Ok(Easing::EaseIn),
            "ease-out" | "ease_out" => Ok(Easing::EaseOut),
            "ease-in-out" | "ease_in_out" => Ok(Easing::EaseInOut),
            other => Err(format!(
                "Unknown easing: {}. Valid values are: linear, ease-in, ease-out, ease-in-out",
                other
            )),
        }
    }
}

fn linear(t: f64) -> f64 {
    t
}

fn ease_in_quad(t: f64) -> f64 {
    t * t
}

fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{}", easing);
        }
    }

    #[test]
    fn test_clamps_input() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
        }
    }

    #[test]
    fn test_curve_values() {
        assert_eq!(Easing::EaseInOut.apply(0.25), 0.125);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInOut.apply(0.75), 0.875);
        assert_eq!(Easing::EaseOut.apply(0.25), 0.4375);
    }

    #[test]
    fn test_monotonic() {
        for easing in Easing::ALL {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.apply(step as f64 / 100.0);
                assert!(value >= previous, "{} not monotonic at {}", easing, step);
                previous = value;
            }
        }
    }

    #[test]
    fn test_parsing() {
        assert_eq!("ease-in-out".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!("EASE_OUT".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert!("bounce".parse::<Easing>().is_err());
        assert_eq!(Easing::default(), Easing::EaseOut);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"ease-in-out\"");
    }
}
