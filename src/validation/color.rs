//! CSS colour checks

use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted colour grammar
///
/// Hex (`#rgb`, `#rrggbb`), `rgb()`, `rgba()` with alpha in `[0, 1]`, `hsl()`,
/// `hsla()` with alpha in `[0, 1]`, or a bare alphabetic colour name.
static COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"#(?:[0-9A-Fa-f]{3}){1,2}",
        r"|rgb\((?:[0-9]{1,3},\s*){2}[0-9]{1,3}\)",
        r"|rgba\((?:[0-9]{1,3},\s*){3}(?:0(?:\.[0-9]+)?|1(?:\.0+)?)\)",
        r"|hsl\([0-9]{1,3},\s*[0-9]{1,3}%,\s*[0-9]{1,3}%\)",
        r"|hsla\([0-9]{1,3},\s*[0-9]{1,3}%,\s*[0-9]{1,3}%,\s*(?:0(?:\.[0-9]+)?|1(?:\.0+)?)\)",
        r"|[a-zA-Z]+",
        r")$"
    ))
    .expect("colour pattern is a valid regex")
});

/// Whether `color` is an accepted CSS colour
///
/// Surrounding whitespace is ignored.
///
/// # Example
///
/// ```rust
/// use prize_wheel::validation::is_valid_color;
///
/// assert!(is_valid_color("#ff0000"));
/// assert!(is_valid_color("rgba(255, 0, 0, 0.5)"));
/// assert!(is_valid_color("red"));
/// assert!(!is_valid_color("invalid-color"));
/// ```
pub fn is_valid_color(color: &str) -> bool {
    COLOR_PATTERN.is_match(color.trim())
}

/// Black or white, whichever reads better on `background`
///
/// Uses perceived luminance `(0.299 r + 0.587 g + 0.114 b) / 255`; above 0.5
/// the background counts as light and gets black text. Only hex colours can be
/// measured; anything else gets white text.
pub fn contrast_color(background: &str) -> &'static str {
    const BLACK: &str = "#000000";
    const WHITE: &str = "#ffffff";

    match parse_hex(background) {
        Some((r, g, b)) => {
            let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
            if luminance > 0.5 {
                BLACK
            } else {
                WHITE
            }
        }
        None => WHITE,
    }
}

/// Parses `#rgb` or `#rrggbb` into channel values
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let expanded: Vec<String> = hex.chars().map(|c| format!("{c}{c}")).collect();
            Some((
                channel(&expanded[0])?,
                channel(&expanded[1])?,
                channel(&expanded[2])?,
            ))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}
