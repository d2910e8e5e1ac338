use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

// ---------------------------------------------------------------------------
// Colour parsing
// ---------------------------------------------------------------------------

/// Parse a CSS colour given as `#rrggbb`, `#rgb` or an SVG colour name.
pub fn parse_color(s: &str) -> Result<Srgb<u8>> {
    let s = s.trim();
    if s.starts_with('#') {
        return Srgb::<u8>::from_str(s).map_err(|_| ChartError::InvalidColor(s.to_string()));
    }
    palette::named::from_str(&s.to_ascii_lowercase())
        .ok_or_else(|| ChartError::InvalidColor(s.to_string()))
}

/// Format a colour as `#rrggbb`, the form Vega-Lite accepts everywhere.
pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Normalise any accepted colour string to `#rrggbb`.
pub fn normalize(s: &str) -> Result<String> {
    parse_color(s).map(to_hex)
}

// ---------------------------------------------------------------------------
// Layer styling
// ---------------------------------------------------------------------------

/// Visual parameters of the spectrum layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    /// Stroke colour of the convolved curve.
    pub line_color: String,
    pub line_width: f64,
    /// Fill colour of the stick bars; kept distinct from the curve.
    pub stick_color: String,
    pub stick_width: f64,
    pub stick_opacity: f64,
    /// Opacity of the crosshair rule while hovered.
    pub rule_opacity: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_color: "#4c78a8".to_string(),
            line_width: 1.5,
            stick_color: "#ff0000".to_string(),
            stick_width: 2.0,
            stick_opacity: 0.2,
            rule_opacity: 0.3,
        }
    }
}

impl ChartStyle {
    /// Copy of the style with both colours normalised to `#rrggbb`.
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            line_color: normalize(&self.line_color)?,
            stick_color: normalize(&self.stick_color)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_hex() {
        assert_eq!(normalize("red").unwrap(), "#ff0000");
        assert_eq!(normalize("#4C78A8").unwrap(), "#4c78a8");
        assert_eq!(normalize("SteelBlue").unwrap(), "#4682b4");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(normalize("#12"), Err(ChartError::InvalidColor(_))));
        assert!(matches!(normalize("not-a-colour"), Err(ChartError::InvalidColor(_))));
    }

    #[test]
    fn default_style_is_normalized() {
        let style = ChartStyle::default();
        assert_eq!(style.normalized().unwrap(), style);
    }
}
