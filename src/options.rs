use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ChartStyle;
use crate::data::model::SpectrumKind;

// ---------------------------------------------------------------------------
// Axis titles
// ---------------------------------------------------------------------------

/// Semantic label plus unit of an axis, rendered as `"label [unit]"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub label: String,
    pub unit: String,
}

impl AxisTitle {
    pub fn new(label: &str, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            unit: unit.to_string(),
        }
    }
}

impl fmt::Display for AxisTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.unit)
    }
}

impl From<(&str, &str)> for AxisTitle {
    fn from((label, unit): (&str, &str)) -> Self {
        Self::new(label, unit)
    }
}

// ---------------------------------------------------------------------------
// Chart options
// ---------------------------------------------------------------------------

/// Display configuration of a single spectrum chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub title: String,
    pub x_title: AxisTitle,
    pub y_title: AxisTitle,
    /// Pixel offset of the x axis, to keep stacked charts apart.
    pub offset: i32,
    pub style: ChartStyle,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_title: AxisTitle::new("ω", "au"),
            y_title: AxisTitle::new("ε", "L⋅mol⁻¹⋅cm⁻¹"),
            offset: 0,
            style: ChartStyle::default(),
        }
    }
}

impl ChartOptions {
    /// Titles used for the Gaussian-broadened spectra plotted in nm.
    pub fn for_kind(kind: SpectrumKind) -> Self {
        let base = Self {
            title: format!("{kind} (Gaussian broadening)"),
            x_title: AxisTitle::new("λ", "nm"),
            ..Self::default()
        };
        match kind {
            SpectrumKind::Opa => base,
            SpectrumKind::Ecd => Self {
                y_title: AxisTitle::new("Δε", "L⋅mol⁻¹⋅cm⁻¹"),
                ..base
            },
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_x_title(mut self, title: impl Into<AxisTitle>) -> Self {
        self.x_title = title.into();
        self
    }

    pub fn with_y_title(mut self, title: impl Into<AxisTitle>) -> Self {
        self.y_title = title.into();
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_title_format() {
        assert_eq!(AxisTitle::new("λ", "nm").to_string(), "λ [nm]");
    }

    #[test]
    fn presets() {
        let opa = ChartOptions::for_kind(SpectrumKind::Opa);
        assert_eq!(opa.title, "OPA (Gaussian broadening)");
        assert_eq!(opa.x_title.to_string(), "λ [nm]");
        assert_eq!(opa.y_title.label, "ε");

        let ecd = ChartOptions::for_kind(SpectrumKind::Ecd);
        assert_eq!(ecd.title, "ECD (Gaussian broadening)");
        assert_eq!(ecd.y_title.to_string(), "Δε [L⋅mol⁻¹⋅cm⁻¹]");
    }

    #[test]
    fn defaults() {
        let opts = ChartOptions::default();
        assert_eq!(opts.title, "");
        assert_eq!(opts.x_title.to_string(), "ω [au]");
        assert_eq!(opts.offset, 0);
    }

    #[test]
    fn builders_override_preset() {
        let opts = ChartOptions::for_kind(SpectrumKind::Opa)
            .with_title("Moxy OPA")
            .with_y_title(("f", "au"))
            .with_offset(-4);
        assert_eq!(opts.title, "Moxy OPA");
        assert_eq!(opts.x_title.to_string(), "λ [nm]");
        assert_eq!(opts.y_title.to_string(), "f [au]");
        assert_eq!(opts.offset, -4);
    }
}
