use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Record key of the continuous (broadened) curve.
pub const CONVOLUTION: &str = "convolution";
/// Record key of the discrete transitions.
pub const STICKS: &str = "sticks";

// ---------------------------------------------------------------------------
// Series samples
// ---------------------------------------------------------------------------

/// One sample of the broadened spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvolutionSample {
    pub x: f64,
    pub y: f64,
}

/// One discrete transition: its energy (pole) and intensity (residue).
///
/// Field names are plural to match the column names produced by the
/// broadening step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub poles: f64,
    pub residues: f64,
}

/// Continuous curve, sampled in increasing `x` order (assumed, not enforced).
pub type ConvolutionSeries = Vec<ConvolutionSample>;

/// Discrete transitions, in no particular order.
pub type StickSeries = Vec<Stick>;

// ---------------------------------------------------------------------------
// SpectrumData – the keyed record handed to the chart builder
// ---------------------------------------------------------------------------

/// A broadened spectrum as produced by the external broadening routine.
///
/// Both keys are optional at the type level so that an incomplete record can
/// be represented; the accessors report which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectrumData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convolution: Option<ConvolutionSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticks: Option<StickSeries>,
}

impl SpectrumData {
    pub fn new(convolution: ConvolutionSeries, sticks: StickSeries) -> Self {
        Self {
            convolution: Some(convolution),
            sticks: Some(sticks),
        }
    }

    /// The convolution series, checked for finite values.
    pub fn convolution(&self) -> Result<&[ConvolutionSample]> {
        let series = self
            .convolution
            .as_deref()
            .ok_or(ChartError::MissingData(CONVOLUTION))?;
        for (index, s) in series.iter().enumerate() {
            check_finite(CONVOLUTION, index, "x", s.x)?;
            check_finite(CONVOLUTION, index, "y", s.y)?;
        }
        Ok(series)
    }

    /// The stick series, checked for finite values.
    pub fn sticks(&self) -> Result<&[Stick]> {
        let series = self
            .sticks
            .as_deref()
            .ok_or(ChartError::MissingData(STICKS))?;
        for (index, s) in series.iter().enumerate() {
            check_finite(STICKS, index, "poles", s.poles)?;
            check_finite(STICKS, index, "residues", s.residues)?;
        }
        Ok(series)
    }
}

fn check_finite(series: &'static str, index: usize, field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ChartError::MalformedSeries {
            series,
            index,
            field,
        })
    }
}

// ---------------------------------------------------------------------------
// SpectrumKind
// ---------------------------------------------------------------------------

/// Which observable the residues describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumKind {
    /// One-photon absorption: residues are squared transition dipoles.
    Opa,
    /// Electronic circular dichroism: residues are rotatory strengths.
    Ecd,
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumKind::Opa => write!(f, "OPA"),
            SpectrumKind::Ecd => write!(f, "ECD"),
        }
    }
}

impl FromStr for SpectrumKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opa" => Ok(SpectrumKind::Opa),
            "ecd" => Ok(SpectrumKind::Ecd),
            other => Err(format!("unknown spectrum kind '{other}' (expected opa or ecd)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sticks() {
        let data = SpectrumData {
            convolution: Some(vec![ConvolutionSample { x: 0.0, y: 0.0 }]),
            sticks: None,
        };
        assert!(data.convolution().is_ok());
        assert!(matches!(data.sticks(), Err(ChartError::MissingData("sticks"))));
    }

    #[test]
    fn nan_is_malformed() {
        let data = SpectrumData::new(
            vec![
                ConvolutionSample { x: 0.0, y: 1.0 },
                ConvolutionSample { x: 1.0, y: f64::NAN },
            ],
            vec![],
        );
        match data.convolution() {
            Err(ChartError::MalformedSeries {
                series,
                index,
                field,
            }) => {
                assert_eq!(series, "convolution");
                assert_eq!(index, 1);
                assert_eq!(field, "y");
            }
            other => panic!("expected MalformedSeries, got {other:?}"),
        }
    }

    #[test]
    fn record_deserializes_without_keys() {
        let data: SpectrumData = serde_json::from_str(r#"{"convolution": []}"#).unwrap();
        assert_eq!(data.convolution, Some(vec![]));
        assert_eq!(data.sticks, None);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("OPA".parse::<SpectrumKind>(), Ok(SpectrumKind::Opa));
        assert_eq!("ecd".parse::<SpectrumKind>(), Ok(SpectrumKind::Ecd));
        assert!("ir".parse::<SpectrumKind>().is_err());
    }
}
