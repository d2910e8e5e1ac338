use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{SpectrumKind, Stick, StickSeries};
use crate::error::{ChartError, Result};

// ---------------------------------------------------------------------------
// ExcitationRecord – one excited state reported by the chemistry engine
// ---------------------------------------------------------------------------

/// The subset of a per-state excitation record needed to build sticks.
///
/// Keys follow the engine's output verbatim; any other keys in the record
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationRecord {
    /// Excitation energy in atomic units.
    #[serde(rename = "EXCITATION ENERGY")]
    pub excitation_energy: f64,

    /// Length-gauge electric dipole transition moment.
    #[serde(rename = "ELECTRIC DIPOLE TRANSITION MOMENT (LEN)")]
    pub electric_dipole: [f64; 3],

    /// Length-gauge rotatory strength.
    #[serde(rename = "ROTATORY STRENGTH (LEN)")]
    pub rotatory_strength: f64,
}

impl ExcitationRecord {
    /// Residue for the requested spectrum kind.
    pub fn residue(&self, kind: SpectrumKind) -> f64 {
        match kind {
            SpectrumKind::Opa => self.electric_dipole.iter().map(|c| c * c).sum(),
            SpectrumKind::Ecd => self.rotatory_strength,
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| ChartError::InvalidExcitation { index, reason };
        if !self.excitation_energy.is_finite() || self.excitation_energy <= 0.0 {
            return Err(invalid(format!(
                "excitation energy {} is not a positive number",
                self.excitation_energy
            )));
        }
        if self.electric_dipole.iter().any(|c| !c.is_finite()) {
            return Err(invalid("electric dipole has non-finite components".into()));
        }
        if !self.rotatory_strength.is_finite() {
            return Err(invalid("rotatory strength is not finite".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pole units
// ---------------------------------------------------------------------------

/// Hartree in electronvolts (CODATA 2018).
const HARTREE_EV: f64 = 27.211_386_245_988;
/// Wavelength in nm of a photon carrying one hartree.
const HARTREE_NM: f64 = 45.563_352_529_1;

/// Unit of the poles on the x axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoleUnit {
    /// Hartree, as reported by the engine.
    #[default]
    Au,
    Ev,
    Nm,
}

impl PoleUnit {
    /// Convert an energy in hartree.
    pub fn from_hartree(self, energy: f64) -> f64 {
        match self {
            PoleUnit::Au => energy,
            PoleUnit::Ev => energy * HARTREE_EV,
            PoleUnit::Nm => HARTREE_NM / energy,
        }
    }
}

impl fmt::Display for PoleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoleUnit::Au => write!(f, "au"),
            PoleUnit::Ev => write!(f, "eV"),
            PoleUnit::Nm => write!(f, "nm"),
        }
    }
}

impl FromStr for PoleUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "au" => Ok(PoleUnit::Au),
            "ev" => Ok(PoleUnit::Ev),
            "nm" => Ok(PoleUnit::Nm),
            other => Err(format!("unknown unit '{other}' (expected au, ev or nm)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Sticks
// ---------------------------------------------------------------------------

/// Turn excitation records into poles (in `unit`) and residues for `kind`.
///
/// The engine's output is treated as untrusted: an empty list or a record
/// with a non-positive or non-finite value is rejected.
pub fn stick_series(
    records: &[ExcitationRecord],
    kind: SpectrumKind,
    unit: PoleUnit,
) -> Result<StickSeries> {
    if records.is_empty() {
        return Err(ChartError::NoExcitations);
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.validate(i)?;
            Ok(Stick {
                poles: unit.from_hartree(r.excitation_energy),
                residues: r.residue(kind),
            })
        })
        .collect::<Result<StickSeries>>()
        .inspect(|sticks| debug!("{kind}: {} sticks in {unit}", sticks.len()))
}
