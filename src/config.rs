//! Run configuration: which spectra to chart and where to write them.
//!
//! ```toml
//! output = "moxy.html"
//!
//! [[panels]]
//! kind = "opa"
//! record = "opa.json"
//!
//! [[panels]]
//! kind = "ecd"
//! convolution = "ecd_convolution.parquet"
//! excitations = "excitations.json"
//! units = "nm"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

use crate::color::ChartStyle;
use crate::data::excitation::{PoleUnit, stick_series};
use crate::data::loader;
use crate::data::model::{SpectrumData, SpectrumKind};
use crate::options::{AxisTitle, ChartOptions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The HTML file to write. Defaults to `spectra.html` next to the
    /// configuration file.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// How the panels are arranged.
    #[serde(default)]
    pub layout: Layout,

    /// One chart per panel, in display order.
    pub panels: Vec<Panel>,
}

fn default_output() -> PathBuf {
    PathBuf::from("spectra.html")
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Panel {
    /// Preset titles for a known spectrum kind. Also selects the residues
    /// taken from `excitations`.
    pub kind: Option<SpectrumKind>,

    pub title: Option<String>,
    pub x_title: Option<AxisTitle>,
    pub y_title: Option<AxisTitle>,

    /// Pixel offset of the x axis.
    pub offset: Option<i32>,

    pub style: Option<ChartStyle>,

    /// A JSON record holding both series.
    pub record: Option<PathBuf>,

    /// Table of the convolved curve (`x`, `y`).
    pub convolution: Option<PathBuf>,

    /// Table of sticks (`poles`, `residues`).
    pub sticks: Option<PathBuf>,

    /// Excitation results to derive the sticks from, using `kind`.
    pub excitations: Option<PathBuf>,

    /// Unit of the poles derived from `excitations`; must match the x axis
    /// of the convolution.
    #[serde(default)]
    pub units: PoleUnit,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        config.validate()?;
        debug!("{config:#?}");
        Ok(config)
    }

    /// Make relative paths relative to `base` instead of the working
    /// directory.
    fn resolve_paths(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.output);
        for panel in &mut self.panels {
            panel
                .record
                .iter_mut()
                .chain(panel.convolution.iter_mut())
                .chain(panel.sticks.iter_mut())
                .chain(panel.excitations.iter_mut())
                .for_each(fix);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.panels.is_empty() {
            bail!("config declares no panels");
        }
        for (i, panel) in self.panels.iter().enumerate() {
            panel.validate().with_context(|| format!("panel {i}"))?;
        }
        Ok(())
    }
}

impl Panel {
    fn validate(&self) -> Result<()> {
        if self.record.is_some() == self.convolution.is_some() {
            bail!("exactly one of 'record' and 'convolution' must be given");
        }
        if self.sticks.is_some() && self.excitations.is_some() {
            bail!("'sticks' and 'excitations' are mutually exclusive");
        }
        if self.excitations.is_some() && self.kind.is_none() {
            bail!("'excitations' needs a 'kind' to pick the residues");
        }
        Ok(())
    }

    /// Chart options: the `kind` preset, if any, with explicit overrides.
    pub fn options(&self) -> ChartOptions {
        let mut opts = self.kind.map(ChartOptions::for_kind).unwrap_or_default();
        if let Some(title) = &self.title {
            opts.title = title.clone();
        }
        if let Some(x) = &self.x_title {
            opts.x_title = x.clone();
        }
        if let Some(y) = &self.y_title {
            opts.y_title = y.clone();
        }
        if let Some(offset) = self.offset {
            opts.offset = offset;
        }
        if let Some(style) = &self.style {
            opts.style = style.clone();
        }
        opts
    }

    /// Gather the panel's series.  Keys the sources do not provide stay
    /// empty; the chart builder reports them.
    pub fn load_data(&self) -> Result<SpectrumData> {
        let mut data = match (&self.record, &self.convolution) {
            (Some(record), _) => loader::load_record(record)?,
            (None, Some(conv)) => SpectrumData {
                convolution: Some(loader::load_convolution(conv)?),
                sticks: None,
            },
            (None, None) => bail!("panel has no data source"),
        };
        if let Some(sticks) = &self.sticks {
            data.sticks = Some(loader::load_sticks(sticks)?);
        }
        if let (Some(path), Some(kind)) = (&self.excitations, self.kind) {
            let records = loader::load_excitations(path)?;
            data.sticks = Some(
                stick_series(&records, kind, self.units)
                    .with_context(|| format!("deriving sticks from {}", path.display()))?,
            );
        }
        Ok(data)
    }
}
