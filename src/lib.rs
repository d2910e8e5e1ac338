//! Interactive excited-state spectrum charts.
//!
//! A broadened spectrum (a continuous `convolution` curve plus the discrete
//! `sticks` it was built from) becomes a layered Vega-Lite chart with a
//! hover crosshair and tooltip.  Several charts can be stacked and saved as a
//! standalone HTML page.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod options;

use anyhow::{Context, Result};
use log::info;

pub use chart::{Chart, TopLevel, build_spectrum_chart};
pub use config::{Config, Layout};
pub use data::model::{ConvolutionSample, SpectrumData, SpectrumKind, Stick};
pub use error::ChartError;
pub use options::{AxisTitle, ChartOptions};

/// Build every panel of `config` and arrange them into one document.
pub fn render(config: &Config) -> Result<TopLevel> {
    let charts = config
        .panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let data = panel.load_data().with_context(|| format!("loading panel {i}"))?;
            let chart = build_spectrum_chart(&data, &panel.options())
                .with_context(|| format!("building panel {i}"))?;
            info!("panel {i}: '{}'", chart.title);
            Ok(chart)
        })
        .collect::<Result<Vec<_>>>()?;

    let spec = match config.layout {
        Layout::Vertical => Chart::vconcat(charts),
        Layout::Horizontal => Chart::hconcat(charts),
    };
    Ok(spec.into())
}
