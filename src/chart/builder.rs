use log::debug;

use super::format::NumberFormat;
use super::spec::{Chart, Data, Encoding, Layer, Mark, MarkType, PositionDef, Selection, Tooltip};
use crate::data::model::SpectrumData;
use crate::error::Result;
use crate::options::ChartOptions;

/// Name of the hover selection inside a single chart.
pub const HOVER: &str = "hover";

/// Tooltip precision of the x value.
const X_DIGITS: usize = 4;
/// Tooltip precision of the y value.
const Y_DIGITS: usize = 1;

// ---------------------------------------------------------------------------
// Spectrum chart
// ---------------------------------------------------------------------------

/// Compose the interactive spectrum chart for `data`.
///
/// Layers, bottom to top:
/// 1. the convolved curve as a line,
/// 2. a circle on the curve at the hovered x,
/// 3. an invisible vertical rule carrying the hover selection and tooltip,
/// 4. the sticks as thin translucent bars.
///
/// Fails without building anything when either series is missing or holds a
/// non-finite value, or when a style colour does not parse.
pub fn build_spectrum_chart(data: &SpectrumData, options: &ChartOptions) -> Result<Chart> {
    let convolution = data.convolution()?;
    let sticks = data.sticks()?;
    let style = options.style.normalized()?;

    let hover = Selection::nearest_hover(HOVER, "x");
    let curve = Data::from_convolution(convolution);

    let lines = Layer::new(
        Mark::new(MarkType::Line)
            .stroke_width(style.line_width)
            .color(&style.line_color),
        curve.clone(),
        Encoding::xy(
            PositionDef::quantitative("x")
                .axis(options.x_title.to_string(), Some(options.offset)),
            PositionDef::quantitative("y").axis(options.y_title.to_string(), None),
        ),
    );

    let points = lines
        .clone()
        .with_mark(Mark::new(MarkType::Circle).color(&style.line_color))
        .filter(hover.predicate());

    let tooltips = Layer::new(
        Mark::new(MarkType::Rule),
        curve,
        Encoding {
            x: Some(PositionDef::quantitative("x")),
            opacity: Some(hover.condition(style.rule_opacity, 0.0)),
            tooltip: vec![
                Tooltip::quantitative("x", NumberFormat::fixed(X_DIGITS), &options.x_title.label),
                Tooltip::quantitative("y", NumberFormat::fixed(Y_DIGITS), &options.y_title.label),
            ],
            ..Encoding::default()
        },
    )
    .add_selection(hover);

    let bars = Layer::new(
        Mark::new(MarkType::Bar)
            .size(style.stick_width)
            .opacity(style.stick_opacity)
            .color(&style.stick_color),
        Data::from_sticks(sticks),
        Encoding::xy(
            PositionDef::quantitative("poles"),
            PositionDef::quantitative("residues"),
        ),
    );

    debug!(
        "chart '{}': {} curve samples, {} sticks",
        options.title,
        convolution.len(),
        sticks.len()
    );

    Ok(Chart::layered(
        &options.title,
        vec![lines, points, tooltips, bars],
    ))
}
