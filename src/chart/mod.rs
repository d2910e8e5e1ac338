/// Chart layer: Vega-Lite specification types, the spectrum chart builder,
/// tooltip number formats, and HTML output.

pub mod builder;
pub mod format;
pub mod html;
pub mod spec;

pub use builder::build_spectrum_chart;
pub use spec::{Chart, Composition, TopLevel};
