use thiserror::Error;

/// Errors raised while validating spectrum data and building charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A required series key is absent from the spectrum record.
    #[error("spectrum data is missing the '{0}' series")]
    MissingData(&'static str),

    /// A series element lacks a usable numeric field.
    #[error("{series}[{index}]: field '{field}' is missing or not a finite number")]
    MalformedSeries {
        series: &'static str,
        index: usize,
        field: &'static str,
    },

    /// The excitation results handed over by the chemistry engine are empty.
    #[error("no excitation records to build sticks from")]
    NoExcitations,

    /// An excitation record violates the expected shape.
    #[error("excitation {index}: {reason}")]
    InvalidExcitation { index: usize, reason: String },

    #[error("invalid colour '{0}'")]
    InvalidColor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
