/// Data layer: spectrum records, ingestion, and excitation results.
///
/// Architecture:
/// ```text
///  excitations.json          .json / .csv / .parquet
///        │                          │
///        ▼                          ▼
///   ┌────────────┐            ┌──────────┐
///   │ excitation │  sticks    │  loader   │  parse file → series
///   └────────────┘ ────────►  └──────────┘
///                                   │
///                                   ▼
///                          ┌──────────────┐
///                          │ SpectrumData │  convolution + sticks
///                          └──────────────┘
/// ```

pub mod excitation;
pub mod loader;
pub mod model;
