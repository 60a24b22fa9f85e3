//! Differential-expression heatmap dashboard.
//!
//! Loads per-comparison result tables, merges them into a
//! [`UnifiedTable`](data::model::UnifiedTable) and turns user selections into
//! a colour-mapped gene × comparison [`HeatmapFigure`](figure::HeatmapFigure).

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod figure;
pub mod handler;

pub use error::{DashboardError, Result};
