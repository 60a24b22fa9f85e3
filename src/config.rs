use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{Metric, UnifiedTable};
use crate::error::{DashboardError, Result};

/// Slider extent used when the data carries no fold changes.
pub const FALLBACK_EXTENT: (f64, f64) = (-10.0, 10.0);

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// One comparison label and the file holding its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSource {
    pub label: String,
    pub path: PathBuf,
}

/// What to do when a configured file cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Abort startup on the first failure.
    Strict,
    /// Log the failure and continue with the remaining files.
    #[default]
    Tolerant,
}

/// Extent of the colour-scale range slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SliderExtent {
    Fixed { min: f64, max: f64 },
    /// Observed range of `log2FoldChange`.
    Data,
}

impl Default for SliderExtent {
    fn default() -> Self {
        SliderExtent::Fixed {
            min: FALLBACK_EXTENT.0,
            max: FALLBACK_EXTENT.1,
        }
    }
}

impl SliderExtent {
    /// Resolve to concrete `(min, max)` bounds for a loaded table.
    pub fn resolve(&self, table: &UnifiedTable) -> (f64, f64) {
        match *self {
            SliderExtent::Fixed { min, max } => (min, max),
            SliderExtent::Data => match table.metric_range(Metric::Log2FoldChange) {
                Some((lo, hi)) if lo < hi => (lo, hi),
                _ => FALLBACK_EXTENT,
            },
        }
    }
}

/// Dashboard configuration, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub load_mode: LoadMode,
    pub comparisons: Vec<ComparisonSource>,
    pub default_metric: Metric,
    pub default_range: [f64; 2],
    pub slider: SliderExtent,
    /// Number of genes selected at startup; 0 selects none (= all genes).
    pub preselect_genes: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Interactive Gene Heatmap".to_string(),
            load_mode: LoadMode::default(),
            comparisons: Vec::new(),
            default_metric: Metric::default(),
            default_range: [-2.0, 2.0],
            slider: SliderExtent::default(),
            preselect_genes: 10,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a config file. Relative comparison paths are
    /// resolved against the directory containing the config.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: DashboardConfig = serde_json::from_str(&text)?;

        if let Some(base) = path.parent() {
            for source in &mut config.comparisons {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.comparisons.is_empty() {
            return Err(DashboardError::Config("no comparisons configured".into()));
        }

        let mut labels = HashSet::new();
        for source in &self.comparisons {
            if source.label.trim().is_empty() {
                return Err(DashboardError::Config("empty comparison label".into()));
            }
            if !labels.insert(source.label.as_str()) {
                return Err(DashboardError::Config(format!(
                    "duplicate comparison label '{}'",
                    source.label
                )));
            }
        }

        let [low, high] = self.default_range;
        if !(low <= high) {
            return Err(DashboardError::Config(format!(
                "default_range lower bound {low} exceeds upper bound {high}"
            )));
        }

        if let SliderExtent::Fixed { min, max } = self.slider {
            if !(min < max) {
                return Err(DashboardError::Config(format!(
                    "slider min {min} must be below max {max}"
                )));
            }
        }
        Ok(())
    }
}
