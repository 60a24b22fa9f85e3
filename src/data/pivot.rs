use std::collections::HashMap;

use super::model::{ExpressionRecord, Metric};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// HeatmapMatrix – gene × comparison grid of one metric
// ---------------------------------------------------------------------------

/// Row-major matrix of metric values. `None` marks a (gene, comparison) pair
/// with no row or a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMatrix {
    pub metric: Metric,
    pub genes: Vec<String>,
    pub comparisons: Vec<String>,
    values: Vec<Option<f64>>,
}

impl HeatmapMatrix {
    /// Pivot `records` into a matrix with rows in the order of `genes` and
    /// columns in the order of `comparisons`.
    ///
    /// Two records with the same gene and comparison make the cell ambiguous
    /// and fail with [`DashboardError::AmbiguousPivot`].
    pub fn pivot(
        records: &[&ExpressionRecord],
        metric: Metric,
        genes: &[String],
        comparisons: &[String],
    ) -> Result<Self> {
        let mut cells: HashMap<(&str, &str), Option<f64>> = HashMap::with_capacity(records.len());
        for rec in records {
            let key = (rec.gene_id.as_str(), rec.comparison.as_str());
            if cells.insert(key, rec.metric(metric)).is_some() {
                return Err(DashboardError::AmbiguousPivot {
                    gene_id: rec.gene_id.clone(),
                    comparison: rec.comparison.clone(),
                });
            }
        }

        let mut values = Vec::with_capacity(genes.len() * comparisons.len());
        for gene in genes {
            for comparison in comparisons {
                let value = cells
                    .get(&(gene.as_str(), comparison.as_str()))
                    .copied()
                    .flatten();
                values.push(value);
            }
        }

        Ok(HeatmapMatrix {
            metric,
            genes: genes.to_vec(),
            comparisons: comparisons.to_vec(),
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.genes.len()
    }

    pub fn n_cols(&self) -> usize {
        self.comparisons.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n_rows() || col >= self.n_cols() {
            return None;
        }
        self.values[row * self.n_cols() + col]
    }

    /// Values of one row, one entry per comparison.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let n = self.n_cols();
        &self.values[row * n..(row + 1) * n]
    }
}
