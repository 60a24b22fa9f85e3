use std::sync::Arc;

use crate::color::{ColorRange, ColorScale};
use crate::data::filter::{filter_records, resolve_genes};
use crate::data::model::{Metric, UnifiedTable};
use crate::data::pivot::HeatmapMatrix;
use crate::error::Result;
use crate::figure::{scale_status, HeatmapFigure};

/// The three user inputs that drive the heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub metric: Metric,
    /// Ordered gene ids; empty means every gene.
    pub genes: Vec<String>,
    /// `[low, high]` colour-scale bounds.
    pub scale_range: [f64; 2],
}

/// Result of one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOutput {
    pub matrix: HeatmapMatrix,
    pub figure: HeatmapFigure,
    pub status: String,
}

/// Turns selections into heatmaps over a shared, read-only table.
#[derive(Debug, Clone)]
pub struct HeatmapHandler {
    table: Arc<UnifiedTable>,
    scale: ColorScale,
}

impl HeatmapHandler {
    pub fn new(table: Arc<UnifiedTable>) -> Self {
        Self {
            table,
            scale: ColorScale::viridis(),
        }
    }

    pub fn table(&self) -> &UnifiedTable {
        &self.table
    }

    /// Filter, pivot and colour the table for `selection`.
    ///
    /// Pure: the same selection always yields the same output.
    pub fn handle(&self, selection: &Selection) -> Result<HeatmapOutput> {
        let genes = resolve_genes(&self.table, &selection.genes);
        let rows = filter_records(&self.table, &genes);
        let matrix =
            HeatmapMatrix::pivot(&rows, selection.metric, &genes, self.table.comparisons())?;

        let [a, b] = selection.scale_range;
        let range = ColorRange::new(a, b);
        let figure = HeatmapFigure::new(&matrix, self.scale.clone(), range);

        log::debug!(
            "heatmap {}x{} for {} ({} source rows)",
            matrix.n_rows(),
            matrix.n_cols(),
            selection.metric,
            rows.len()
        );

        Ok(HeatmapOutput {
            matrix,
            figure,
            status: scale_status(&range),
        })
    }
}
