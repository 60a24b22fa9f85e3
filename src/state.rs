use std::sync::Arc;

use expression_heatmap::config::DashboardConfig;
use expression_heatmap::data::filter::{filter_records, resolve_genes};
use expression_heatmap::data::model::{ExpressionRecord, Metric, UnifiedTable};
use expression_heatmap::export;
use expression_heatmap::handler::{HeatmapHandler, HeatmapOutput, Selection};

/// Pixels per heatmap cell in PNG exports.
const EXPORT_CELL_PX: u32 = 24;

/// Increment of the colour-scale sliders; bounds are snapped to it.
pub const SCALE_STEP: f64 = 0.1;

fn snap_to_step(value: f64) -> f64 {
    let per_unit = (1.0 / SCALE_STEP).round();
    (value * per_unit).round() / per_unit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Heatmap,
    Table,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    handler: HeatmapHandler,

    /// Current widget values.
    pub selection: Selection,

    /// Selection the cached output (or error) was computed for.
    applied: Option<Selection>,

    /// Heatmap for `applied`.
    pub output: Option<HeatmapOutput>,

    /// Error from the last heatmap computation.
    pub error_message: Option<String>,

    /// Notice from the last export.
    pub status_message: Option<String>,

    /// Bounds of the colour-scale range selector.
    pub slider_extent: (f64, f64),

    /// Text typed into the gene search box.
    pub gene_query: String,

    pub view: View,
}

impl AppState {
    pub fn new(table: Arc<UnifiedTable>, config: &DashboardConfig) -> Self {
        let slider_extent = config.slider.resolve(&table);
        let genes = table
            .gene_ids()
            .iter()
            .take(config.preselect_genes)
            .cloned()
            .collect();

        let mut state = Self {
            handler: HeatmapHandler::new(table),
            selection: Selection {
                metric: config.default_metric,
                genes,
                scale_range: config.default_range,
            },
            applied: None,
            output: None,
            error_message: None,
            status_message: None,
            slider_extent,
            gene_query: String::new(),
            view: View::Heatmap,
        };
        state.refresh();
        state
    }

    pub fn table(&self) -> &UnifiedTable {
        self.handler.table()
    }

    /// Recompute the heatmap if the selection changed since the last run.
    pub fn refresh(&mut self) {
        if self.applied.as_ref() == Some(&self.selection) {
            return;
        }
        match self.handler.handle(&self.selection) {
            Ok(output) => {
                self.output = Some(output);
                self.error_message = None;
            }
            Err(e) => {
                log::error!("Failed to build heatmap: {e}");
                self.output = None;
                self.error_message = Some(format!("Error: {e}"));
            }
        }
        self.applied = Some(self.selection.clone());
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.selection.metric = metric;
    }

    pub fn is_selected(&self, gene: &str) -> bool {
        self.selection.genes.iter().any(|g| g == gene)
    }

    /// Add a gene at the end of the selection, or remove it if present.
    pub fn toggle_gene(&mut self, gene: &str) {
        if let Some(pos) = self.selection.genes.iter().position(|g| g == gene) {
            self.selection.genes.remove(pos);
        } else {
            self.selection.genes.push(gene.to_string());
        }
    }

    pub fn clear_genes(&mut self) {
        self.selection.genes.clear();
    }

    /// Genes matching the search box, in table order, at most `limit`.
    pub fn matching_genes(&self, limit: usize) -> Vec<String> {
        let query = self.gene_query.trim().to_lowercase();
        self.table()
            .gene_ids()
            .iter()
            .filter(|g| query.is_empty() || g.to_lowercase().contains(&query))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Keep `low <= high` while either bound is dragged.
    pub fn set_scale_low(&mut self, low: f64) {
        let low = snap_to_step(low);
        let high = self.selection.scale_range[1];
        self.selection.scale_range = [low.min(high), high];
    }

    pub fn set_scale_high(&mut self, high: f64) {
        let high = snap_to_step(high);
        let low = self.selection.scale_range[0];
        self.selection.scale_range = [low, high.max(low)];
    }

    /// Records shown in the table view: those of the selected genes.
    pub fn visible_records(&self) -> Vec<&ExpressionRecord> {
        let genes = resolve_genes(self.table(), &self.selection.genes);
        filter_records(self.table(), &genes)
    }

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------

    pub fn export_png(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_title("Export heatmap")
            .add_filter("PNG", &["png"])
            .set_file_name("heatmap.png")
            .save_file()
        else {
            return;
        };

        let result = export::save_png(&output.figure, &path, EXPORT_CELL_PX);
        self.report_export(result, &path);
    }

    pub fn export_csv(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_title("Export matrix")
            .add_filter("CSV", &["csv"])
            .set_file_name("heatmap.csv")
            .save_file()
        else {
            return;
        };

        let result = export::save_matrix_csv(&output.matrix, &path);
        self.report_export(result, &path);
    }

    fn report_export(&mut self, result: anyhow::Result<()>, path: &std::path::Path) {
        match result {
            Ok(()) => {
                log::info!("Exported {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expression_heatmap::config::ComparisonSource;

    fn rec(gene: &str, comparison: &str, lfc: f64) -> ExpressionRecord {
        ExpressionRecord {
            gene_id: gene.into(),
            log2_fold_change: Some(lfc),
            pvalue: None,
            padj: None,
            comparison: comparison.into(),
            extras: Default::default(),
        }
    }

    fn state(preselect: usize) -> AppState {
        let table = UnifiedTable::new(
            vec![rec("G1", "c1", 1.0), rec("G2", "c1", -1.0), rec("G3", "c2", 0.5)],
            vec!["c1".into(), "c2".into()],
        );
        let config = DashboardConfig {
            comparisons: vec![ComparisonSource {
                label: "c1".into(),
                path: "c1.csv".into(),
            }],
            preselect_genes: preselect,
            ..Default::default()
        };
        AppState::new(Arc::new(table), &config)
    }

    #[test]
    fn test_preselects_first_genes() {
        let s = state(2);
        assert_eq!(s.selection.genes, ["G1", "G2"]);
        assert_eq!(s.output.as_ref().unwrap().matrix.genes, ["G1", "G2"]);
    }

    #[test]
    fn test_toggle_and_refresh() {
        let mut s = state(0);
        assert_eq!(s.output.as_ref().unwrap().matrix.n_rows(), 3);

        s.toggle_gene("G3");
        s.toggle_gene("G1");
        s.refresh();
        assert_eq!(s.output.as_ref().unwrap().matrix.genes, ["G3", "G1"]);

        s.toggle_gene("G3");
        s.refresh();
        assert_eq!(s.output.as_ref().unwrap().matrix.genes, ["G1"]);
        assert_eq!(s.visible_records().len(), 1);
    }

    #[test]
    fn test_scale_bounds_stay_ordered() {
        let mut s = state(0);
        s.set_scale_low(5.0);
        assert_eq!(s.selection.scale_range, [2.0, 2.0]);
        s.set_scale_high(-3.0);
        assert_eq!(s.selection.scale_range, [2.0, 2.0]);
        s.set_scale_high(4.0);
        s.refresh();
        assert_eq!(
            s.output.as_ref().unwrap().status,
            "Selected Color Scale: 2 to 4"
        );
    }

    #[test]
    fn test_dragged_bounds_snap_to_step() {
        let mut s = state(0);
        s.set_scale_low(-0.30000000000000004);
        s.set_scale_high(1.7000000000000002);
        assert_eq!(s.selection.scale_range, [-0.3, 1.7]);
        s.refresh();
        assert_eq!(
            s.output.as_ref().unwrap().status,
            "Selected Color Scale: -0.3 to 1.7"
        );
    }

    #[test]
    fn test_gene_search() {
        let mut s = state(0);
        s.gene_query = "g2".into();
        assert_eq!(s.matching_genes(10), ["G2"]);
        s.gene_query.clear();
        assert_eq!(s.matching_genes(2), ["G1", "G2"]);
    }
}
