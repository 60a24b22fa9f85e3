use eframe::egui::{Ui, Vec2};
use egui_extras::{Column, TableBuilder};

use expression_heatmap::data::model::CellValue;

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Unified-table rows of the selected genes, extra columns included.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let records = state.visible_records();
    let extras = state.table().extra_columns();
    ui.label(format!("{} rows", records.len()));

    let fmt = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_else(|| "NA".into());

    ui.spacing_mut().item_spacing = Vec2::new(8.0, 2.0);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(80.0), 3 + extras.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in ["GeneID", "Comparison", "log2FoldChange", "pvalue", "padj"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
            for name in extras {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let rec = records[row.index()];
                row.col(|ui| {
                    ui.label(&rec.gene_id);
                });
                row.col(|ui| {
                    ui.label(&rec.comparison);
                });
                for value in [rec.log2_fold_change, rec.pvalue, rec.padj] {
                    row.col(|ui| {
                        ui.label(fmt(value));
                    });
                }
                for name in extras {
                    let cell = rec.extras.get(name).unwrap_or(&CellValue::Null);
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
