use eframe::egui::{self, Color32, Rect, RichText, Sense, Stroke, Ui};
use egui_plot::{uniform_grid_spacer, Plot, PlotPoints, Polygon};

use expression_heatmap::figure::HeatmapFigure;

use crate::state::AppState;

/// Gradient segments drawn in the colour bar.
const COLOR_BAR_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Heatmap (central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap in the central panel.
pub fn heatmap_plot(ui: &mut Ui, state: &AppState) {
    let figure = match &state.output {
        Some(out) => &out.figure,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                let msg = state.error_message.as_deref().unwrap_or("Nothing to show");
                ui.label(RichText::new(msg).color(Color32::RED));
            });
            return;
        }
    };

    ui.strong(&figure.title);
    color_bar(ui, figure);

    // Cell (row, col) is centred on (col, -row) so the first gene is on top.
    let x_labels = figure.x_labels.clone();
    let y_labels = figure.y_labels.clone();
    let hover_x = figure.x_labels.clone();
    let hover_y = figure.y_labels.clone();
    let hover_values: Vec<Option<f64>> = figure.cells.iter().map(|c| c.value).collect();
    let n_cols = figure.n_cols();
    let metric = figure.color_label.clone();

    Plot::new("heatmap_plot")
        .x_axis_label(figure.x_title.clone())
        .y_axis_label(figure.y_title.clone())
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 25.0]))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 25.0]))
        .x_axis_formatter(move |mark, _range| axis_label(&x_labels, mark.value))
        .y_axis_formatter(move |mark, _range| axis_label(&y_labels, -mark.value))
        .label_formatter(move |_name, point| {
            let (Some(col), Some(row)) = (cell_index(point.x), cell_index(-point.y)) else {
                return String::new();
            };
            if col >= n_cols || row >= hover_y.len() {
                return String::new();
            }
            let value = hover_values[row * n_cols + col]
                .map(|v| format!("{v:.4}"))
                .unwrap_or_else(|| "NA".to_string());
            format!("{}\n{}\n{metric}: {value}", hover_y[row], hover_x[col])
        })
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for row in 0..figure.n_rows() {
                for col in 0..figure.n_cols() {
                    let Some(color) = figure.cell(row, col).and_then(|c| c.color) else {
                        continue;
                    };
                    let (x, y) = (col as f64, -(row as f64));
                    let points: PlotPoints = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]
                    .into();
                    plot_ui.polygon(Polygon::new(points).fill_color(color).stroke(Stroke::NONE));
                }
            }
        });
}

/// Index of the cell whose centre is nearest to `v`, if any.
fn cell_index(v: f64) -> Option<usize> {
    let i = v.round();
    (i >= 0.0).then_some(i as usize)
}

/// Tick label for an axis position; only whole positions get a label.
fn axis_label(labels: &[String], v: f64) -> String {
    if (v - v.round()).abs() > 1e-6 {
        return String::new();
    }
    cell_index(v)
        .and_then(|i| labels.get(i))
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Colour bar
// ---------------------------------------------------------------------------

fn color_bar(ui: &mut Ui, figure: &HeatmapFigure) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{}", figure.range.low));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 14.0), Sense::hover());
        let step = rect.width() / COLOR_BAR_STEPS as f32;
        for i in 0..COLOR_BAR_STEPS {
            let t = i as f32 / (COLOR_BAR_STEPS - 1) as f32;
            let left = rect.left() + step * i as f32;
            let segment = Rect::from_min_max(
                egui::pos2(left, rect.top()),
                egui::pos2(left + step, rect.bottom()),
            );
            ui.painter().rect_filled(segment, 0.0, figure.scale.color_at(t));
        }
        ui.label(format!("{}", figure.range.high));
        ui.label(RichText::new(&figure.color_label).weak());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_labels_only_on_whole_positions() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(axis_label(&labels, 0.0), "a");
        assert_eq!(axis_label(&labels, 1.0), "b");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, 2.0), "");
        assert_eq!(axis_label(&labels, -1.0), "");
    }
}
