use eframe::egui::Color32;

use crate::color::{ColorRange, ColorScale};
use crate::data::model::Metric;
use crate::data::pivot::HeatmapMatrix;

/// One rendered heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureCell {
    pub value: Option<f64>,
    /// `None` for missing values, which are left blank.
    pub color: Option<Color32>,
}

/// Everything needed to draw the heatmap, independent of the UI toolkit.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapFigure {
    pub title: String,
    pub color_label: String,
    pub x_title: String,
    pub y_title: String,
    /// Comparison labels, left to right.
    pub x_labels: Vec<String>,
    /// Gene ids, top to bottom.
    pub y_labels: Vec<String>,
    pub range: ColorRange,
    pub scale: ColorScale,
    /// Row-major, `y_labels.len() * x_labels.len()` cells.
    pub cells: Vec<FigureCell>,
}

impl HeatmapFigure {
    pub fn new(matrix: &HeatmapMatrix, scale: ColorScale, range: ColorRange) -> Self {
        let cells = (0..matrix.n_rows())
            .flat_map(|r| matrix.row(r).iter().copied())
            .map(|value| FigureCell {
                value,
                color: value.map(|v| scale.color_at(range.position(v))),
            })
            .collect();

        HeatmapFigure {
            title: title_for(matrix.metric),
            color_label: matrix.metric.column().to_string(),
            x_title: "Comparison".to_string(),
            y_title: "GeneID".to_string(),
            x_labels: matrix.comparisons.clone(),
            y_labels: matrix.genes.clone(),
            range,
            scale,
            cells,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.y_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.x_labels.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&FigureCell> {
        if row >= self.n_rows() || col >= self.n_cols() {
            return None;
        }
        self.cells.get(row * self.n_cols() + col)
    }
}

pub fn title_for(metric: Metric) -> String {
    format!("Heatmap for {metric}")
}

/// Status line describing the applied colour bounds.
pub fn scale_status(range: &ColorRange) -> String {
    format!("Selected Color Scale: {} to {}", range.low, range.high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    #[test]
    fn test_figure_layout_and_clamping() {
        let a = record("A", "c1", Some(-5.0));
        let b = record("A", "c2", Some(5.0));
        let matrix = HeatmapMatrix::pivot(
            &[&a, &b],
            Metric::Log2FoldChange,
            &["A".to_string(), "B".to_string()],
            &["c1".to_string(), "c2".to_string()],
        )
        .unwrap();
        let scale = ColorScale::viridis();
        let fig = HeatmapFigure::new(&matrix, scale.clone(), ColorRange::new(-2.0, 2.0));

        assert_eq!(fig.title, "Heatmap for log2FoldChange");
        assert_eq!(fig.color_label, "log2FoldChange");
        assert_eq!(fig.x_labels, ["c1", "c2"]);
        assert_eq!(fig.y_labels, ["A", "B"]);
        assert_eq!(fig.cells.len(), 4);
        assert_eq!(fig.cell(0, 0).unwrap().color, Some(scale.low_color()));
        assert_eq!(fig.cell(0, 1).unwrap().color, Some(scale.high_color()));
        assert_eq!(fig.cell(1, 0).unwrap().color, None);
        assert!(fig.cell(2, 0).is_none());
    }

    #[test]
    fn test_status_formats_bounds() {
        assert_eq!(
            scale_status(&ColorRange::new(-2.0, 2.0)),
            "Selected Color Scale: -2 to 2"
        );
        assert_eq!(
            scale_status(&ColorRange::new(0.0, 0.5)),
            "Selected Color Scale: 0 to 0.5"
        );
    }
}
