use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::data::pivot::HeatmapMatrix;
use crate::figure::HeatmapFigure;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Rasterise the heatmap grid, `cell_px` pixels per cell. Missing cells are
/// left white.
pub fn render_image(figure: &HeatmapFigure, cell_px: u32) -> RgbaImage {
    let cell_px = cell_px.max(1);
    let width = (figure.n_cols() as u32 * cell_px).max(1);
    let height = (figure.n_rows() as u32 * cell_px).max(1);
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    for row in 0..figure.n_rows() {
        for col in 0..figure.n_cols() {
            let Some(color) = figure.cell(row, col).and_then(|c| c.color) else {
                continue;
            };
            let px = Rgba([color.r(), color.g(), color.b(), 255]);
            let (x0, y0) = (col as u32 * cell_px, row as u32 * cell_px);
            for y in y0..y0 + cell_px {
                for x in x0..x0 + cell_px {
                    img.put_pixel(x, y, px);
                }
            }
        }
    }
    img
}

pub fn save_png(figure: &HeatmapFigure, path: &Path, cell_px: u32) -> Result<()> {
    render_image(figure, cell_px)
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the matrix as `GeneID,<comparison>...`, leaving missing cells empty.
pub fn write_matrix_csv<W: Write>(matrix: &HeatmapMatrix, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["GeneID".to_string()];
    header.extend(matrix.comparisons.iter().cloned());
    wtr.write_record(&header).context("writing CSV header")?;

    for (i, gene) in matrix.genes.iter().enumerate() {
        let mut record = vec![gene.clone()];
        record.extend(
            matrix
                .row(i)
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)
            .with_context(|| format!("writing row for {gene}"))?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

pub fn save_matrix_csv(matrix: &HeatmapMatrix, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_matrix_csv(matrix, file)
}
