use std::collections::BTreeMap;

use anyhow::{bail, Result};

use super::model::{CellValue, ExpressionRecord, Metric};

pub const GENE_ID: &str = "GeneID";

/// Index column name pandas gives a header-less first column.
const UNNAMED_INDEX: &str = "Unnamed: 0";

/// Index column name pandas writes to Parquet for an unnamed index.
const PARQUET_INDEX: &str = "__index_level_0__";

/// Column renames applied when a table uses the limma-style names.
const LIMMA_RENAMES: [(&str, &str); 3] = [
    ("logFC", "log2FoldChange"),
    ("P.Value", "pvalue"),
    ("adj.P.Val", "padj"),
];

// ---------------------------------------------------------------------------
// RawTable – a parsed file before normalisation
// ---------------------------------------------------------------------------

/// A source table exactly as read: header row plus cells. Delimited files
/// keep every cell as `CellValue::String`; typing happens in `into_records`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename columns into the canonical schema. Idempotent.
    pub fn normalize(mut self) -> Self {
        normalize_headers(&mut self.headers);
        self
    }

    /// Convert the rows of a normalised table into records tagged with `comparison`.
    ///
    /// Fails when there is no `GeneID` column or a row has no gene id.
    /// Missing metric columns give missing values.
    pub fn into_records(self, comparison: &str) -> Result<Vec<ExpressionRecord>> {
        let Some(gene_idx) = self.column_index(GENE_ID) else {
            bail!(
                "no '{GENE_ID}' column (found: {})",
                self.headers.join(", ")
            );
        };

        let metric_idx: Vec<Option<usize>> = Metric::ALL
            .iter()
            .map(|m| {
                let idx = self.column_index(m.column());
                if idx.is_none() {
                    log::warn!("'{comparison}': no '{}' column, values will be missing", m.column());
                }
                idx
            })
            .collect();

        let extra_cols: Vec<(usize, &String)> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != gene_idx && !metric_idx.contains(&Some(*i)))
            .collect();

        let mut records = Vec::with_capacity(self.rows.len());
        for (row_no, row) in self.rows.iter().enumerate() {
            let gene_id = row
                .get(gene_idx)
                .and_then(gene_label)
                .ok_or_else(|| anyhow::anyhow!("row {row_no}: empty {GENE_ID}"))?;

            let metric = |k: usize| {
                metric_idx[k]
                    .and_then(|i| row.get(i))
                    .map(typed)
                    .and_then(|v| v.as_f64())
            };

            let extras: BTreeMap<String, CellValue> = extra_cols
                .iter()
                .map(|(i, name)| {
                    let value = row.get(*i).map(typed).unwrap_or(CellValue::Null);
                    ((*name).clone(), value)
                })
                .collect();

            records.push(ExpressionRecord {
                gene_id,
                log2_fold_change: metric(0),
                pvalue: metric(1),
                padj: metric(2),
                comparison: comparison.to_string(),
                extras,
            });
        }
        Ok(records)
    }
}

/// Gene ids are identifiers: text is kept verbatim (`007`, `1e3`, `NA` stay
/// as written), only blank cells are rejected.
fn gene_label(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::String(s) if s.trim().is_empty() => None,
        CellValue::String(s) => Some(s.clone()),
        other => other.as_label(),
    }
}

/// Type a raw text cell; cells from typed sources pass through.
fn typed(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::String(s) => CellValue::parse(s),
        other => other.clone(),
    }
}

/// Harmonise the two upstream header layouts.
///
/// * Empty header cells become `Unnamed: <index>`.
/// * If `logFC` is present, `logFC`, `P.Value` and `adj.P.Val` are renamed to
///   `log2FoldChange`, `pvalue` and `padj`.
/// * `Unnamed: 0` (CSV) and `__index_level_0__` (Parquet) become `GeneID`,
///   both being how pandas writes an unnamed row index.
pub fn normalize_headers(headers: &mut [String]) {
    for (i, h) in headers.iter_mut().enumerate() {
        if h.trim().is_empty() {
            *h = format!("Unnamed: {i}");
        }
    }

    if headers.iter().any(|h| h == "logFC") {
        for h in headers.iter_mut() {
            if let Some((_, to)) = LIMMA_RENAMES.iter().find(|(from, _)| h.as_str() == *from) {
                log::debug!("renaming column '{h}' to '{to}'");
                *h = (*to).to_string();
            }
        }
    }

    for h in headers.iter_mut() {
        if h == UNNAMED_INDEX || h == PARQUET_INDEX {
            *h = GENE_ID.to_string();
        }
    }
}
