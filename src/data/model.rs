use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a result table carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NA"),
        }
    }
}

impl CellValue {
    /// Guess the type of a textual cell. R's `NA` and empty cells are nulls.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "NA" {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "TRUE" => CellValue::Bool(true),
            "false" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Interpret the value as a metric. `NaN` counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text form used for identifiers; `None` for nulls.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the value a heatmap cell shows
// ---------------------------------------------------------------------------

/// One of the three per-gene statistics of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    #[serde(rename = "log2FoldChange")]
    Log2FoldChange,
    #[serde(rename = "pvalue")]
    PValue,
    #[serde(rename = "padj")]
    Padj,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Log2FoldChange, Metric::PValue, Metric::Padj];

    /// Canonical column name.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Log2FoldChange => "log2FoldChange",
            Metric::PValue => "pvalue",
            Metric::Padj => "padj",
        }
    }

    /// Human readable name for the selector.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Log2FoldChange => "Log2 Fold Change",
            Metric::PValue => "P-value",
            Metric::Padj => "Adjusted P-value",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// ExpressionRecord – one gene in one comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRecord {
    pub gene_id: String,
    pub log2_fold_change: Option<f64>,
    pub pvalue: Option<f64>,
    pub padj: Option<f64>,
    /// Label of the comparison this row was loaded from.
    pub comparison: String,
    /// Any other source column (baseMean, lfcSE, AveExpr, ...).
    pub extras: BTreeMap<String, CellValue>,
}

impl ExpressionRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Log2FoldChange => self.log2_fold_change,
            Metric::PValue => self.pvalue,
            Metric::Padj => self.padj,
        }
    }
}

// ---------------------------------------------------------------------------
// UnifiedTable – every record of every loaded comparison
// ---------------------------------------------------------------------------

/// The concatenated dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    records: Vec<ExpressionRecord>,
    /// Comparison labels of the loaded files, in load order.
    comparisons: Vec<String>,
    /// Distinct gene ids in first-occurrence order.
    gene_ids: Vec<String>,
    /// Names of extra columns in first-occurrence order.
    extra_columns: Vec<String>,
}

impl UnifiedTable {
    /// Build the table and its indices. Labels of `comparisons` that never
    /// appear in `records` are kept, so empty files still get a column.
    pub fn new(records: Vec<ExpressionRecord>, comparisons: Vec<String>) -> Self {
        let mut seen_genes = HashSet::new();
        let mut gene_ids = Vec::new();
        let mut seen_extras = HashSet::new();
        let mut extra_columns = Vec::new();
        let mut comparisons = comparisons;

        for rec in &records {
            if seen_genes.insert(rec.gene_id.as_str()) {
                gene_ids.push(rec.gene_id.clone());
            }
            for col in rec.extras.keys() {
                if seen_extras.insert(col.as_str()) {
                    extra_columns.push(col.clone());
                }
            }
            if !comparisons.contains(&rec.comparison) {
                comparisons.push(rec.comparison.clone());
            }
        }

        UnifiedTable {
            records,
            comparisons,
            gene_ids,
            extra_columns,
        }
    }

    pub fn records(&self) -> &[ExpressionRecord] {
        &self.records
    }

    pub fn comparisons(&self) -> &[String] {
        &self.comparisons
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `(min, max)` of a metric, ignoring missing values.
    pub fn metric_range(&self, metric: Metric) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.metric(metric))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
pub(crate) fn record(gene: &str, comparison: &str, lfc: Option<f64>) -> ExpressionRecord {
    ExpressionRecord {
        gene_id: gene.to_string(),
        log2_fold_change: lfc,
        pvalue: lfc.map(|v| v.abs() / 10.0),
        padj: None,
        comparison: comparison.to_string(),
        extras: BTreeMap::new(),
    }
}
