//! End-to-end tests: files on disk → unified table → heatmap.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use expression_heatmap::config::{ComparisonSource, DashboardConfig, LoadMode};
use expression_heatmap::data::loader::load_comparisons;
use expression_heatmap::data::model::{Metric, UnifiedTable};
use expression_heatmap::handler::{HeatmapHandler, Selection};
use expression_heatmap::DashboardError;

const SCHEMA_A: &str = "\"\",\"logFC\",\"AveExpr\",\"t\",\"P.Value\",\"adj.P.Val\",\"B\"\n\
\"GeneA\",1.5,6.1,4.2,0.01,0.02,2.1\n\
\"GeneB\",-0.8,5.0,-2.0,0.05,0.08,-0.5\n\
\"GeneC\",0.1,7.3,0.3,0.7,0.9,-6.0\n";

const SCHEMA_B: &str = "GeneID,baseMean,log2FoldChange,lfcSE,stat,pvalue,padj\n\
GeneB,812.5,2.25,0.31,7.2,1e-6,3e-5\n\
GeneD,45.0,-0.4,0.9,-0.44,0.66,NA\n";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn source(label: &str, path: &Path) -> ComparisonSource {
    ComparisonSource {
        label: label.to_string(),
        path: path.to_path_buf(),
    }
}

fn two_file_table(dir: &TempDir) -> UnifiedTable {
    let a = write(dir, "d0_vs_d7.csv", SCHEMA_A);
    let b = write(dir, "d7_vs_d13.csv", SCHEMA_B);
    load_comparisons(
        &[source("Day 0 vs Day 7", &a), source("Day 7 vs Day 13", &b)],
        LoadMode::Strict,
    )
    .unwrap()
}

fn selection(genes: &[&str]) -> Selection {
    Selection {
        metric: Metric::Log2FoldChange,
        genes: genes.iter().map(|s| s.to_string()).collect(),
        scale_range: [-2.0, 2.0],
    }
}

#[test]
fn test_two_schemas_merge_into_one_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = two_file_table(&dir);

    assert_eq!(table.len(), 5);
    assert_eq!(table.comparisons(), ["Day 0 vs Day 7", "Day 7 vs Day 13"]);
    assert_eq!(table.gene_ids(), ["GeneA", "GeneB", "GeneC", "GeneD"]);

    let first = &table.records()[0];
    assert_eq!(first.gene_id, "GeneA");
    assert_eq!(first.log2_fold_change, Some(1.5));
    assert_eq!(first.pvalue, Some(0.01));
    assert_eq!(first.padj, Some(0.02));
    assert_eq!(first.comparison, "Day 0 vs Day 7");

    let last = &table.records()[4];
    assert_eq!(last.gene_id, "GeneD");
    assert_eq!(last.padj, None);
    assert_eq!(last.comparison, "Day 7 vs Day 13");
}

#[test]
fn test_overlapping_gene_fills_both_cells() {
    let dir = tempfile::tempdir().unwrap();
    let handler = HeatmapHandler::new(Arc::new(two_file_table(&dir)));

    let out = handler.handle(&selection(&["GeneB"])).unwrap();
    assert_eq!(out.matrix.n_rows(), 1);
    assert_eq!(out.matrix.n_cols(), 2);
    assert_eq!(out.matrix.row(0), [Some(-0.8), Some(2.25)]);
    assert_eq!(out.figure.title, "Heatmap for log2FoldChange");
    assert_eq!(out.status, "Selected Color Scale: -2 to 2");
}

#[test]
fn test_gene_in_one_comparison_leaves_a_gap() {
    let dir = tempfile::tempdir().unwrap();
    let handler = HeatmapHandler::new(Arc::new(two_file_table(&dir)));

    let out = handler.handle(&selection(&["GeneA"])).unwrap();
    assert_eq!(out.matrix.row(0), [Some(1.5), None]);
}

#[test]
fn test_row_order_matches_every_subset() {
    let dir = tempfile::tempdir().unwrap();
    let handler = HeatmapHandler::new(Arc::new(two_file_table(&dir)));
    let all = ["GeneA", "GeneB", "GeneC", "GeneD"];

    // Every non-empty subset, in reversed order to differ from table order.
    for mask in 1u32..(1 << all.len()) {
        let subset: Vec<&str> = all
            .iter()
            .enumerate()
            .rev()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, g)| *g)
            .collect();
        let out = handler.handle(&selection(&subset)).unwrap();
        assert_eq!(out.matrix.genes, subset);
    }

    let everything = handler.handle(&selection(&[])).unwrap();
    assert_eq!(everything.matrix.genes, all);
}

#[test]
fn test_pvalue_metric() {
    let dir = tempfile::tempdir().unwrap();
    let handler = HeatmapHandler::new(Arc::new(two_file_table(&dir)));
    let sel = Selection {
        metric: Metric::Padj,
        genes: vec!["GeneD".into(), "GeneA".into()],
        scale_range: [0.0, 0.05],
    };
    let out = handler.handle(&sel).unwrap();
    assert_eq!(out.matrix.row(0), [None, None]);
    assert_eq!(out.matrix.row(1), [Some(0.02), None]);
    assert_eq!(out.figure.color_label, "padj");
}

#[test]
fn test_duplicate_gene_within_file() {
    let dir = tempfile::tempdir().unwrap();
    let dup = write(
        &dir,
        "dup.csv",
        "GeneID,log2FoldChange,pvalue,padj\nG1,1.0,0.1,0.2\nG1,1.1,0.1,0.2\n",
    );
    let table = load_comparisons(&[source("c", &dup)], LoadMode::Strict).unwrap();
    let handler = HeatmapHandler::new(Arc::new(table));
    assert!(matches!(
        handler.handle(&selection(&[])),
        Err(DashboardError::AmbiguousPivot { .. })
    ));
}

#[test]
fn test_parquet_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d17_vs_d23.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("GeneID", DataType::Utf8, false),
        Field::new("log2FoldChange", DataType::Float64, true),
        Field::new("pvalue", DataType::Float64, true),
        Field::new("padj", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["GeneA", "GeneZ"])),
        Arc::new(Float64Array::from(vec![Some(-1.25), Some(0.5)])),
        Arc::new(Float64Array::from(vec![Some(0.03), None])),
        Arc::new(Float64Array::from(vec![Some(0.06), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let csv = write(&dir, "d0_vs_d7.csv", SCHEMA_A);
    let table = load_comparisons(
        &[source("Day 0 vs Day 7", &csv), source("Day 17 vs Day 23", &path)],
        LoadMode::Strict,
    )
    .unwrap();
    assert_eq!(table.len(), 5);

    let out = HeatmapHandler::new(Arc::new(table))
        .handle(&selection(&["GeneZ", "GeneA"]))
        .unwrap();
    assert_eq!(out.matrix.row(0), [None, Some(0.5)]);
    assert_eq!(out.matrix.row(1), [Some(1.5), Some(-1.25)]);
}

#[test]
fn test_pandas_parquet_index_is_gene_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("indexed.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("logFC", DataType::Float64, true),
        Field::new("P.Value", DataType::Float64, true),
        Field::new("adj.P.Val", DataType::Float64, true),
        Field::new("__index_level_0__", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(vec![Some(0.75)])),
        Arc::new(Float64Array::from(vec![Some(0.04)])),
        Arc::new(Float64Array::from(vec![Some(0.08)])),
        Arc::new(StringArray::from(vec!["GeneA"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = load_comparisons(&[source("pandas", &path)], LoadMode::Strict).unwrap();
    let record = &table.records()[0];
    assert_eq!(record.gene_id, "GeneA");
    assert_eq!(record.log2_fold_change, Some(0.75));
    assert_eq!(record.padj, Some(0.08));
}

#[test]
fn test_config_file_drives_tolerant_load() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "a.csv", SCHEMA_A);
    let config_path = write(
        &dir,
        "dashboard.json",
        r#"{
            "load_mode": "tolerant",
            "comparisons": [
                { "label": "Day 0 vs Day 7", "path": "a.csv" },
                { "label": "Day 7 vs Day 13", "path": "missing.csv" }
            ]
        }"#,
    );

    let config = DashboardConfig::from_path(&config_path).unwrap();
    let table = load_comparisons(&config.comparisons, config.load_mode).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.comparisons(), ["Day 0 vs Day 7"]);

    let strict = load_comparisons(&config.comparisons, LoadMode::Strict);
    assert!(matches!(strict, Err(DashboardError::FileRead { .. })));
}
