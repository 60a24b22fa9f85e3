use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use expression_heatmap::config::{ComparisonSource, DashboardConfig, LoadMode, SliderExtent};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One simulated gene in one comparison.
struct Row {
    gene: String,
    base_mean: f64,
    lfc: f64,
    se: f64,
    pvalue: f64,
    padj: f64,
}

/// Benjamini-Hochberg adjusted p-values.
fn adjust(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| pvalues[b].total_cmp(&pvalues[a]));

    let mut adjusted = vec![1.0; n];
    let mut running = 1.0f64;
    for (k, &i) in order.iter().enumerate() {
        let rank = (n - k) as f64;
        running = running.min(pvalues[i] * n as f64 / rank);
        adjusted[i] = running.min(1.0);
    }
    adjusted
}

fn simulate(genes: &[String], rng: &mut SimpleRng, keep: f64) -> Vec<Row> {
    let mut rows = Vec::new();
    for gene in genes {
        if rng.next_f64() >= keep {
            continue;
        }
        let effect = if rng.next_f64() < 0.3 { rng.gauss(0.0, 3.0) } else { 0.0 };
        let se = 0.2 + rng.next_f64() * 0.4;
        let lfc = effect + rng.gauss(0.0, se);
        let z = lfc / se;
        rows.push(Row {
            gene: gene.clone(),
            base_mean: 50.0 + rng.next_f64() * 2000.0,
            lfc,
            se,
            pvalue: (-(z * z) / 2.0).exp().min(1.0),
            padj: 1.0,
        });
    }

    let pvalues: Vec<f64> = rows.iter().map(|r| r.pvalue).collect();
    for (row, padj) in rows.iter_mut().zip(adjust(&pvalues)) {
        row.padj = padj;
    }
    rows
}

/// limma layout: `logFC`, `AveExpr`, `t`, `P.Value`, `adj.P.Val`, `B`, with
/// gene ids either in an unnamed first column or in `GeneID`.
fn write_limma(path: &Path, rows: &[Row], unnamed_index: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV")?;
    let id = if unnamed_index { "" } else { "GeneID" };
    wtr.write_record([id, "logFC", "AveExpr", "t", "P.Value", "adj.P.Val", "B"])?;
    for r in rows {
        wtr.write_record([
            r.gene.clone(),
            format!("{:.6}", r.lfc),
            format!("{:.4}", r.base_mean.log2()),
            format!("{:.4}", r.lfc / r.se),
            format!("{:.6e}", r.pvalue),
            format!("{:.6e}", r.padj),
            format!("{:.4}", (r.lfc / r.se).abs() - 4.0),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// DESeq2 layout. Genes with low counts get an `NA` padj, as independent
/// filtering does.
fn write_deseq(path: &Path, rows: &[Row]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV")?;
    wtr.write_record(["GeneID", "baseMean", "log2FoldChange", "lfcSE", "stat", "pvalue", "padj"])?;
    for r in rows {
        let padj = if r.base_mean < 150.0 {
            "NA".to_string()
        } else {
            format!("{:.6e}", r.padj)
        };
        wtr.write_record([
            r.gene.clone(),
            format!("{:.3}", r.base_mean),
            format!("{:.6}", r.lfc),
            format!("{:.6}", r.se),
            format!("{:.4}", r.lfc / r.se),
            format!("{:.6e}", r.pvalue),
            padj,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("GeneID", DataType::Utf8, false),
        Field::new("baseMean", DataType::Float64, false),
        Field::new("log2FoldChange", DataType::Float64, false),
        Field::new("lfcSE", DataType::Float64, false),
        Field::new("pvalue", DataType::Float64, false),
        Field::new("padj", DataType::Float64, false),
    ]));

    let floats = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let genes: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(|r| r.gene.as_str()).collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            genes,
            floats(|r| r.base_mean),
            floats(|r| r.lfc),
            floats(|r| r.se),
            floats(|r| r.pvalue),
            floats(|r| r.padj),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sample_data".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let genes: Vec<String> = (1..=60).map(|i| format!("Gene{i:03}")).collect();

    let comparisons = [
        ("Day 0 vs Day 7", "Day_0_vs_Day_7.csv"),
        ("Day 7 vs Day 13", "Day_7_vs_Day_13.csv"),
        ("Day 13 vs Day 17", "results_D17_vs_D13.csv"),
        ("Day 17 vs Day 23", "results_D23_vs_D17.parquet"),
    ];

    let mut sources = Vec::new();
    for (i, (label, file)) in comparisons.iter().enumerate() {
        let rows = simulate(&genes, &mut rng, 0.9);
        let path = out_dir.join(file);
        match i {
            0 => write_limma(&path, &rows, true)?,
            1 => write_limma(&path, &rows, false)?,
            2 => write_deseq(&path, &rows)?,
            _ => write_parquet(&path, &rows)?,
        }
        println!("Wrote {} genes for '{label}' to {}", rows.len(), path.display());
        sources.push(ComparisonSource {
            label: label.to_string(),
            path: PathBuf::from(file),
        });
    }

    let config = DashboardConfig {
        title: "BIPSCs Differentiation Heatmap".to_string(),
        load_mode: LoadMode::Tolerant,
        comparisons: sources,
        slider: SliderExtent::Data,
        ..Default::default()
    };
    let config_path = out_dir.join("dashboard.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());

    Ok(())
}
