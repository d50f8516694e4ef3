//! Ranked-output export — CSV and JSON artifact generation.
//!
//! Two logical collections leave a run: the full ranked output (every
//! scored prediction, all breakdown columns, selected flag and gate
//! reason) and the selected subset. Both are written as CSV for tabular
//! consumers and JSON for structured ones; rejected records go to a
//! separate JSON file with their reasons.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::selector::{RankedResult, RankedRow};

/// Column set shared by the full and selected CSVs.
const CSV_HEADER: [&str; 27] = [
    "source",
    "submission_id",
    "asset",
    "direction",
    "confidence",
    "issued_at",
    "technical_bias",
    "technical_alignment",
    "weighted_momentum",
    "momentum_alignment",
    "fundamental_score",
    "time_consistency",
    "structural_reliability",
    "confidence_reliability",
    "entry_price",
    "move_pct",
    "horizon_hours",
    "p_touch",
    "p_reach_target",
    "entry_precision",
    "target_precision",
    "move_realism",
    "liquidity",
    "entry_score",
    "final_score",
    "label",
    "selected",
];

/// Serialize the full ranked output as CSV (plus a trailing gate_reason column).
pub fn export_full_csv(result: &RankedResult) -> Result<String> {
    rows_to_csv(result.rows.iter())
}

/// Serialize only the selected subset as CSV.
pub fn export_selected_csv(result: &RankedResult) -> Result<String> {
    rows_to_csv(result.selected())
}

/// Serialize the full ranked output (rows + rejected) as pretty JSON.
pub fn export_json(result: &RankedResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ranked result to JSON")
}

fn rows_to_csv<'a>(rows: impl Iterator<Item = &'a RankedRow>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    header.push("gate_reason");
    wtr.write_record(&header)?;

    for row in rows {
        wtr.write_record(row_record(row))?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn row_record(row: &RankedRow) -> Vec<String> {
    let p = &row.prediction;
    let b = &row.breakdown;
    let entry = b.entry.as_ref();

    vec![
        p.source.clone(),
        p.submission_id.clone(),
        p.asset.clone(),
        p.direction.to_string(),
        format!("{:.4}", p.confidence),
        p.issued_at.to_rfc3339(),
        format!("{:.6}", b.technical_bias),
        format!("{:.6}", b.technical_alignment),
        format!("{:.6}", b.weighted_momentum),
        format!("{:.6}", b.momentum_alignment),
        format!("{:.6}", b.fundamental_score),
        format!("{:.6}", b.time_consistency),
        format!("{:.6}", b.structural_reliability),
        format!("{:.6}", b.confidence_reliability),
        fmt_opt(p.entry_price),
        fmt_opt(p.move_pct),
        p.horizon_hours.map(|h| h.to_string()).unwrap_or_default(),
        fmt_opt(entry.map(|e| e.p_touch)),
        fmt_opt(entry.and_then(|e| e.p_reach_target)),
        fmt_opt(entry.map(|e| e.entry_precision)),
        fmt_opt(entry.and_then(|e| e.target_precision)),
        fmt_opt(entry.and_then(|e| e.move_realism)),
        fmt_opt(entry.map(|e| e.liquidity)),
        fmt_opt(entry.map(|e| e.entry_score)),
        format!("{:.6}", b.final_score),
        b.label.as_str().to_string(),
        row.selected.to_string(),
        row.gate.as_ref().map(|g| g.reason()).unwrap_or_default(),
    ]
}

/// Write the full artifact set for a batch run into `output_dir`:
/// `full_ranked.csv`, `full_ranked.json`, `selected.csv`, `selected.json`,
/// and `rejected.json`. Returns the paths written.
pub fn save_outputs(result: &RankedResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let mut written = Vec::new();
    let mut write = |name: &str, content: String| -> Result<()> {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
        Ok(())
    };

    write("full_ranked.csv", export_full_csv(result)?)?;
    write("full_ranked.json", export_json(result)?)?;
    write("selected.csv", export_selected_csv(result)?)?;

    let selected_rows: Vec<&RankedRow> = result.selected().collect();
    write(
        "selected.json",
        serde_json::to_string_pretty(&selected_rows)
            .context("failed to serialize selected rows")?,
    )?;

    write(
        "rejected.json",
        serde_json::to_string_pretty(&result.rejected)
            .context("failed to serialize rejected records")?,
    )?;

    Ok(written)
}
