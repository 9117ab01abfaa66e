//! Reporting and export: JSON, CSV, and Markdown artifacts.
//!
//! - **JSON**: full round-trip serialization of an [`RrgRun`] with schema versioning
//! - **CSV**: one row per tail point, ready for plotting tools
//! - **Markdown**: human-readable summary with quadrant dividers
//!
//! Persisted runs carry a `schema_version`. Newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rrg_core::{BenchmarkResolution, RrgOutcome, RrgReport};

use crate::runner::{RrgRun, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `RrgRun` to pretty JSON.
pub fn export_json(run: &RrgRun) -> Result<String> {
    serde_json::to_string_pretty(run).context("failed to serialize RrgRun to JSON")
}

/// Deserialize an `RrgRun` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RrgRun> {
    let run: RrgRun =
        serde_json::from_str(json).context("failed to deserialize RrgRun from JSON")?;
    if run.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            run.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(run)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export every tail point as CSV.
///
/// Columns: name, symbol, position, date, momentum_date, rs_ratio, rs_momentum
pub fn export_tails_csv(report: &RrgReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "name",
        "symbol",
        "position",
        "date",
        "momentum_date",
        "rs_ratio",
        "rs_momentum",
    ])?;

    for tail in &report.tails {
        for p in &tail.points {
            wtr.write_record([
                &tail.name,
                &tail.symbol,
                &p.position.to_string(),
                &p.date.to_string(),
                &p.momentum_date.to_string(),
                &format!("{:.6}", p.rs_ratio),
                &format!("{:.6}", p.rs_momentum),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run.
///
/// Creates `{run_id prefix}_{timestamp}/` under `output_dir` containing:
/// - `report.json`: the full `RrgRun`
/// - `tails.csv`: tail points (chart outcomes only)
/// - `summary.md`: Markdown summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(run: &RrgRun, output_dir: &Path) -> Result<PathBuf> {
    let prefix = match run.outcome.report() {
        Some(report) => report.fingerprint.run_id().chars().take(12).collect(),
        None => "rrg".to_string(),
    };
    let dirname = format!("{prefix}_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(run)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    if let Some(report) = run.outcome.report() {
        let tails_csv = export_tails_csv(report)?;
        std::fs::write(run_dir.join("tails.csv"), &tails_csv)?;
    }

    std::fs::write(run_dir.join("summary.md"), render_markdown(run))?;

    tracing::info!(dir = %run_dir.display(), "saved artifacts");
    Ok(run_dir)
}

/// Load an `RrgRun` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<RrgRun> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown summary for one run.
pub fn render_markdown(run: &RrgRun) -> String {
    let mut md = String::with_capacity(2048);
    let params = &run.config.params;

    md.push_str("# Relative Rotation Graph\n\n");

    md.push_str("## Run\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Benchmark | {} |\n", run.config.benchmark));
    md.push_str(&format!("| Timeframe | {} |\n", run.timeframe));
    if let (Some(first), Some(last)) = (run.first_date, run.last_date) {
        md.push_str(&format!("| Period | {first} to {last} |\n"));
    }
    md.push_str(&format!("| Rows | {} |\n", run.rows_used));
    md.push_str(&format!(
        "| Smoothing / Momentum / Tail | {} / {} / {} |\n",
        params.smoothing_period, params.momentum_period, params.tail_length
    ));
    md.push_str(&format!("| Pairing | {} |\n", params.pairing.as_str()));
    if run.has_synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    match &run.outcome {
        RrgOutcome::Chart(report) => render_chart(&mut md, report),
        RrgOutcome::InsufficientData {
            benchmark,
            excluded,
            ..
        } => {
            render_substitution(&mut md, benchmark);
            md.push_str("Not enough data to plot RRG chart with tails.\n\n");
            if !excluded.is_empty() {
                md.push_str(&format!("Excluded: {}\n", excluded.join(", ")));
            }
        }
        RrgOutcome::NoValidData { requested } => {
            md.push_str(&format!(
                "No valid price data for any requested symbol ({}).\n",
                requested.join(", ")
            ));
        }
    }

    md
}

fn render_substitution(md: &mut String, benchmark: &BenchmarkResolution) {
    if benchmark.substituted {
        md.push_str(&format!(
            "> Benchmark {} had no complete data; using {} instead.\n\n",
            benchmark.requested, benchmark.resolved
        ));
    }
}

fn render_chart(md: &mut String, report: &RrgReport) {
    render_substitution(md, &report.benchmark);

    md.push_str("## Instruments\n\n");
    md.push_str("| Name | Symbol | RS-Ratio | RS-Momentum | Quadrant | Heading |\n");
    md.push_str("| --- | --- | ---: | ---: | --- | ---: |\n");
    for tail in &report.tails {
        let Some(latest) = tail.latest() else {
            continue;
        };
        let heading = tail
            .direction
            .map(|d| format!("{:.0}°", d.heading_degrees()))
            .unwrap_or_else(|| "-".into());
        md.push_str(&format!(
            "| {} | {} | {:.2} | {:.4} | {} | {} |\n",
            tail.name, tail.symbol, latest.rs_ratio, latest.rs_momentum, tail.quadrant, heading
        ));
    }
    md.push('\n');

    let s = &report.statistics;
    md.push_str("## Dividers\n\n");
    md.push_str("| Axis | Mean | Min | Max |\n");
    md.push_str("| --- | ---: | ---: | ---: |\n");
    md.push_str(&format!(
        "| RS-Ratio | {:.4} | {:.4} | {:.4} |\n",
        s.x_mean, s.x_min, s.x_max
    ));
    md.push_str(&format!(
        "| RS-Momentum | {:.4} | {:.4} | {:.4} |\n",
        s.y_mean, s.y_min, s.y_max
    ));
    md.push('\n');

    if !report.excluded.is_empty() || !report.dropped.is_empty() {
        md.push_str("## Data Quality\n\n");
        for dropped in &report.dropped {
            md.push_str(&format!("- dropped {} ({:?})\n", dropped.symbol, dropped.reason));
        }
        for name in &report.excluded {
            md.push_str(&format!("- {name}: not enough history for a tail\n"));
        }
        md.push('\n');
    }

    md.push_str(&format!("Run ID: `{}`\n", report.fingerprint.run_id()));
}
