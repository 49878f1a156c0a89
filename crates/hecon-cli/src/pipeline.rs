//! File-level anonymize and analyze runs.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use hecon_anonymize::{Anonymizer, ComplianceReport, write_csv};
use hecon_ingest::{load_records, normalize, read_csv_table};
use hecon_model::ParseWarnings;
use hecon_report::{HospitalMetrics, build_metrics, write_json};
use tracing::{info, info_span, warn};

use crate::config::HeconConfig;

#[derive(Debug)]
pub struct AnonymizeOutcome {
    pub input: PathBuf,
    pub dataset_path: PathBuf,
    pub report_path: PathBuf,
    pub rows: usize,
    pub report: ComplianceReport,
    pub parse_warnings: ParseWarnings,
}

#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub input: PathBuf,
    pub metrics_path: PathBuf,
    pub metrics: HospitalMetrics,
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extract".to_string())
}

fn parent_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Anonymizes `input` into `<stem>.anonymized.csv` and
/// `<stem>.compliance.json` under `output_dir` (default: next to the input).
pub fn anonymize_file(
    input: &Path,
    output_dir: Option<&Path>,
    config: &HeconConfig,
) -> Result<AnonymizeOutcome> {
    let span = info_span!("anonymize", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let salt = config.anonymize.salt.clone().unwrap_or_default();
    let anonymizer = Anonymizer::new(config.anonymize.policy.clone(), salt)
        .context("configure anonymizer")?;

    let table = read_csv_table(input)?;
    // Anonymization reads raw cells and the normalized age only, so columns
    // the analysis requires may be absent here.
    let batch = normalize(&table, &config.schema.all_optional())?;
    let (dataset, report) = anonymizer.anonymize_columns(&table.headers, &batch.records);
    for warning in &report.warnings {
        warn!(%warning, "compliance warning");
    }

    let output_dir = output_dir.map_or_else(|| parent_dir(input), Path::to_path_buf);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let stem = file_stem(input);
    let dataset_path = output_dir.join(format!("{stem}.anonymized.csv"));
    let report_path = output_dir.join(format!("{stem}.compliance.json"));

    let file = File::create(&dataset_path)
        .with_context(|| format!("create {}", dataset_path.display()))?;
    write_csv(&dataset, BufWriter::new(file))
        .with_context(|| format!("write {}", dataset_path.display()))?;
    write_json(&report, &report_path)?;

    info!(
        rows = dataset.len(),
        columns = dataset.columns.len(),
        clean = report.is_clean(),
        duration_ms = start.elapsed().as_millis(),
        "anonymization complete"
    );
    Ok(AnonymizeOutcome {
        input: input.to_path_buf(),
        dataset_path,
        report_path,
        rows: dataset.len(),
        report,
        parse_warnings: batch.warnings,
    })
}

/// Builds metrics for `input` and writes them to `output`
/// (default: `<stem>.metrics.json` next to the input).
pub fn analyze_file(
    input: &Path,
    output: Option<&Path>,
    config: &HeconConfig,
) -> Result<AnalyzeOutcome> {
    let span = info_span!("analyze", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let batch = load_records(input, &config.schema)?;
    let metrics = build_metrics(&batch.records, &batch.warnings, &config.analysis);

    let metrics_path = output.map_or_else(
        || parent_dir(input).join(format!("{}.metrics.json", file_stem(input))),
        Path::to_path_buf,
    );
    if let Some(parent) = metrics_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    write_json(&metrics, &metrics_path)?;

    info!(
        records = batch.len(),
        alerts = metrics.alerts.len(),
        duration_ms = start.elapsed().as_millis(),
        "analysis complete"
    );
    Ok(AnalyzeOutcome {
        input: input.to_path_buf(),
        metrics_path,
        metrics,
    })
}
