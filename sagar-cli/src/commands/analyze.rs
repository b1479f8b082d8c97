//! `sagar analyze` - run the pipeline over one local file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigLoader;
use anyhow::{Context, Result, bail};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use sagar_core::{
    Alert, EntropyRngSource, MemoryStore, Pipeline, ProcessOutcome, Processor, RngSource,
    SeededRngSource, Severity, Upload, UploadFormat, UploadStore,
};
use serde::Serialize;
use tracing::info;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// FASTQ (.fastq, .fq) or FASTA (.fasta, .fa) file
    pub file: PathBuf,

    /// Seed for a reproducible run (overrides `pipeline.seed`)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    upload: &'a Upload,
    summary: sagar_core::RunSummary,
    outcome: &'a ProcessOutcome,
}

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if args.seed.is_some() {
        config.pipeline.seed = args.seed;
    }

    let upload = register(&args.file)?;
    let upload_id = upload.id;

    let store = Arc::new(MemoryStore::new());
    store.insert(upload).await?;

    let rng: Arc<dyn RngSource> = match config.pipeline.seed {
        Some(seed) => Arc::new(SeededRngSource::new(seed)),
        None => Arc::new(EntropyRngSource),
    };
    let processor = Processor::new(
        Pipeline::new(config.pipeline)?,
        store.clone(),
        store.clone(),
        rng,
    );

    let outcome = processor.process(upload_id).await?;
    let upload = UploadStore::get(store.as_ref(), upload_id)
        .await?
        .context("upload disappeared from the store")?;

    if args.json {
        let report = JsonReport {
            upload: &upload,
            summary: outcome.run_summary(),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&upload, &outcome);
    }
    Ok(())
}

/// Describe a local file as a new pending upload.
fn register(path: &Path) -> Result<Upload> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?;
    let Some(format) = UploadFormat::from_filename(filename) else {
        bail!("Unsupported file type '{filename}': expected .fastq, .fq, .fasta or .fa");
    };
    let metadata =
        std::fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a regular file", path.display());
    }

    let upload = Upload::new(
        filename,
        path.display().to_string(),
        Some(metadata.len()),
        format,
    );
    info!(upload_id = %upload.id, %format, size = metadata.len(), "registered upload");
    Ok(upload)
}

fn print_report(upload: &Upload, outcome: &ProcessOutcome) {
    let summary = outcome.run_summary();
    let indices = summary.biodiversity_indices;

    println!("Upload:   {} ({})", upload.filename, upload.id);
    println!("Status:   {}", upload.status);
    println!();
    println!("{}", outcome.result.summary);
    println!();
    println!("ASVs:              {}", summary.asvs_count);
    println!("Species:           {}", summary.species_count);
    println!("Novel candidates:  {}", summary.novel_candidates);
    println!(
        "Shannon {:.2} • Simpson {:.2} • Chao1 {:.2} • Evenness {:.2}",
        indices.shannon, indices.simpson, indices.chao1, indices.evenness
    );
    println!();

    if outcome.alerts.is_empty() {
        println!("No alerts raised.");
        return;
    }

    println!("{}", alert_table(&outcome.alerts));
}

fn alert_table(alerts: &[Alert]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Severity").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Species").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
    ]);

    for alert in alerts {
        table.add_row(vec![
            Cell::new(alert.severity).fg(severity_color(alert.severity)),
            Cell::new(alert.alert_type),
            Cell::new(&alert.species_name),
            Cell::new(&alert.description),
        ]);
    }
    table
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::Yellow,
        Severity::Medium => Color::Blue,
        Severity::Low => Color::Grey,
    }
}
