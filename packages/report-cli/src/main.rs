//! `vhr` - detect, parse and merge vehicle history reports saved as HTML.
//!
//! JSON goes to stdout. Logs and the per-document summary go to stderr so
//! the output can be piped straight into `jq`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vehicle_history::{
    detect_provider_with, ingest_document, ingest_documents, merge_by_vehicle, merge_documents,
    CoreConfig, ParsedDocument, RawDocument,
};

/// Library progress plus this binary's run summary; everything else warns only.
const DEFAULT_LOG_FILTER: &str = "warn,vehicle_history=info,vhr=info";

#[derive(Parser)]
#[command(name = "vhr")]
#[command(about = "Detect, parse and merge AutoCheck and Carfax reports")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Override the detection confidence floor (VHR_MIN_CONFIDENCE)
    #[arg(long, global = true)]
    min_confidence: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the provider and layout of a report
    Detect { file: PathBuf },

    /// Parse one report
    Parse { file: PathBuf },

    /// Parse several reports and merge them into one report per vehicle
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Merge every file as the same vehicle instead of grouping by VIN
        #[arg(long)]
        single: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();

    let mut config = CoreConfig::from_env().context("Failed to load configuration")?;
    if let Some(min_confidence) = cli.min_confidence {
        config = config.with_min_confidence(min_confidence);
        config.validate()?;
    }
    debug!(
        min_confidence = config.detection.min_confidence,
        text_threshold = config.similarity.text_threshold,
        odometer_tolerance = config.similarity.odometer_tolerance,
        max_concurrent_parses = config.ingest.max_concurrent_parses,
        "Loaded configuration"
    );

    match cli.command {
        Commands::Detect { file } => cmd_detect(&config, &file, cli.pretty),
        Commands::Parse { file } => cmd_parse(&config, &file, cli.pretty),
        Commands::Merge { files, single } => cmd_merge(&config, &files, single, cli.pretty).await,
    }
}

fn cmd_detect(config: &CoreConfig, file: &Path, pretty: bool) -> Result<()> {
    let html = read_report(file)?;

    let Some(detection) = detect_provider_with(&config.detection, &html) else {
        bail!("{}: not a recognized vehicle history report", file.display());
    };

    eprintln!(
        "{} {} {} (confidence {:.2})",
        "detected".green().bold(),
        detection.provider(),
        detection.version(),
        detection.confidence
    );
    emit(&detection, pretty)
}

fn cmd_parse(config: &CoreConfig, file: &Path, pretty: bool) -> Result<()> {
    let html = read_report(file)?;
    let parsed = ingest_document(&config.detection, &html, report_id(file));

    print_summary(&parsed);
    emit(&parsed, pretty)?;

    if !parsed.result.success {
        bail!("{}: parse failed", file.display());
    }
    Ok(())
}

async fn cmd_merge(
    config: &CoreConfig,
    files: &[PathBuf],
    single: bool,
    pretty: bool,
) -> Result<()> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        documents.push(RawDocument::new(report_id(file), read_report(file)?));
    }

    info!("Parsing {} report(s)", documents.len());
    let parsed = ingest_documents(documents, config).await;
    parsed.iter().for_each(print_summary);
    let parsed_ok = parsed.iter().filter(|p| p.result.success).count();

    if single {
        let report = merge_documents(&parsed, &config.similarity)
            .context("None of the reports could be parsed")?;
        info!("Merged {} document(s) into one report", parsed_ok);
        return emit(&report, pretty);
    }

    let reports = merge_by_vehicle(&parsed, &config.similarity)?;
    if reports.is_empty() {
        bail!("None of the reports could be parsed");
    }
    info!("Merged {} document(s) into {} vehicle(s)", parsed_ok, reports.len());
    emit(&reports, pretty)
}

fn read_report(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    // Saved pages are not always valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Provenance id for a file: its name, or the whole path when it has none.
fn report_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(parsed: &ParsedDocument) {
    let status = if parsed.result.success {
        "ok".green().bold()
    } else {
        "failed".red().bold()
    };
    let format = parsed
        .detection
        .map(|d| format!("{} {}", d.provider(), d.version()))
        .unwrap_or_else(|| "unknown format".to_string());

    eprintln!("{} {} [{}]", status, parsed.parsed_report_id, format);
    for error in &parsed.result.errors {
        eprintln!("  {} {}", "error:".red(), error);
    }
    for warning in &parsed.result.warnings {
        eprintln!("  {} {}", "warning:".yellow(), warning);
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
