//! srclint - audit the source archive URLs declared in a metadata document.
//!
//! Findings go to stdout, logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use srclint_core::{
    load_document, resolve_document_path, AuditConfig, Auditor, ExitPolicy, FindingSink,
    HttpProber, JsonLinesReport, TextReport,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One human-readable line per finding
    Text,
    /// One JSON object per finding
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "srclint")]
#[command(about = "Audit source archive URLs declared in a conandata.yml document")]
struct Args {
    /// Document, or directory containing conandata.yml
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Timeout in seconds for probing declared URLs
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Timeout in seconds for probing alternative archive formats
    #[arg(long, default_value = "2")]
    probe_timeout: u64,

    /// Do not look for smaller alternative archives
    #[arg(long)]
    no_alternatives: bool,

    /// Output format for findings
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Exit with status 1 when an error-level finding is reported
    #[arg(long)]
    strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn audit_config(&self) -> AuditConfig {
        AuditConfig::new()
            .with_request_timeout(Duration::from_secs(self.timeout))
            .with_sibling_timeout(Duration::from_secs(self.probe_timeout))
            .with_alternatives(!self.no_alternatives)
    }

    fn exit_policy(&self) -> ExitPolicy {
        if self.strict {
            ExitPolicy::Strict
        } else {
            ExitPolicy::Advisory
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = args.audit_config();
    config.validate()?;

    let document = resolve_document_path(&args.path);
    info!("Auditing {}", document.display());
    let tree = load_document(&document)
        .with_context(|| format!("Failed to load {}", document.display()))?;

    let auditor = Auditor::new(config, HttpProber::new()?);
    let stdout = std::io::stdout().lock();
    let mut sink: Box<dyn FindingSink> = match args.format {
        OutputFormat::Text => Box::new(TextReport::new(stdout)),
        OutputFormat::Json => Box::new(JsonLinesReport::new(stdout)),
    };
    let summary = auditor.audit(&tree, sink.as_mut()).await?;
    drop(sink);

    info!(
        "{} entries checked, {} findings",
        summary.entries,
        summary.findings()
    );

    let code = summary.exit_code(args.exit_policy());
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
