use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use sift_core::{FinancialSummary, ParsedStatement};
use sift_finance::{
    Categorizer, DefaultCategorizer, Reconciliation, RuleCategorizer, SummaryStats,
    apply_categories, calculate_financials, reconcile, summary_stats, write_csv,
};
use sift_ingest::{TextExtractor, extractor_for, parse_statement};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod llm;
mod state;

use config::Config;
use llm::LlmCategorizer;

#[derive(Parser, Debug)]
#[command(name = "sift", version, about = "Bank statement parser and summarizer")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement and print the raw transactions as JSON
    Parse {
        /// Statement PDF, or a text file of already-extracted text
        file: PathBuf,
    },

    /// Parse, categorize and summarize a statement
    Analyze {
        file: PathBuf,

        /// Categorize with the configured LLM instead of keyword rules
        #[arg(long)]
        llm: bool,

        /// Skip categorization; every row gets its direction's default
        #[arg(long, conflicts_with = "llm")]
        no_categorize: bool,

        /// Include counts, largest transactions and date range
        #[arg(long)]
        stats: bool,

        /// Check totals against the statement's own figures
        #[arg(long)]
        reconcile: bool,
    },

    /// Write categorized transactions to CSV
    Export {
        file: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        llm: bool,
    },

    /// Manage ~/.sift/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    #[serde(flatten)]
    summary: FinancialSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SummaryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<Reconciliation>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse { file } => {
            let cfg = config::load_config()?;
            let parsed = load_statement(&file)?;
            print_json(&parsed, cfg.output.pretty)?;
        }

        Command::Analyze {
            file,
            llm,
            no_categorize,
            stats,
            reconcile: check,
        } => {
            let cfg = config::load_config()?;
            let mut parsed = load_statement(&file)?;
            let categorizer = categorizer_for(&cfg, llm, no_categorize)?;
            parsed.transactions = apply_categories(parsed.transactions, categorizer.as_ref());

            let summary = calculate_financials(parsed.clone());
            let reconciliation = check.then(|| reconcile(&parsed, &summary));
            let stats = stats.then(|| summary_stats(&summary));

            print_json(
                &AnalyzeOutput {
                    summary,
                    stats,
                    reconciliation,
                },
                cfg.output.pretty,
            )?;
        }

        Command::Export { file, out, llm } => {
            let cfg = config::load_config()?;
            let parsed = load_statement(&file)?;
            if !parsed.is_financial_statement {
                warn!(reason = ?parsed.message, "nothing to export");
            }
            let categorizer = categorizer_for(&cfg, llm, false)?;
            let txns = apply_categories(parsed.transactions, categorizer.as_ref());

            let f = File::create(&out).with_context(|| format!("create {}", out.display()))?;
            write_csv(BufWriter::new(f), &txns)
                .with_context(|| format!("write {}", out.display()))?;
            println!("Wrote {} transactions to {}", txns.len(), out.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// stderr only; stdout carries the JSON.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("SIFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_statement(file: &Path) -> Result<ParsedStatement> {
    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }
    let doc = extractor_for(file)
        .extract(file)
        .with_context(|| format!("extracting {}", file.display()))?;
    info!(file = %file.display(), pages = doc.page_count, "extracted text");
    Ok(parse_statement(&doc.text))
}

/// `--llm` insists on the LLM; `[llm] enabled` only prefers it.
fn categorizer_for(cfg: &Config, llm: bool, no_categorize: bool) -> Result<Box<dyn Categorizer>> {
    if no_categorize {
        return Ok(Box::new(DefaultCategorizer));
    }
    if llm || cfg.llm.enabled {
        match LlmCategorizer::from_config(&cfg.llm) {
            Ok(c) => return Ok(Box::new(c)),
            Err(e) if llm => return Err(e.into()),
            Err(e) => warn!(error = %e, "LLM categorizer unavailable; using keyword rules"),
        }
    }
    Ok(Box::new(RuleCategorizer))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{s}");
    Ok(())
}
