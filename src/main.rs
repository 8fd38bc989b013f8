//! Nodex CLI - Command-line tool for translation exports of content trees.
//!
//! This is the main entry point for the nodex command-line application.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nodex::prelude::*;

/// Settings file picked up from the working directory.
const DEFAULT_CONFIG_FILE: &str = "nodex.toml";

/// Nodex - translation export tool for multi-dimensional content trees
#[derive(Parser)]
#[command(name = "nodex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML); defaults to ./nodex.toml when present
    #[arg(short, long, global = true, env = "NODEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a content subtree as translation XML
    Export {
        /// Path to the store snapshot (JSON)
        #[arg(short, long, env = "NODEX_STORE")]
        store: PathBuf,

        /// Start of the subtree, relative to /sites (e.g. acme/about)
        #[arg(short = 'p', long)]
        starting_point: String,

        /// Language to export
        #[arg(long)]
        source_language: String,

        /// Language the content is translated into
        #[arg(long)]
        target_language: Option<String>,

        /// Output file; the XML is printed to stdout when omitted
        #[arg(short, long)]
        filename: Option<PathBuf>,

        /// Timestamp recorded in the document (RFC 3339 or YYYY-MM-DD)
        #[arg(long, value_parser = parse_timestamp)]
        modified_after: Option<DateTime<Utc>>,

        /// Leave out hidden content
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        ignore_hidden: bool,

        /// Do not descend into documents below the starting point
        #[arg(long)]
        exclude_child_documents: bool,

        /// Workspace to export
        #[arg(short, long, env = "NODEX_WORKSPACE")]
        workspace: Option<String>,

        /// Name of the language dimension
        #[arg(long, env = "NODEX_LANGUAGE_DIMENSION")]
        language_dimension: Option<String>,

        /// Node type all document types inherit from
        #[arg(long, env = "NODEX_DOCUMENT_NODE_TYPE")]
        document_node_type: Option<String>,
    },

    /// Summarize an exported XML file
    Inspect {
        /// Exported XML file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language, overriding the one recorded in the file
        #[arg(long)]
        target_language: Option<String>,

        /// Name of the language dimension
        #[arg(long, env = "NODEX_LANGUAGE_DIMENSION")]
        language_dimension: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Export {
            store,
            starting_point,
            source_language,
            target_language,
            filename,
            modified_after,
            ignore_hidden,
            exclude_child_documents,
            workspace,
            language_dimension,
            document_node_type,
        } => {
            if let Some(dimension) = language_dimension {
                settings.language_dimension = dimension;
            }
            if let Some(node_type) = document_node_type {
                settings.document_node_type = node_type;
            }

            let mut request = ExportRequest::new(starting_point, source_language)
                .ignore_hidden(ignore_hidden)
                .exclude_child_documents(exclude_child_documents);
            if let Some(language) = target_language {
                request = request.target_language(language);
            }
            if let Some(timestamp) = modified_after {
                request = request.modified_after(timestamp);
            }
            if let Some(workspace) = workspace {
                request = request.workspace(workspace);
            }

            cmd_export(&store, filename.as_deref(), &request, settings)?;
        }
        Commands::Inspect {
            input,
            target_language,
            language_dimension,
        } => {
            if let Some(dimension) = language_dimension {
                settings.language_dimension = dimension;
            }
            cmd_inspect(&input, target_language.as_deref(), &settings)?;
        }
    }

    Ok(())
}

fn load_settings(config: Option<&Path>) -> Result<ExportSettings> {
    match config {
        Some(path) => ExportSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!(path = DEFAULT_CONFIG_FILE, "loading settings");
            ExportSettings::load(DEFAULT_CONFIG_FILE).context("Failed to load nodex.toml")
        }
        None => Ok(ExportSettings::default()),
    }
}

fn cmd_export(
    store_path: &Path,
    filename: Option<&Path>,
    request: &ExportRequest,
    settings: ExportSettings,
) -> Result<()> {
    let start = Instant::now();
    let store = MemoryStore::open(store_path)
        .with_context(|| format!("Failed to open store snapshot {}", store_path.display()))?;
    debug!(
        records = store.record_count(),
        sites = store.site_count(),
        elapsed = ?start.elapsed(),
        "store loaded"
    );

    let service = ExportService::with_settings(&store, settings);

    let Some(output) = filename else {
        let xml = service
            .export_to_string(request)
            .context("Failed to export content")?;
        print!("{}", xml);
        return Ok(());
    };

    println!(
        "Exporting {} ({}) to {}",
        request.starting_point,
        request.source_language,
        output.display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Selecting and writing nodes...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let result = service.export_to_file(output, request);
    pb.finish_and_clear();

    let summary = result.context("Failed to export content")?;
    println!(
        "Exported {} nodes ({} variants) in {:?}",
        summary.nodes,
        summary.variants,
        start.elapsed()
    );

    Ok(())
}

fn cmd_inspect(input: &Path, target_language: Option<&str>, settings: &ExportSettings) -> Result<()> {
    let document = nodex::import::read_file(input)
        .with_context(|| format!("Failed to read export {}", input.display()))?;

    let target = document
        .resolve_target_language(target_language)
        .unwrap_or_else(|_| "-".to_string());

    println!("Site:      {} ({})", document.site_name, document.site_package_key);
    println!("Workspace: {}", document.workspace);
    println!("Languages: {} -> {}", document.source_language, target);
    if let Some(modified_after) = &document.modified_after {
        println!("Modified after: {}", modified_after);
    }
    println!("Format:    {}", document.format_version);

    let mut per_language: BTreeMap<&str, usize> = BTreeMap::new();
    for variant in document.nodes.iter().flat_map(|n| &n.variants) {
        let language = variant
            .dimensions
            .effective(&settings.language_dimension)
            .unwrap_or("-");
        *per_language.entry(language).or_insert(0) += 1;
    }

    println!(
        "\nTotal: {} nodes, {} variants",
        document.nodes.len(),
        document.variant_count()
    );
    for (language, count) in per_language {
        println!("  {:<8} {:>6} variants", language, count);
    }

    Ok(())
}

/// Parse an RFC 3339 timestamp or a plain date (midnight UTC).
fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp \"{value}\", expected RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T01:00:00+01:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from([
            "nodex",
            "export",
            "--store",
            "store.json",
            "--starting-point",
            "acme/about",
            "--source-language",
            "en",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                ignore_hidden,
                exclude_child_documents,
                filename,
                ..
            } => {
                assert!(ignore_hidden);
                assert!(!exclude_child_documents);
                assert!(filename.is_none());
            }
            Commands::Inspect { .. } => panic!("expected export command"),
        }
    }

    #[test]
    fn test_cli_ignore_hidden_false() {
        let cli = Cli::try_parse_from([
            "nodex",
            "export",
            "--store",
            "store.json",
            "--starting-point",
            "acme",
            "--source-language",
            "de",
            "--ignore-hidden",
            "false",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Export { ignore_hidden: false, .. }));
    }
}
