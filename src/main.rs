//! Command-line entry point for msgstore-export.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use msgstore_export::config::AppConfig;
use msgstore_export::logging::init_logging;
use msgstore_export::report::render_transcript;
use msgstore_export::service::{resolve_datastore_path, run_export, ExportOptions, ExportOutcome};
use msgstore_export::snapshot::{load_snapshot, SNAPSHOT_FILE_NAME};
use msgstore_export::stats;
use msgstore_export::validation::InputValidator;

#[derive(Parser)]
#[command(
    name = "msgstore-export",
    about = "Extract, aggregate and report WhatsApp msgstore.db message history",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the datastore into a JSON snapshot plus integrity digest
    Export {
        /// Path to the com.whatsapp folder or the msgstore.db file.
        /// Falls back to the configured datastore path.
        path: Option<PathBuf>,
        /// Directory the snapshot and digest are written into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// How many most-active chats the summary reports
        #[arg(short, long)]
        top_k: Option<usize>,
    },
    /// Print aggregate statistics for a previously written snapshot
    Stats {
        /// Path to the snapshot file
        #[arg(short, long, default_value = SNAPSHOT_FILE_NAME)]
        snapshot: PathBuf,
        /// How many most-active chats to report
        #[arg(short, long)]
        top_k: Option<usize>,
    },
    /// Render a previously written snapshot as a colored transcript
    Report {
        /// Path to the snapshot file
        #[arg(short, long, default_value = SNAPSHOT_FILE_NAME)]
        snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Export {
            path,
            output_dir,
            top_k,
        } => export(&config, path, output_dir, top_k),
        Commands::Stats { snapshot, top_k } => print_stats(&config, &snapshot, top_k),
        Commands::Report { snapshot } => report(&snapshot),
    }
}

fn export(
    config: &AppConfig,
    path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    top_k: Option<usize>,
) -> Result<()> {
    let input = match path {
        Some(path) => path,
        None => {
            let configured = config.get_datastore_path();
            if configured.is_empty() {
                anyhow::bail!(
                    "No datastore path given. Pass one on the command line or set datastore.path"
                );
            }
            PathBuf::from(configured)
        }
    };

    let datastore = resolve_datastore_path(&input)?;
    InputValidator::validate_datastore_path(&datastore)?;

    let output_dir =
        output_dir.unwrap_or_else(|| PathBuf::from(&config.export.output_directory));
    InputValidator::validate_output_dir(&output_dir)?;

    let top_k = top_k.unwrap_or(config.export.top_k);
    InputValidator::validate_top_k(top_k)?;

    info!("Extracting {}", datastore.display());
    let options = ExportOptions {
        datastore,
        output_dir,
        top_k,
    };

    match run_export(&options)? {
        ExportOutcome::Written {
            snapshot_path,
            digest_path,
            stats,
        } => {
            println!("Snapshot written to {}", snapshot_path.display());
            println!("Digest written to {}", digest_path.display());
            print_summary(&stats);
        }
        ExportOutcome::NoData { digest_path } => {
            println!("No data found.");
            println!("Digest written to {}", digest_path.display());
        }
    }

    Ok(())
}

fn print_stats(config: &AppConfig, snapshot_path: &PathBuf, top_k: Option<usize>) -> Result<()> {
    InputValidator::validate_snapshot_path(snapshot_path)?;
    let top_k = top_k.unwrap_or(config.export.top_k);
    InputValidator::validate_top_k(top_k)?;

    let snapshot = load_snapshot(snapshot_path)?;
    let stats = stats::aggregate(&snapshot, top_k);
    print_summary(&stats);

    if !stats.daily_counts.is_empty() {
        println!("\nMessages per day:");
        for daily in &stats.daily_counts {
            println!("  {}  {}", daily.date, daily.count);
        }
    }

    Ok(())
}

fn print_summary(stats: &stats::SnapshotStats) {
    println!("Chats: {}", stats.num_chats);
    println!("Contacts: {}", stats.num_contacts);
    println!("Messages: {}", stats.num_messages);

    if !stats.top_chats.is_empty() {
        println!("Most active chats:");
        for chat in &stats.top_chats {
            println!("  {}  {} messages", chat.identity, chat.message_count);
        }
    }
}

fn report(snapshot_path: &PathBuf) -> Result<()> {
    InputValidator::validate_snapshot_path(snapshot_path)?;
    let snapshot = load_snapshot(snapshot_path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_transcript(&snapshot, &mut out)?;
    out.flush()?;

    Ok(())
}
