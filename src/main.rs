// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! alog command-line tool: merge, inspect and configure agent logs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::warn;

use alog::config;
use alog::event::Surface;
use alog::merge::{self, TraceSummary};
use alog::sink::read_jsonl;
use alog::telemetry::{init_console, ConsoleConfig};

/// alog version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// alog - structured logs for autonomous agents.
#[derive(Parser)]
#[command(name = "alog")]
#[command(author, version, about = "Structured logs for autonomous agents", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge log files into one timestamp-ordered JSONL file
    Merge {
        /// Log directory whose per-surface files are merged
        #[arg(short, long, conflicts_with = "inputs")]
        dir: Option<PathBuf>,

        /// Individual JSONL files to merge
        #[arg(short, long = "input", num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "unified.jsonl")]
        output: PathBuf,
    },

    /// Show per-surface counts and trace groups for a log directory
    Stats {
        /// Log directory
        #[arg(short, long, env = "ALOG_OUTPUT_DIR", default_value = config::DEFAULT_OUTPUT_DIRECTORY)]
        dir: PathBuf,

        /// List every trace group
        #[arg(long)]
        traces: bool,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the resolved configuration as YAML
    Config,

    /// Show version information
    Version,
}

#[derive(Debug, Serialize)]
struct DirectoryStats {
    directory: PathBuf,
    operational_events: usize,
    cognitive_events: usize,
    contextual_events: Option<usize>,
    total_events: usize,
    trace_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    traces: Option<Vec<TraceSummary>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let workspace_root = std::env::current_dir()?;
    let loaded = config::load_config(&workspace_root);

    let mut console = match &loaded {
        Ok(config) => ConsoleConfig::from_instrumentation(config),
        Err(_) => ConsoleConfig::default(),
    };
    if cli.debug {
        console = console.with_debug();
    }
    init_console(&console)?;
    if let Err(e) = &loaded {
        warn!(error = %e, "Ignoring invalid alog configuration");
    }

    match cli.command {
        Commands::Merge { dir, inputs, output } => handle_merge(dir, inputs, &output),
        Commands::Stats { dir, traces, format } => handle_stats(&dir, traces, format),
        Commands::Config => {
            let config = loaded?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        Commands::Version => {
            println!("alog {}", VERSION);
            Ok(())
        }
    }
}

fn handle_merge(dir: Option<PathBuf>, inputs: Vec<PathBuf>, output: &Path) -> anyhow::Result<()> {
    let count = match (dir, inputs.is_empty()) {
        (Some(dir), _) => {
            if !dir.is_dir() {
                bail!("Log directory '{}' not found", dir.display());
            }
            merge::merge_directory(&dir, output)
                .with_context(|| format!("Failed to merge logs in {}", dir.display()))?
        }
        (None, false) => merge::merge_files(&inputs, output).context("Failed to merge log files")?,
        (None, true) => bail!("Nothing to merge: pass --dir or at least one --input"),
    };

    println!("Exported {} unified logs to {}", count, output.display());
    Ok(())
}

fn handle_stats(dir: &Path, list_traces: bool, format: OutputFormat) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!(
            "Log directory '{}' not found. Run an instrumented agent first to generate logs.",
            dir.display()
        );
    }

    let count = |surface: Surface| -> anyhow::Result<Option<usize>> {
        let path = dir.join(surface.file_name());
        if !path.is_file() {
            return Ok(None);
        }
        let logs = read_jsonl(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(logs.len()))
    };

    let operational_events = count(Surface::Operational)?.unwrap_or(0);
    let cognitive_events = count(Surface::Cognitive)?.unwrap_or(0);
    let contextual_events = count(Surface::Contextual)?;

    let envelopes = merge::load_sorted(&merge::surface_files(dir))?;
    let groups = merge::group_by_trace(&envelopes);

    let stats = DirectoryStats {
        directory: dir.to_path_buf(),
        operational_events,
        cognitive_events,
        contextual_events,
        total_events: operational_events + cognitive_events + contextual_events.unwrap_or(0),
        trace_count: groups.len(),
        traces: list_traces.then_some(groups),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => print_stats(&stats),
    }
    Ok(())
}

fn print_stats(stats: &DirectoryStats) {
    println!("Logs in {}", stats.directory.display());
    println!("  Operational: {}", stats.operational_events);
    println!("  Cognitive:   {}", stats.cognitive_events);
    match stats.contextual_events {
        Some(count) => println!("  Contextual:  {}", count),
        None => println!("  Contextual:  (not persisted)"),
    }
    println!("  Total:       {}", stats.total_events);
    println!("  Traces:      {}", stats.trace_count);

    if let Some(traces) = &stats.traces {
        for trace in traces {
            println!(
                "\n  {} [{} .. {}]",
                trace.trace_id.short(),
                trace.first_timestamp.format("%H:%M:%S%.3f"),
                trace.last_timestamp.format("%H:%M:%S%.3f"),
            );
            println!("    agents: {}", trace.agents.join(", "));
            println!(
                "    events: {} operational, {} cognitive, {} contextual, {} errors",
                trace.operational, trace.cognitive, trace.contextual, trace.errors
            );
        }
    }
}
