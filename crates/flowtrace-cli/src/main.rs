//! Flowtrace CLI tool.
//!
//! Provides commands for running the analysis pipeline, querying structural
//! clones, and inspecting the kernel registry.

use anyhow::Context;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use flowtrace_core::registry::KernelRegistry;
use flowtrace_forensics::prelude::{AnalysisPipeline, Transaction};
use flowtrace_graph::prelude::{
    AccountGraph, CloneSearchInput, StructuralCloneSearch,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowtrace")]
#[command(version, about = "Flowtrace transaction forensics CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline over a ledger file
    Analyze {
        /// JSON ledger file (array of transaction records)
        input: PathBuf,

        /// Write the full report as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find structural clones of an account's neighborhood
    Clones {
        /// JSON ledger file (array of transaction records)
        input: PathBuf,

        /// Target account id
        target: String,

        /// Hop radius of the reference ego network
        #[arg(long, default_value = "1")]
        hops: usize,

        /// Abort the search after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// List registered kernels
    List,

    /// Show kernel registry statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Analyze { input, output } => cmd_analyze(&input, output.as_deref()),
        Commands::Clones {
            input,
            target,
            hops,
            timeout_secs,
        } => cmd_clones(&input, &target, hops, timeout_secs),
        Commands::List => cmd_list(),
        Commands::Stats => cmd_stats(),
    }
}

/// Ledger record as stored on disk; the timestamp is kept as raw text so a
/// malformed value degrades to `None` instead of failing the load.
#[derive(Debug, Deserialize)]
struct RawTransaction {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: f64,
    #[serde(default)]
    timestamp: Option<String>,
}

fn load_ledger(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading ledger file {}", path.display()))?;
    let raw: Vec<RawTransaction> =
        serde_json::from_str(&data).context("parsing ledger JSON")?;

    let transactions = raw
        .into_iter()
        .map(|record| {
            let timestamp = record.timestamp.as_deref().and_then(|text| {
                match DateTime::parse_from_rfc3339(text) {
                    Ok(parsed) => Some(parsed.to_utc()),
                    Err(_) => {
                        warn!(
                            transaction_id = %record.transaction_id,
                            timestamp = %text,
                            "unparseable timestamp, excluding from window math"
                        );
                        None
                    }
                }
            });
            Transaction {
                transaction_id: record.transaction_id,
                sender_id: record.sender_id,
                receiver_id: record.receiver_id,
                amount: record.amount,
                timestamp,
            }
        })
        .collect();

    Ok(transactions)
}

fn cmd_analyze(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let transactions = load_ledger(input)?;
    let report = AnalysisPipeline::new().run(&transactions);

    println!("Analysis {}", report.analysis_id);
    println!("  accounts analyzed:   {}", report.summary.total_accounts_analyzed);
    println!("  suspicious accounts: {}", report.summary.suspicious_accounts_flagged);
    println!("  fraud rings:         {}", report.summary.fraud_rings_detected);
    println!("  processing time:     {}s", report.summary.processing_time_seconds);

    for ring in &report.fraud_rings {
        println!(
            "  {} [{}] risk {:.1}: {}",
            ring.ring_id,
            ring.pattern_type.as_str(),
            ring.risk_score,
            ring.members.join(", ")
        );
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn cmd_clones(
    input: &Path,
    target: &str,
    hops: usize,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let transactions = load_ledger(input)?;
    let graph = AccountGraph::from_edges(
        transactions
            .iter()
            .map(|tx| (tx.sender_id.as_str(), tx.receiver_id.as_str())),
    );

    let kernel = StructuralCloneSearch::new();
    let search_input = CloneSearchInput {
        graph,
        target_node: target.to_string(),
        hops,
    };

    let result = match timeout_secs {
        Some(secs) => {
            use flowtrace_core::traits::BatchKernel;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime
                .block_on(kernel.execute_with_timeout(search_input, Duration::from_secs(secs)))?
                .result
        }
        None => {
            if hops < 1 {
                anyhow::bail!("hops must be at least 1");
            }
            kernel.compute(&search_input.graph, target, hops)
        }
    };

    println!("Matched {} accounts", result.match_count);
    for node in &result.match_nodes {
        println!("  {node}");
    }
    println!("Matched {} edges", result.match_edges.len());
    for (src, dst) in &result.match_edges {
        println!("  {src} -> {dst}");
    }

    Ok(())
}

fn build_registry() -> anyhow::Result<KernelRegistry> {
    let registry = KernelRegistry::new();
    flowtrace_graph::register_all(&registry)?;
    flowtrace_forensics::register_all(&registry)?;
    Ok(registry)
}

fn cmd_list() -> anyhow::Result<()> {
    let registry = build_registry()?;

    println!("Flowtrace kernel catalogue");
    println!("--------------------------");
    for id in registry.kernel_ids() {
        if let Some(metadata) = registry.get(&id) {
            println!(
                "  {:32} {:6} {:14} {}",
                metadata.id,
                metadata.mode.as_str(),
                metadata.domain.as_str(),
                metadata.description
            );
        }
    }

    Ok(())
}

fn cmd_stats() -> anyhow::Result<()> {
    let registry = build_registry()?;
    let stats = registry.stats();

    println!("Registered kernels: {}", stats.total);
    println!("  batch: {}", stats.batch_kernels);
    println!("  query: {}", stats.query_kernels);
    for (domain, count) in &stats.by_domain {
        println!("  {domain}: {count}");
    }

    Ok(())
}
