// Transactional Exchange Benchmark Runner
// Monte Carlo over seeds, one report per selection policy, optional per-tick JSONL
//
// Usage:
//   cargo run --release --bin bench                          # Both policies, 30 runs each
//   cargo run --release --bin bench -- --runs 5              # Quick mode
//   cargo run --release --bin bench -- --policy prob         # Filter by policy name
//   cargo run --release --bin bench -- --config sim.json     # Custom SimConfig
//   cargo run --release --bin bench -- --time-series         # Enable JSONL output

mod monte_carlo;
mod report;
mod time_series;

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transact_engine::{SelectionPolicy, SimConfig};

use report::*;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bench", about = "Compare transaction selection policies across seeds")]
struct CliArgs {
    /// Runs per policy
    #[arg(long, default_value_t = 30)]
    runs: usize,

    /// Seed of the first run; run i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Ticks per run
    #[arg(long, default_value_t = 6_000)]
    ticks: u64,

    /// JSON SimConfig file; defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only run policies whose name contains this text
    #[arg(long)]
    policy: Option<String>,

    /// Write one JSONL file per run with a per-tick record
    #[arg(long)]
    time_series: bool,

    /// Output directory for reports
    #[arg(long, default_value = "benchmark-results")]
    out: PathBuf,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SimConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = CliArgs::parse();
    let base = load_config(cli.config.as_ref())?;

    let to_run: Vec<SelectionPolicy> = match &cli.policy {
        Some(f) => {
            let f_lower = f.to_lowercase();
            SelectionPolicy::ALL.into_iter()
                .filter(|p| p.name().contains(&f_lower))
                .collect()
        }
        None => SelectionPolicy::ALL.to_vec(),
    };
    if to_run.is_empty() {
        bail!("no policy matches filter {:?}", cli.policy);
    }

    let ts_dir = cli.time_series.then(|| cli.out.join("time-series"));

    info!(
        runs = cli.runs,
        seed = cli.seed,
        ticks = cli.ticks,
        emitters = base.emitters.count,
        absorbers = base.absorbers.count,
        "starting benchmark"
    );
    println!("\n  {:<16} {:>14} {:>12} {:>12} {:>12} {:>8}",
        "Policy", "Transactions", "Mean w", "Energy", "Top share", "Time");
    println!("  {}", "-".repeat(80));

    let suite_start = Instant::now();
    let mut reports = Vec::with_capacity(to_run.len());
    for policy in to_run {
        let report = monte_carlo::run_monte_carlo(
            &base,
            policy,
            cli.runs,
            cli.seed,
            cli.ticks,
            ts_dir.as_deref(),
        )?;

        println!("  {:<16} {:>8.1}±{:<5.1} {:>12.2} {:>12.2} {:>11.1}% {:>6.0}ms",
            report.policy,
            report.transaction_count.mean,
            report.transaction_count.half_width(),
            report.mean_weight.mean,
            report.final_energy.mean,
            report.top_emitter_share.mean * 100.0,
            report.elapsed_ms.mean,
        );
        reports.push(report);
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let bench_report = BenchReport {
        timestamp,
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_policy: cli.runs,
        ticks_per_run: cli.ticks,
        policies: reports,
    };

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?;
    let path = cli.out.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&bench_report)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    println!("\n  Finished in {:.2}s. Report: {}\n",
        suite_start.elapsed().as_secs_f64(), path.display());
    Ok(())
}
