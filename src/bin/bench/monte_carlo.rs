// Monte Carlo Infrastructure — N seeded runs per policy with statistical aggregation
// Run i uses seed base_seed + i, so both policies see identical body layouts.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};
use transact_engine::{SelectionPolicy, SimConfig, SimError, TransactionalSimulation};

use crate::report::*;
use crate::time_series::TimeSeriesRecorder;

/// Run a single simulation with a specific seed.
pub fn run_single(
    base: &SimConfig,
    policy: SelectionPolicy,
    seed: u64,
    ticks: u64,
    time_series_dir: Option<&Path>,
) -> Result<RunResult, SimError> {
    let start = Instant::now();
    let config = base.clone().with_policy(policy).with_seed(seed);
    let mut sim = TransactionalSimulation::from_config(config)?;

    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut peak_particles = 0;

    for _ in 0..ticks {
        let result = sim.tick_core();
        peak_particles = peak_particles.max(sim.particles().len());
        if let Some(ts) = time_series.as_mut() {
            ts.record(&result, &sim);
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(policy.name()).join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            warn!(path = %path.display(), error = %e, "failed to write time series");
        }
    }

    let stats = sim.stats();
    let top = stats.wins_per_emitter.iter().copied().max().unwrap_or(0);
    let top_emitter_share = if stats.transaction_count > 0 {
        top as f64 / stats.transaction_count as f64
    } else {
        0.0
    };

    debug!(policy = policy.name(), seed, transactions = stats.transaction_count, "run finished");

    Ok(RunResult {
        policy: policy.name().to_string(),
        seed,
        ticks,
        transaction_count: stats.transaction_count,
        mean_weight: stats.mean_weight,
        final_energy: stats.total_energy,
        peak_particles,
        wins_per_emitter: stats.wins_per_emitter,
        top_emitter_share,
        elapsed_ms: start.elapsed().as_millis(),
    })
}

/// Run Monte Carlo: N runs of one policy, aggregate stats.
pub fn run_monte_carlo(
    base: &SimConfig,
    policy: SelectionPolicy,
    n_runs: usize,
    base_seed: u64,
    ticks: u64,
    time_series_dir: Option<&Path>,
) -> Result<PolicyReport, SimError> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(base, policy, seed, ticks, time_series_dir)?);
    }
    Ok(aggregate(policy, results))
}

fn aggregate(policy: SelectionPolicy, results: Vec<RunResult>) -> PolicyReport {
    let collect = |f: fn(&RunResult) -> f64| -> Stats {
        Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
    };

    PolicyReport {
        policy: policy.name().to_string(),
        n_runs: results.len(),
        transaction_count: collect(|r| r.transaction_count as f64),
        mean_weight: collect(|r| r.mean_weight),
        final_energy: collect(|r| r.final_energy),
        top_emitter_share: collect(|r| r.top_emitter_share),
        elapsed_ms: collect(|r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_favours_first_emitter() {
        // All offers tie every cycle, so the first emitter takes every transaction
        let report = run_monte_carlo(&SimConfig::default(), SelectionPolicy::Deterministic, 3, 0, 600, None)
            .unwrap();
        assert_eq!(report.n_runs, 3);
        for run in &report.individual_runs {
            assert_eq!(run.transaction_count, 10);
            assert_eq!(run.wins_per_emitter[0], 10);
            assert_eq!(run.top_emitter_share, 1.0);
        }
    }

    #[test]
    fn test_probabilistic_spreads_wins() {
        let report = run_monte_carlo(&SimConfig::default(), SelectionPolicy::Probabilistic, 5, 0, 6000, None)
            .unwrap();
        assert!(report.top_emitter_share.mean < 1.0);
        assert!((report.transaction_count.mean - 100.0).abs() < 1e-12);
    }
}
