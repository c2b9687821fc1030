// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per tick for independent analysis

use serde::Serialize;
use std::io::Write;
use transact_engine::{TickResult, TransactionalSimulation};

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub selection_cycle: bool,
    pub committed_emitter: Option<usize>,
    pub committed_weight: Option<f64>,
    pub transaction_count: u64,
    pub total_energy: f64,
    pub active_particles: usize,
    pub confirmations: usize,
}

impl TickSnapshot {
    pub fn from_tick(result: &TickResult, sim: &TransactionalSimulation) -> Self {
        Self {
            tick: result.tick,
            selection_cycle: result.selection_cycle,
            committed_emitter: result.committed.as_ref().map(|e| e.emitter.0),
            committed_weight: result.committed.as_ref().map(|e| e.weight),
            transaction_count: sim.transaction_count(),
            total_energy: sim.calculate_total_energy(),
            active_particles: sim.particles().len(),
            confirmations: result.confirmations,
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
#[derive(Default)]
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &TickResult, sim: &TransactionalSimulation) {
        self.snapshots.push(TickSnapshot::from_tick(result, sim));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot).map_err(std::io::Error::other)?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }
}
