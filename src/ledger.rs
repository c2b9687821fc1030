// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Transaction Log

use serde::{Deserialize, Serialize};

use crate::kinematics::Vec2;
use crate::waves::EmitterId;

/// One committed transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub tick: u64,
    pub emitter: EmitterId,
    /// Emitter position when the transaction was committed.
    pub position: Vec2,
    pub weight: f64,
}

/// Append-only history of committed transactions. Full history is kept;
/// renderers read the tail through [`TransactionLog::recent`].
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<LogEntry>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Committed transactions per emitter, indexed by emitter id.
    pub fn wins_per_emitter(&self, emitter_count: usize) -> Vec<u64> {
        let mut wins = vec![0u64; emitter_count];
        for entry in &self.entries {
            if let Some(slot) = wins.get_mut(entry.emitter.0) {
                *slot += 1;
            }
        }
        wins
    }

    pub fn mean_weight(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|e| e.weight).sum::<f64>() / self.entries.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
