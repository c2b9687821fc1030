// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Selection Engine

use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decorrelates the selection stream from the body-placement stream. XOR
/// with a non-zero salt never maps a seed onto itself.
const SELECTION_STREAM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

// ─── SelectionPolicy ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Heaviest offer wins; ties go to the earliest candidate.
    #[default]
    Deterministic,
    /// One draw with probability proportional to weight.
    Probabilistic,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 2] = [Self::Deterministic, Self::Probabilistic];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Probabilistic => "probabilistic",
        }
    }
}

// ─── SelectionEngine ─────────────────────────────────────────────────────────

/// Picks one candidate per cycle from a slice of weights.
///
/// The engine knows nothing about offers or emitters: callers pass the
/// weights of the unselected candidates in iteration order and get back the
/// index of the winner, or `None` when nothing can be picked (no candidates,
/// or total weight zero).
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    policy: SelectionPolicy,
    seed: u64,
    rng: ChaCha8Rng,
}

impl SelectionEngine {
    pub fn new(policy: SelectionPolicy, seed: u64) -> Self {
        Self {
            policy,
            seed,
            rng: selection_rng(seed),
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn pick(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total.is_nan() || total <= 0.0 {
            return None;
        }
        match self.policy {
            SelectionPolicy::Deterministic => pick_heaviest(weights),
            SelectionPolicy::Probabilistic => {
                let dist = WeightedIndex::new(weights.iter().copied()).ok()?;
                Some(dist.sample(&mut self.rng))
            }
        }
    }

    /// Rewind the random stream to its state at construction.
    pub fn reseed(&mut self) {
        self.rng = selection_rng(self.seed);
    }
}

fn selection_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed ^ SELECTION_STREAM_SALT)
}

/// First index holding the maximum weight.
fn pick_heaviest(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &w) in weights.iter().enumerate() {
        match best {
            Some((_, best_w)) if w <= best_w => {}
            _ => best = Some((i, w)),
        }
    }
    best.map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
