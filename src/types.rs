// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Renderer-Facing Types

use serde::{Deserialize, Serialize};

use crate::kinematics::Vec2;
use crate::ledger::LogEntry;
use crate::particles::Particle;
use crate::waves::{EmitterId, OfferId};

// ─── BodyView ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyView {
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    /// The offer an emitter currently has in flight. Always `None` for absorbers.
    #[serde(default)]
    pub live_offer: Option<OfferId>,
}

// ─── OfferView ───────────────────────────────────────────────────────────────

/// An offer wave as the renderer draws it: a line from `origin` to every
/// confirming absorber in `endpoints`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferView {
    pub offer: OfferId,
    pub emitter: EmitterId,
    pub origin: Vec2,
    pub endpoints: Vec<Vec2>,
    pub weight: f64,
    pub confirmed: bool,
    pub selected: bool,
}

// ─── FrameSnapshot ───────────────────────────────────────────────────────────

/// Everything a renderer reads for one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub emitters: Vec<BodyView>,
    pub absorbers: Vec<BodyView>,
    pub offers: Vec<OfferView>,
    pub particles: Vec<Particle>,
    pub transaction_count: u64,
    pub total_energy: f64,
    pub last_result: Option<String>,
    /// Newest log entries, oldest first.
    pub recent_log: Vec<LogEntry>,
}

// ─── TickResult ──────────────────────────────────────────────────────────────

/// What happened during one tick.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TickResult {
    /// Index of the tick that just ran.
    pub tick: u64,
    pub selection_cycle: bool,
    pub confirmations: usize,
    pub committed: Option<LogEntry>,
    pub particles_expired: usize,
}

// ─── SimStats ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimStats {
    pub ticks: u64,
    pub transaction_count: u64,
    pub total_energy: f64,
    pub mean_weight: f64,
    pub active_particles: usize,
    pub wins_per_emitter: Vec<u64>,
}
