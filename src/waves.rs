// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Wave Exchange
//
// Emitters broadcast one offer wave per cycle; every absorber answers every
// offer with a confirmation of fixed weight. Links between entities are
// index newtypes into the owning simulation's registries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kinematics::{KinematicBody, Movable, Vec2};

/// Weight each confirmation contributes to its offer.
pub const CONFIRMATION_WEIGHT: f64 = 1.0;

// ─── Identifiers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsorberId(pub usize);

/// Position of an offer within the current cycle's offer list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OfferId(pub usize);

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter #{}", self.0)
    }
}

// ─── ResultMarker ────────────────────────────────────────────────────────────

/// Label an offer carries once it has been confirmed, naming its emitter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultMarker {
    pub emitter: EmitterId,
}

impl fmt::Display for ResultMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result from {}", self.emitter)
    }
}

// ─── ConfirmationWave ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationWave {
    pub offer: OfferId,
    pub absorber: AbsorberId,
    pub weight: f64,
}

// ─── OfferWave ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferWave {
    pub id: OfferId,
    pub emitter: EmitterId,
    confirmations: Vec<ConfirmationWave>,
    weight: f64,
    selected: bool,
    result: Option<ResultMarker>,
}

impl OfferWave {
    pub fn new(id: OfferId, emitter: EmitterId) -> Self {
        Self {
            id,
            emitter,
            confirmations: Vec::new(),
            weight: 0.0,
            selected: false,
            result: None,
        }
    }

    /// Attach a confirmation and recompute weight and result marker.
    /// Selected offers are frozen; the confirmation is dropped.
    pub fn add_confirmation(&mut self, confirmation: ConfirmationWave) {
        if self.selected {
            return;
        }
        self.confirmations.push(confirmation);
        self.weight = self.confirmations.iter().map(|c| c.weight).sum();
        self.result = Some(ResultMarker { emitter: self.emitter });
    }

    pub fn confirmations(&self) -> &[ConfirmationWave] {
        &self.confirmations
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_confirmed(&self) -> bool {
        !self.confirmations.is_empty()
    }

    pub fn result(&self) -> Option<ResultMarker> {
        self.result
    }

    pub(crate) fn mark_selected(&mut self) {
        self.selected = true;
    }
}

// ─── Emitter ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    pub id: EmitterId,
    body: KinematicBody,
    current_offer: Option<OfferId>,
}

impl Emitter {
    pub fn new(id: EmitterId, body: KinematicBody) -> Self {
        Self { id, body, current_offer: None }
    }

    /// Broadcast this cycle's offer. Any earlier offer is forgotten.
    pub fn emit_offer_wave(&mut self, offer: OfferId) -> OfferWave {
        self.current_offer = Some(offer);
        OfferWave::new(offer, self.id)
    }

    pub fn current_offer(&self) -> Option<OfferId> {
        self.current_offer
    }

    pub(crate) fn clear_offer(&mut self) {
        self.current_offer = None;
    }
}

impl Movable for Emitter {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

// ─── Absorber ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Absorber {
    pub id: AbsorberId,
    body: KinematicBody,
}

impl Absorber {
    pub fn new(id: AbsorberId, body: KinematicBody) -> Self {
        Self { id, body }
    }

    /// Answer `offer` with a unit-weight confirmation.
    pub fn confirm(&self, offer: &mut OfferWave) {
        offer.add_confirmation(ConfirmationWave {
            offer: offer.id,
            absorber: self.id,
            weight: CONFIRMATION_WEIGHT,
        });
    }
}

impl Movable for Absorber {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

/// Convenience for callers holding raw coordinates.
pub fn body_at(position: (f64, f64), velocity: (f64, f64)) -> KinematicBody {
    KinematicBody::new(
        Vec2::new(position.0, position.1),
        Vec2::new(velocity.0, velocity.1),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
