// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Simulation Core

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};
use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::kinematics::{KinematicBody, Movable};
use crate::ledger::{LogEntry, TransactionLog};
use crate::particles::ParticleField;
use crate::selection::SelectionEngine;
use crate::types::*;
use crate::waves::*;

// ─── TransactionalSimulation struct ──────────────────────────────────────────

/// The whole system. It is the only mutator of its bodies, waves, particles
/// and log; renderers read it through [`TransactionalSimulation::snapshot`].
#[wasm_bindgen]
pub struct TransactionalSimulation {
    pub(crate) config: SimConfig,
    pub(crate) emitters: Vec<Emitter>,
    pub(crate) absorbers: Vec<Absorber>,

    // Current cycle only; replaced wholesale every tick
    pub(crate) offers: Vec<OfferWave>,

    pub(crate) selector: SelectionEngine,
    pub(crate) particles: ParticleField,
    pub(crate) log: TransactionLog,
    pub(crate) last_result: Option<ResultMarker>,

    pub(crate) tick: u64,
    pub(crate) transaction_count: u64,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl TransactionalSimulation {
    /// Build a system with bodies placed from the config's seed.
    pub fn from_config(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let emitters = (0..config.emitters.count)
            .map(|_| {
                KinematicBody::random(&mut rng, &config.bounds, config.emitters.velocity_spread)
            })
            .collect::<Vec<_>>();
        let absorbers = (0..config.absorbers.count)
            .map(|_| {
                KinematicBody::random(&mut rng, &config.bounds, config.absorbers.velocity_spread)
            })
            .collect::<Vec<_>>();

        Ok(Self::assemble(config, emitters, absorbers))
    }

    /// Build a system from explicit bodies. The config's body counts are
    /// overwritten by the list lengths; every other field is validated.
    pub fn with_bodies(
        mut config: SimConfig,
        emitters: Vec<KinematicBody>,
        absorbers: Vec<KinematicBody>,
    ) -> Result<Self, SimError> {
        if emitters.is_empty() {
            return Err(SimError::EmptyRole("emitter"));
        }
        if absorbers.is_empty() {
            return Err(SimError::EmptyRole("absorber"));
        }
        config.validate_runtime()?;
        config.emitters.count = emitters.len();
        config.absorbers.count = absorbers.len();
        Ok(Self::assemble(config, emitters, absorbers))
    }

    fn assemble(
        config: SimConfig,
        emitters: Vec<KinematicBody>,
        absorbers: Vec<KinematicBody>,
    ) -> Self {
        info!(
            emitters = emitters.len(),
            absorbers = absorbers.len(),
            policy = config.policy.name(),
            seed = config.seed,
            "simulation constructed"
        );
        Self {
            emitters: emitters
                .into_iter()
                .enumerate()
                .map(|(i, body)| Emitter::new(EmitterId(i), body))
                .collect(),
            absorbers: absorbers
                .into_iter()
                .enumerate()
                .map(|(i, body)| Absorber::new(AbsorberId(i), body))
                .collect(),
            offers: Vec::new(),
            selector: SelectionEngine::new(config.policy, config.seed),
            particles: ParticleField::new(config.particle_lifespan),
            log: TransactionLog::new(),
            last_result: None,
            tick: 0,
            transaction_count: 0,
            config,
        }
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl TransactionalSimulation {
    /// Run one tick: move, regenerate waves, confirm, select on cadence, age particles.
    pub fn tick_core(&mut self) -> TickResult {
        let tick = self.tick;

        // 1. Kinematics
        self.advance_bodies();

        // 2-3. Wave exchange
        self.generate_offer_waves();
        let confirmations = self.generate_confirmation_waves();

        // 4. Selection on the reduced cadence
        let selection_cycle = tick % self.config.selection_interval == 0;
        let committed = if selection_cycle {
            self.select_transaction()
        } else {
            None
        };

        // 5. Particle lifecycle
        let particles_expired = self.particles.age_and_prune();

        self.tick += 1;

        TickResult {
            tick,
            selection_cycle,
            confirmations,
            committed,
            particles_expired,
        }
    }

    fn advance_bodies(&mut self) {
        let bounds = self.config.bounds;
        for emitter in self.emitters.iter_mut() {
            emitter.advance(&bounds);
        }
        for absorber in self.absorbers.iter_mut() {
            absorber.advance(&bounds);
        }
    }

    /// One fresh offer per emitter; last cycle's offers are discarded.
    pub fn generate_offer_waves(&mut self) {
        self.offers.clear();
        for (i, emitter) in self.emitters.iter_mut().enumerate() {
            self.offers.push(emitter.emit_offer_wave(OfferId(i)));
        }
    }

    /// Every absorber confirms every offer. Returns the number of confirmations made.
    pub fn generate_confirmation_waves(&mut self) -> usize {
        let mut made = 0;
        for offer in self.offers.iter_mut() {
            for absorber in &self.absorbers {
                absorber.confirm(offer);
                made += 1;
            }
        }
        made
    }

    /// Commit at most one unselected offer under the configured policy.
    /// Returns the log entry of the committed transaction, if any.
    pub fn select_transaction(&mut self) -> Option<LogEntry> {
        let candidates: Vec<usize> = self.offers.iter()
            .enumerate()
            .filter(|(_, o)| !o.is_selected())
            .map(|(i, _)| i)
            .collect();
        let weights: Vec<f64> = candidates.iter()
            .map(|&i| self.offers[i].weight())
            .collect();

        let Some(pick) = self.selector.pick(&weights) else {
            trace!(tick = self.tick, candidates = candidates.len(), "no transaction selected");
            return None;
        };

        let offer = &mut self.offers[candidates[pick]];
        offer.mark_selected();
        self.last_result = offer.result();
        let emitter = offer.emitter;
        let weight = offer.weight();

        let position = self.emitters[emitter.0].position();
        self.particles.spawn(position);

        let entry = LogEntry {
            tick: self.tick,
            emitter,
            position,
            weight,
        };
        self.log.record(entry.clone());
        self.transaction_count += 1;

        debug!(
            tick = self.tick,
            emitter = emitter.0,
            weight,
            total = self.transaction_count,
            "transaction committed"
        );
        Some(entry)
    }

    /// Back to the state right after construction.
    pub fn reset_simulation(&mut self) {
        self.offers.clear();
        self.particles.clear();
        self.log.clear();
        self.last_result = None;
        self.tick = 0;
        self.transaction_count = 0;
        for emitter in self.emitters.iter_mut() {
            emitter.reset();
            emitter.clear_offer();
        }
        for absorber in self.absorbers.iter_mut() {
            absorber.reset();
        }
        self.selector.reseed();
        info!("simulation reset");
    }

    /// `0.5 * |v|²` summed over every emitter and absorber.
    pub fn calculate_total_energy(&self) -> f64 {
        self.emitters.iter().map(|e| e.kinetic_energy()).sum::<f64>()
            + self.absorbers.iter().map(|a| a.kinetic_energy()).sum::<f64>()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            emitters: self.emitters.iter()
                .map(|e| body_view(e.id.0, e, e.current_offer()))
                .collect(),
            absorbers: self.absorbers.iter()
                .map(|a| body_view(a.id.0, a, None))
                .collect(),
            offers: self.offers.iter()
                .map(|o| OfferView {
                    offer: o.id,
                    emitter: o.emitter,
                    origin: self.emitters[o.emitter.0].position(),
                    endpoints: o.confirmations().iter()
                        .map(|c| self.absorbers[c.absorber.0].position())
                        .collect(),
                    weight: o.weight(),
                    confirmed: o.is_confirmed(),
                    selected: o.is_selected(),
                })
                .collect(),
            particles: self.particles.particles().to_vec(),
            transaction_count: self.transaction_count,
            total_energy: self.calculate_total_energy(),
            last_result: self.last_result.map(|r| r.to_string()),
            recent_log: self.log.recent(self.config.log_display_len).to_vec(),
        }
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            ticks: self.tick,
            transaction_count: self.transaction_count,
            total_energy: self.calculate_total_energy(),
            mean_weight: self.log.mean_weight(),
            active_particles: self.particles.len(),
            wins_per_emitter: self.log.wins_per_emitter(self.emitters.len()),
        }
    }

    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn emitters(&self) -> &[Emitter] { &self.emitters }
    pub fn absorbers(&self) -> &[Absorber] { &self.absorbers }
    pub fn offers(&self) -> &[OfferWave] { &self.offers }
    pub fn particles(&self) -> &ParticleField { &self.particles }
    pub fn log(&self) -> &TransactionLog { &self.log }
    pub fn last_result(&self) -> Option<ResultMarker> { self.last_result }
    pub fn tick_index(&self) -> u64 { self.tick }
    pub fn transaction_count(&self) -> u64 { self.transaction_count }
}

fn body_view<M: Movable>(id: usize, body: &M, live_offer: Option<OfferId>) -> BodyView {
    BodyView {
        id,
        position: body.position(),
        velocity: body.velocity(),
        live_offer,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionPolicy;

    fn still(x: f64, y: f64) -> KinematicBody {
        body_at((x, y), (0.0, 0.0))
    }

    fn sim_with_offer_weights(policy: SelectionPolicy, weights: &[usize]) -> TransactionalSimulation {
        let max = weights.iter().copied().max().unwrap_or(0).max(1);
        let emitters = (0..weights.len()).map(|i| still(i as f64 * 10.0, 0.0)).collect();
        let absorbers = (0..max).map(|i| still(0.0, i as f64 * 10.0)).collect();
        let mut sim = TransactionalSimulation::with_bodies(
            SimConfig::default().with_policy(policy),
            emitters,
            absorbers,
        )
        .unwrap();
        sim.generate_offer_waves();
        for (offer, &w) in sim.offers.iter_mut().zip(weights) {
            for absorber in sim.absorbers.iter().take(w) {
                absorber.confirm(offer);
            }
        }
        sim
    }

    #[test]
    fn test_deterministic_picks_first_heaviest_offer() {
        let mut sim = sim_with_offer_weights(SelectionPolicy::Deterministic, &[3, 7, 7, 2]);
        let entry = sim.select_transaction().unwrap();
        assert_eq!(entry.emitter, EmitterId(1));
        assert_eq!(entry.weight, 7.0);
        assert!(sim.offers[1].is_selected());
        assert!(!sim.offers[2].is_selected());
        assert_eq!(sim.last_result(), Some(ResultMarker { emitter: EmitterId(1) }));
    }

    #[test]
    fn test_selected_offer_leaves_candidate_set() {
        let mut sim = sim_with_offer_weights(SelectionPolicy::Deterministic, &[3, 7, 7, 2]);
        sim.select_transaction();
        let second = sim.select_transaction().unwrap();
        assert_eq!(second.emitter, EmitterId(2));
        let third = sim.select_transaction().unwrap();
        assert_eq!(third.emitter, EmitterId(0));
        assert_eq!(sim.transaction_count(), 3);
    }

    #[test]
    fn test_probabilistic_single_weighted_offer_always_wins() {
        for seed in 0..25 {
            let mut sim = sim_with_offer_weights(SelectionPolicy::Probabilistic, &[1, 0, 0, 0]);
            sim.selector = SelectionEngine::new(SelectionPolicy::Probabilistic, seed);
            let entry = sim.select_transaction().unwrap();
            assert_eq!(entry.emitter, EmitterId(0));
        }
    }

    #[test]
    fn test_zero_weights_select_nothing() {
        for policy in SelectionPolicy::ALL {
            let mut sim = sim_with_offer_weights(policy, &[0, 0, 0]);
            assert!(sim.select_transaction().is_none());
            assert_eq!(sim.transaction_count(), 0);
            assert!(sim.log().is_empty());
            assert!(sim.particles().is_empty());
        }
    }

    #[test]
    fn test_no_offers_selects_nothing() {
        let mut sim = sim_with_offer_weights(SelectionPolicy::Deterministic, &[2]);
        sim.offers.clear();
        assert!(sim.select_transaction().is_none());
    }

    #[test]
    fn test_offers_replaced_each_tick() {
        let mut sim = TransactionalSimulation::from_config(SimConfig::default()).unwrap();
        sim.tick_core();
        assert!(sim.offers().iter().any(|o| o.is_selected()));
        sim.tick_core();
        assert_eq!(sim.offers().len(), 5);
        assert!(sim.offers().iter().all(|o| !o.is_selected()));
    }

    #[test]
    fn test_snapshot_endpoints_follow_confirmations() {
        let mut sim = TransactionalSimulation::with_bodies(
            SimConfig::default(),
            vec![still(10.0, 10.0)],
            vec![still(20.0, 20.0), still(30.0, 30.0)],
        )
        .unwrap();
        sim.tick_core();
        let snap = sim.snapshot();
        assert_eq!(snap.offers.len(), 1);
        let offer = &snap.offers[0];
        assert_eq!(offer.origin, still(10.0, 10.0).position);
        assert_eq!(offer.endpoints, vec![still(20.0, 20.0).position, still(30.0, 30.0).position]);
        assert!(offer.confirmed);
        assert!(offer.selected);
        assert_eq!(snap.last_result.as_deref(), Some("Result from emitter #0"));
    }

    #[test]
    fn test_snapshot_tracks_live_offer_per_emitter() {
        let mut sim = TransactionalSimulation::from_config(SimConfig::default()).unwrap();
        assert!(sim.snapshot().emitters.iter().all(|e| e.live_offer.is_none()));

        sim.tick_core();
        let snap = sim.snapshot();
        for (i, view) in snap.emitters.iter().enumerate() {
            assert_eq!(view.live_offer, Some(OfferId(i)));
            assert_eq!(snap.offers[i].offer, OfferId(i));
        }
        assert!(snap.absorbers.iter().all(|a| a.live_offer.is_none()));

        sim.reset_simulation();
        assert!(sim.snapshot().emitters.iter().all(|e| e.live_offer.is_none()));
    }
}
