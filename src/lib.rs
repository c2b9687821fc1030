// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator

pub mod config;
pub mod error;
pub mod kinematics;
pub mod ledger;
pub mod particles;
pub mod selection;
pub mod simulation;
pub mod types;
pub mod waves;

pub use config::{RoleConfig, SimConfig};
pub use error::{ConfigError, SimError};
pub use kinematics::{Bounds, KinematicBody, Movable, Vec2};
pub use ledger::{LogEntry, TransactionLog};
pub use particles::{Particle, ParticleField};
pub use selection::{SelectionEngine, SelectionPolicy};
pub use simulation::TransactionalSimulation;
pub use types::*;
pub use waves::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl TransactionalSimulation {
    /// `config` is a plain JS object shaped like [`SimConfig`]; missing
    /// fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TransactionalSimulation, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimConfig = if config.is_undefined() || config.is_null() {
            SimConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&e.to_string()))?
        };
        Ok(Self::from_config(config)?)
    }

    /// Advance one tick and return the frame snapshot.
    pub fn tick(&mut self) -> JsValue {
        self.tick_core();
        self.get_snapshot()
    }

    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot()).unwrap_or(JsValue::NULL)
    }

    pub fn get_stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.stats()).unwrap_or(JsValue::NULL)
    }

    /// Run N ticks without building snapshots
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }

    pub fn reset(&mut self) {
        self.reset_simulation();
    }

    pub fn get_transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn get_total_energy(&self) -> f64 {
        self.calculate_total_energy()
    }

    /// Milliseconds between ticks at the configured speed.
    pub fn frame_interval_ms(&self) -> f64 {
        self.config.frame_interval().as_secs_f64() * 1000.0
    }
}
