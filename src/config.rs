// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Configuration

//! Construction-time configuration.
//!
//! Every field is fixed for the lifetime of a simulation. Changing any of them
//! means building a new [`crate::TransactionalSimulation`]. A JSON document
//! matching these types (all fields optional):
//!
//! ```json
//! {
//!   "emitters":  { "count": 5, "velocity_spread": 5.0 },
//!   "absorbers": { "count": 5, "velocity_spread": 5.0 },
//!   "bounds": { "width": 800.0, "height": 600.0 },
//!   "policy": "probabilistic",
//!   "selection_interval": 60,
//!   "particle_lifespan": 180,
//!   "log_display_len": 25,
//!   "nominal_tick_rate_hz": 60.0,
//!   "speed_multiplier": 1.0,
//!   "seed": 42
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::kinematics::Bounds;
use crate::selection::SelectionPolicy;

pub const DEFAULT_BODY_COUNT: usize = 5;
pub const DEFAULT_VELOCITY_SPREAD: f64 = 5.0;
pub const DEFAULT_SELECTION_INTERVAL: u64 = 60;
pub const DEFAULT_PARTICLE_LIFESPAN: u32 = 180;
pub const DEFAULT_LOG_DISPLAY_LEN: usize = 25;
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

// ---------------------------------------------------------------------------
// RoleConfig
// ---------------------------------------------------------------------------

/// Population and initial speed for one body role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoleConfig {
    pub count: usize,
    /// Each velocity component is drawn from `[-spread/2, spread/2)`.
    pub velocity_spread: f64,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_BODY_COUNT,
            velocity_spread: DEFAULT_VELOCITY_SPREAD,
        }
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub emitters: RoleConfig,
    pub absorbers: RoleConfig,
    pub bounds: Bounds,
    pub policy: SelectionPolicy,
    /// Selection runs on ticks where `tick % selection_interval == 0`.
    pub selection_interval: u64,
    pub particle_lifespan: u32,
    /// How many of the newest log entries the renderer is shown.
    pub log_display_len: usize,
    pub nominal_tick_rate_hz: f64,
    pub speed_multiplier: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            emitters: RoleConfig::default(),
            absorbers: RoleConfig::default(),
            bounds: Bounds::default(),
            policy: SelectionPolicy::default(),
            selection_interval: DEFAULT_SELECTION_INTERVAL,
            particle_lifespan: DEFAULT_PARTICLE_LIFESPAN,
            log_display_len: DEFAULT_LOG_DISPLAY_LEN,
            nominal_tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            speed_multiplier: 1.0,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every field. Body counts are only checked here when the bodies
    /// are generated from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emitters.count == 0 {
            return Err(ConfigError::NoEmitters);
        }
        if self.absorbers.count == 0 {
            return Err(ConfigError::NoAbsorbers);
        }
        self.validate_runtime()
    }

    /// Validation of everything except body counts.
    pub(crate) fn validate_runtime(&self) -> Result<(), ConfigError> {
        if !is_positive(self.speed_multiplier) {
            return Err(ConfigError::InvalidSpeedMultiplier(self.speed_multiplier));
        }
        if !is_positive(self.nominal_tick_rate_hz) {
            return Err(ConfigError::InvalidTickRate(self.nominal_tick_rate_hz));
        }
        if Duration::try_from_secs_f64(1.0 / self.tick_rate_hz()).is_err() {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz()));
        }
        if self.selection_interval == 0 {
            return Err(ConfigError::ZeroSelectionInterval);
        }
        if self.particle_lifespan == 0 {
            return Err(ConfigError::ZeroParticleLifespan);
        }
        if !is_positive(self.bounds.width) || !is_positive(self.bounds.height) {
            return Err(ConfigError::InvalidBounds {
                width: self.bounds.width,
                height: self.bounds.height,
            });
        }
        check_spread("emitter", self.emitters.velocity_spread)?;
        check_spread("absorber", self.absorbers.velocity_spread)?;
        Ok(())
    }

    /// Ticks per second the renderer should drive, after the speed multiplier.
    pub fn tick_rate_hz(&self) -> f64 {
        self.nominal_tick_rate_hz * self.speed_multiplier
    }

    /// Wall-clock time between two ticks at the effective rate. Saturates at
    /// `Duration::MAX` for rates `validate` would reject.
    pub fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.tick_rate_hz()).unwrap_or(Duration::MAX)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn check_spread(role: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVelocitySpread { role, value })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.emitters.count, 5);
        assert_eq!(config.absorbers.count, 5);
        assert_eq!(config.selection_interval, 60);
        assert_eq!(config.policy, SelectionPolicy::Deterministic);
    }

    #[test]
    fn test_empty_roles_rejected() {
        let mut config = SimConfig::default();
        config.emitters.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoEmitters)));

        let mut config = SimConfig::default();
        config.absorbers.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoAbsorbers)));
    }

    #[test]
    fn test_speed_multiplier_must_be_positive() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SimConfig { speed_multiplier: bad, ..SimConfig::default() };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidSpeedMultiplier(_))),
                "accepted speed multiplier {}",
                bad
            );
        }
    }

    #[test]
    fn test_tick_rate_must_be_positive() {
        let config = SimConfig { nominal_tick_rate_hz: 0.0, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTickRate(_))));
    }

    #[test]
    fn test_rate_product_outside_duration_range_rejected() {
        // Each factor is positive but the product overflows or underflows the interval
        for (nominal, multiplier) in [(1e-10, 1e-10), (1e-200, 1e-200)] {
            let config = SimConfig {
                nominal_tick_rate_hz: nominal,
                speed_multiplier: multiplier,
                ..SimConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidTickRate(_))),
                "accepted rate {} x {}",
                nominal,
                multiplier
            );
            assert_eq!(config.frame_interval(), Duration::MAX);
        }
    }

    #[test]
    fn test_zero_interval_and_lifespan_rejected() {
        let config = SimConfig { selection_interval: 0, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSelectionInterval)));

        let config = SimConfig { particle_lifespan: 0, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroParticleLifespan)));
    }

    #[test]
    fn test_bad_bounds_and_spread_rejected() {
        let config = SimConfig {
            bounds: Bounds { width: 800.0, height: -1.0 },
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBounds { .. })));

        let mut config = SimConfig::default();
        config.absorbers.velocity_spread = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidVelocitySpread { role: "absorber", .. })
        ));
    }

    #[test]
    fn test_effective_tick_rate() {
        let config = SimConfig { speed_multiplier: 2.0, ..SimConfig::default() };
        assert!((config.tick_rate_hz() - 120.0).abs() < f64::EPSILON);
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 120.0));
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SimConfig::from_json(
            r#"{ "policy": "probabilistic", "emitters": { "count": 3 }, "seed": 9 }"#,
        )
        .unwrap();
        assert_eq!(config.policy, SelectionPolicy::Probabilistic);
        assert_eq!(config.emitters.count, 3);
        assert_eq!(config.emitters.velocity_spread, DEFAULT_VELOCITY_SPREAD);
        assert_eq!(config.absorbers.count, DEFAULT_BODY_COUNT);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_from_json_rejects_malformed_and_invalid() {
        assert!(matches!(SimConfig::from_json("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            SimConfig::from_json(r#"{ "speed_multiplier": -2.0 }"#),
            Err(ConfigError::InvalidSpeedMultiplier(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SimConfig::default()
            .with_policy(SelectionPolicy::Probabilistic)
            .with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
