// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Errors

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Rejections raised while validating or parsing a [`crate::config::SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one emitter is required")]
    NoEmitters,
    #[error("at least one absorber is required")]
    NoAbsorbers,
    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeedMultiplier(f64),
    #[error("nominal tick rate must be positive and finite, got {0} Hz")]
    InvalidTickRate(f64),
    #[error("selection interval must be at least one tick")]
    ZeroSelectionInterval,
    #[error("particle lifespan must be at least one tick")]
    ZeroParticleLifespan,
    #[error("bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
    #[error("{role} velocity spread must be non-negative and finite, got {value}")]
    InvalidVelocitySpread { role: &'static str, value: f64 },
    #[error("malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// Errors from building a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("explicit {0} list is empty")]
    EmptyRole(&'static str),
}
