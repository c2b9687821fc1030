// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Kinematics

use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type Vec2 = Vector2<f64>;

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// Reflection box `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl Bounds {
    pub fn contains_x(&self, x: f64) -> bool {
        (0.0..=self.width).contains(&x)
    }

    pub fn contains_y(&self, y: f64) -> bool {
        (0.0..=self.height).contains(&y)
    }
}

// ─── KinematicBody ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    initial_position: Vec2,
    initial_velocity: Vec2,
}

impl KinematicBody {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            initial_position: position,
            initial_velocity: velocity,
        }
    }

    /// Position uniform inside `bounds`, each velocity component uniform in
    /// `[-spread/2, spread/2)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds, spread: f64) -> Self {
        let position = Vec2::new(
            rng.gen::<f64>() * bounds.width,
            rng.gen::<f64>() * bounds.height,
        );
        let velocity = Vec2::new(
            (rng.gen::<f64>() - 0.5) * spread,
            (rng.gen::<f64>() - 0.5) * spread,
        );
        Self::new(position, velocity)
    }

    pub fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    pub fn initial_velocity(&self) -> Vec2 {
        self.initial_velocity
    }
}

// ─── Movable ─────────────────────────────────────────────────────────────────

/// Motion shared by every body role. Implementors only expose their
/// [`KinematicBody`]; the stepping rules live here once.
pub trait Movable {
    fn body(&self) -> &KinematicBody;
    fn body_mut(&mut self) -> &mut KinematicBody;

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn velocity(&self) -> Vec2 {
        self.body().velocity
    }

    /// Step once. An axis that ends outside `bounds` has its velocity negated;
    /// the position itself is left where it landed.
    fn advance(&mut self, bounds: &Bounds) {
        let body = self.body_mut();
        body.position += body.velocity;
        if !bounds.contains_x(body.position.x) {
            body.velocity.x = -body.velocity.x;
        }
        if !bounds.contains_y(body.position.y) {
            body.velocity.y = -body.velocity.y;
        }
    }

    fn reset(&mut self) {
        let body = self.body_mut();
        body.position = body.initial_position;
        body.velocity = body.initial_velocity;
    }

    fn kinetic_energy(&self) -> f64 {
        0.5 * self.body().velocity.norm_squared()
    }
}

impl Movable for KinematicBody {
    fn body(&self) -> &KinematicBody {
        self
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
