// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Transactional Exchange Simulator - Transient Particles

use serde::{Deserialize, Serialize};

use crate::kinematics::Vec2;

/// Short-lived marker left where a transaction was committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub age: u32,
    pub lifespan: u32,
}

impl Particle {
    pub fn new(position: Vec2, lifespan: u32) -> Self {
        Self { position, age: 0, lifespan }
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.lifespan
    }
}

/// The live particle set. Prunes itself by age.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    lifespan: u32,
}

impl ParticleField {
    pub fn new(lifespan: u32) -> Self {
        Self { particles: Vec::new(), lifespan }
    }

    pub fn spawn(&mut self, position: Vec2) {
        self.particles.push(Particle::new(position, self.lifespan));
    }

    /// Age every particle by one tick and drop the expired ones.
    /// Returns how many were dropped.
    pub fn age_and_prune(&mut self) -> usize {
        let before = self.particles.len();
        for p in self.particles.iter_mut() {
            p.age += 1;
        }
        self.particles.retain(|p| !p.is_expired());
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
