//! Potential generators and their registry
//!
//! A potential generator contributes a scalar potential to a particle's
//! accumulator and, separately, the force that is the negative gradient of
//! that potential. The scalar argument `s` is whatever quantity the
//! potential depends on, usually an inter-particle separation; `ds` is a
//! small increment for implementations that differentiate numerically

use tracing::{info, trace};

use super::math::{normalize_or_zero, Real, EPSILON};
use super::states::{ParticleHandle, ParticleSet};

pub trait PotentialGenerator {
    fn update_potential(&self, set: &mut ParticleSet, target: ParticleHandle, s: Real);
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, s: Real, ds: Real);
}

/// Index of a generator owned by a [`PotentialRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PotentialHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PotentialRegistration {
    particle: ParticleHandle,
    generator: PotentialHandle,
}

/// Binds particles to potential generators
///
/// The registry integrates its particles on request but never computes
/// pairwise forces itself; the caller drives `update_force` for whatever
/// pairings the scenario needs before integrating
#[derive(Default)]
pub struct PotentialRegistry {
    generators: Vec<Box<dyn PotentialGenerator + Send + Sync>>,
    registrations: Vec<PotentialRegistration>,
}

impl PotentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_generator<T>(&mut self, generator: T) -> PotentialHandle
    where
        T: PotentialGenerator + Send + Sync + 'static,
    {
        let handle = PotentialHandle(self.generators.len());
        self.generators.push(Box::new(generator));
        handle
    }

    /// Register the generator to apply to the particle; duplicates of the
    /// same pair are silently discarded
    pub fn register(&mut self, particle: ParticleHandle, generator: PotentialHandle) {
        let registration = PotentialRegistration { particle, generator };
        if self.registrations.contains(&registration) {
            info!(particle = particle.index(), "pair already in potential registry, discarding");
            return;
        }
        info!(particle = particle.index(), "registered pair in potential registry");
        self.registrations.push(registration);
    }

    pub fn unregister(&mut self, particle: ParticleHandle, generator: PotentialHandle) {
        let registration = PotentialRegistration { particle, generator };
        if let Some(i) = self.registrations.iter().position(|r| *r == registration) {
            self.registrations.remove(i);
            info!(particle = particle.index(), "removed pair from potential registry");
        }
    }

    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Evaluate every registered potential at scalar parameter `s`
    pub fn update_potentials(&self, set: &mut ParticleSet, s: Real) {
        for r in &self.registrations {
            self.generators[r.generator.0].update_potential(set, r.particle, s);
        }
    }

    /// Integrate each distinct registered particle once
    pub fn integrate_all(&self, set: &mut ParticleSet, dt: Real) {
        let mut seen: Vec<ParticleHandle> = Vec::with_capacity(self.registrations.len());
        for r in &self.registrations {
            if !seen.contains(&r.particle) {
                seen.push(r.particle);
                set.get_mut(r.particle).integrate(dt);
            }
        }
    }
}

/// Lennard-Jones 12-6 potential
///
/// U(r) = 4 eps ((sigma/r)^12 - (sigma/r)^6)
pub struct LennardJones {
    pub sigma: Real,   // separation of null potential
    pub epsilon: Real, // depth of the well
}

impl PotentialGenerator for LennardJones {
    fn update_potential(&self, set: &mut ParticleSet, target: ParticleHandle, s: Real) {
        if s < EPSILON {
            return;
        }
        let sr6 = (self.sigma / s).powi(6);
        let potential = 4.0 * self.epsilon * (sr6 * sr6 - sr6);
        set.get_mut(target).add_potential(potential);
    }

    // F = -dU/dr along the separation direction. The analytic form
    // dU/dr = 24 eps (sigma^6 / r^7)(1 - 2 (sigma/r)^6) stays stable near
    // r = sigma, where one-sided differences of U do not
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, s: Real, _ds: Real) {
        if s < EPSILON {
            return;
        }

        let particle = set.get_mut(target);

        let sr6 = (self.sigma / s).powi(6);
        let du_dr = 24.0 * self.epsilon / s * (sr6 - 2.0 * sr6 * sr6);

        // Separation is measured from the potential origin
        let direction = normalize_or_zero(&particle.pos);
        let force = direction * -du_dr;
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied Lennard-Jones force");
    }
}
