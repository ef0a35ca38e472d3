//! Core state types for the particle engine
//!
//! Defines the `Particle` state entity (position, velocity, acceleration,
//! damping, inverse mass, force/potential accumulators) and the
//! `ParticleSet` arena that owns particle storage. Registries and contact
//! generators refer to particles through copyable `ParticleHandle` indices,
//! so a registration can never outlive the storage it points at

use tracing::{info, trace};

use super::integrator::verlet_step;
use super::math::{Real, Vec3, EPSILON};

/// Index of a particle inside a [`ParticleSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle(pub(crate) usize);

impl ParticleHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A point mass
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec3, // position [m]
    pub vel: Vec3, // velocity [m/s]
    pub acc: Vec3, // acceleration [m/s^2], rebuilt from net force each step
    pub damping: Real, // linear damping in [0, 1]; 1 = no damping

    // Inverse mass rather than mass: integration and impulse resolution
    // both divide by mass, so 1/m = 0 gives immovable objects as a clean,
    // NaN-free limit while zero mass stays unrepresentable
    inverse_mass: Real,

    // Accumulators, cleared on every successful integrate()
    net_force: Vec3,
    net_potential: Real,

    name: Option<String>, // display label for logs
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec3::zeros(),
            vel: Vec3::zeros(),
            acc: Vec3::zeros(),
            damping: 1.0,
            inverse_mass: 1.0,
            net_force: Vec3::zeros(),
            net_potential: 0.0,
            name: None,
        }
    }
}

impl Particle {
    pub fn new(pos: Vec3, vel: Vec3, acc: Vec3, damping: Real, inverse_mass: Real) -> Self {
        assert!(inverse_mass >= 0.0, "inverse mass must be non-negative");
        Self {
            pos,
            vel,
            acc,
            damping,
            inverse_mass,
            net_force: Vec3::zeros(),
            net_potential: 0.0,
            name: None,
        }
    }

    /// Attach a display name (used only in log records)
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for log records; empty string when unnamed
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Advance this particle by one step of duration `dt`
    ///
    /// Folds the accumulated net force into the acceleration, performs one
    /// velocity-Verlet step, applies the damping term, and clears the
    /// accumulators. Immovable particles return untouched
    pub fn integrate(&mut self, dt: Real) {
        assert!(dt > 0.0, "integrate requires a positive step");

        // Infinite or reserved-negative inverse mass: don't integrate
        if self.inverse_mass <= 0.0 {
            return;
        }

        self.acc += self.net_force * self.inverse_mass;

        verlet_step(&mut self.pos, &mut self.vel, self.acc, dt);

        // Per-step linear damping; damping = 1 leaves the velocity alone
        self.vel *= self.damping.powf(dt);

        self.clear_net_force();
        self.clear_net_potential();
        self.acc = Vec3::zeros();

        trace!(particle = self.label(), pos = ?self.pos, "integrated particle, accumulators cleared");
    }

    pub fn add_force(&mut self, f: Vec3) {
        self.net_force += f;
    }

    pub fn add_potential(&mut self, potential: Real) {
        self.net_potential += potential;
    }

    pub fn clear_net_force(&mut self) {
        self.net_force = Vec3::zeros();
    }

    pub fn clear_net_potential(&mut self) {
        self.net_potential = 0.0;
    }

    pub fn net_force(&self) -> Vec3 {
        self.net_force
    }

    pub fn net_potential(&self) -> Real {
        self.net_potential
    }

    /// Set the mass. Zero mass is unrepresentable and a programmer error
    pub fn set_mass(&mut self, mass: Real) {
        assert!(mass != 0.0, "zero mass is not representable");
        self.inverse_mass = 1.0 / mass;
    }

    pub fn set_inverse_mass(&mut self, inverse_mass: Real) {
        assert!(inverse_mass >= 0.0, "inverse mass must be non-negative");
        self.inverse_mass = inverse_mass;
    }

    /// Mass of the particle; the maximum representable real for immovables
    pub fn mass(&self) -> Real {
        if self.inverse_mass == 0.0 {
            Real::MAX
        } else {
            1.0 / self.inverse_mass
        }
    }

    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    pub fn kinetic_energy(&self) -> Real {
        0.5 * self.mass() * self.vel.norm_squared()
    }
}

// Tolerant comparison for test assertions: same kinematic vectors within
// EPSILON, same damping and inverse mass within EPSILON. Registries compare
// handles, never values
impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        (self.pos - other.pos).norm() < EPSILON
            && (self.vel - other.vel).norm() < EPSILON
            && (self.acc - other.acc).norm() < EPSILON
            && (self.damping - other.damping).abs() < EPSILON
            && (self.inverse_mass - other.inverse_mass).abs() < EPSILON
    }
}

/// Arena owning particle storage
///
/// Handles are append-only indices: `add` is the only way to mint one, and
/// nothing ever invalidates it, so `get`/`get_mut` can index directly
#[derive(Debug, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, particle: Particle) -> ParticleHandle {
        let handle = ParticleHandle(self.particles.len());
        info!(particle = particle.label(), index = handle.0, "added particle to set");
        self.particles.push(particle);
        handle
    }

    pub fn get(&self, handle: ParticleHandle) -> &Particle {
        &self.particles[handle.0]
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> &mut Particle {
        &mut self.particles[handle.0]
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = ParticleHandle> {
        (0..self.particles.len()).map(ParticleHandle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }
}
