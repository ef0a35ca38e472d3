//! Force generators and their registries
//!
//! Each generator implements [`ForceGenerator`] and contributes into a
//! target particle's force accumulator; generators never touch position,
//! velocity, or the other accumulators. `ForceRegistry` binds particles to
//! generators pairwise; `UniversalForceRegistry` holds bare particles for
//! forces that act on every pair in the set (self-gravity)

use tracing::{info, trace};

use super::math::{normalize_or_zero, Real, Vec3, BIG_G, EPSILON};
use super::states::{ParticleHandle, ParticleSet};

/// Polymorphic producer of forces
///
/// `update_force` reads particle state through the arena and calls
/// `add_force` on the target zero or more times. The only state a
/// generator may mutate is the target's force accumulator
pub trait ForceGenerator {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, dt: Real);
}

/// Index of a generator owned by a [`ForceRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorHandle(usize);

// One (particle, generator) binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ForceRegistration {
    particle: ParticleHandle,
    generator: GeneratorHandle,
}

/// Binds particles to force generators, one pair per registration
///
/// The registry owns the boxed generators in a slab; registrations are
/// identity pairs of handles, deduplicated on insert
#[derive(Default)]
pub struct ForceRegistry {
    generators: Vec<Box<dyn ForceGenerator + Send + Sync>>,
    registrations: Vec<ForceRegistration>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a generator and hand back its handle
    pub fn add_generator<T>(&mut self, generator: T) -> GeneratorHandle
    where
        T: ForceGenerator + Send + Sync + 'static,
    {
        let handle = GeneratorHandle(self.generators.len());
        self.generators.push(Box::new(generator));
        handle
    }

    /// Register the generator to apply to the particle. A pair already in
    /// the registry is silently discarded
    pub fn register(&mut self, particle: ParticleHandle, generator: GeneratorHandle) {
        let registration = ForceRegistration { particle, generator };
        if self.registrations.contains(&registration) {
            info!(particle = particle.0, "pair already in force registry, discarding");
            return;
        }
        info!(particle = particle.0, generator = generator.0, "registered pair in force registry");
        self.registrations.push(registration);
    }

    pub fn unregister(&mut self, particle: ParticleHandle, generator: GeneratorHandle) {
        let registration = ForceRegistration { particle, generator };
        if let Some(i) = self.registrations.iter().position(|r| *r == registration) {
            self.registrations.remove(i);
            info!(particle = particle.0, generator = generator.0, "removed pair from force registry");
        }
    }

    /// Drop every registration that mentions the particle
    pub fn remove_particle(&mut self, particle: ParticleHandle) {
        self.registrations.retain(|r| r.particle != particle);
    }

    /// Clear all registrations (the generator slab stays)
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Have every registered generator contribute to its particle
    pub fn update_forces(&self, set: &mut ParticleSet, dt: Real) {
        for r in &self.registrations {
            self.generators[r.generator.0].update_force(set, r.particle, dt);
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

/// Holds bare particles for forces that apply to every pair in the set
/// (Newtonian self-gravity)
#[derive(Debug, Default)]
pub struct UniversalForceRegistry {
    registrations: Vec<ParticleHandle>,
}

impl UniversalForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle; a second registration of the same particle is
    /// silently discarded
    pub fn add(&mut self, set: &ParticleSet, particle: ParticleHandle) {
        if self.registrations.contains(&particle) {
            info!(particle = set.get(particle).label(), "already in universal registry, discarding");
            return;
        }
        info!(particle = set.get(particle).label(), "added particle to universal registry");
        self.registrations.push(particle);
    }

    pub fn add_many(&mut self, set: &ParticleSet, particles: &[ParticleHandle]) {
        for &p in particles {
            self.add(set, p);
        }
    }

    pub fn remove(&mut self, set: &ParticleSet, particle: ParticleHandle) {
        if let Some(i) = self.registrations.iter().position(|&p| p == particle) {
            self.registrations.remove(i);
            info!(particle = set.get(particle).label(), "removed particle from universal registry");
        }
    }

    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Accumulate pairwise Newtonian gravity over every ordered pair
    ///
    /// For each (i, j) with i != j, particle i receives
    /// -G m_i m_j / |r|^2 along the unit separation, r = x_i - x_j.
    /// The squared magnitude is taken before normalising the separation.
    /// Pairs with a non-finite mass or near-zero separation are skipped
    pub fn apply_gravity(&self, set: &mut ParticleSet) {
        for &pi in &self.registrations {
            for &pj in &self.registrations {
                if pi == pj {
                    continue;
                }

                let (r, m_i, m_j, finite) = {
                    let a = set.get(pi);
                    let b = set.get(pj);
                    (
                        a.pos - b.pos,
                        a.mass(),
                        b.mass(),
                        a.has_finite_mass() && b.has_finite_mass(),
                    )
                };
                if !finite {
                    continue;
                }

                let r_mag_squared = r.norm_squared();
                if r_mag_squared < EPSILON {
                    continue;
                }
                let direction = normalize_or_zero(&r);

                let force = direction * (-BIG_G * m_i * m_j / r_mag_squared);
                set.get_mut(pi).add_force(force);

                trace!(
                    on = set.get(pi).label(),
                    from = set.get(pj).label(),
                    force = ?force,
                    "applied gravitational force"
                );
            }
        }
    }

    /// Integrate every registered particle
    pub fn integrate_all(&self, set: &mut ParticleSet, dt: Real) {
        for &p in &self.registrations {
            set.get_mut(p).integrate(dt);
        }
    }
}

// =========================================================================
// Built-in force generators
// =========================================================================

/// Uniform gravitational field; one instance can serve many particles
pub struct EarthGravity {
    pub gravity: Vec3, // field acceleration, typically (0, -9.81, 0)
}

impl ForceGenerator for EarthGravity {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let particle = set.get_mut(target);

        // Immovable particles take no gravity
        if !particle.has_finite_mass() {
            return;
        }

        let force = self.gravity * particle.mass();
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied uniform gravity");
    }
}

/// Inverse-square gravity toward a fixed point source
pub struct PointGravity {
    pub origin: Vec3, // location of the source mass
    pub mass: Real,   // source mass [kg]
}

impl ForceGenerator for PointGravity {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let particle = set.get_mut(target);

        if !particle.has_finite_mass() {
            return;
        }

        let separation = particle.pos - self.origin;
        let distance_squared = separation.norm_squared();
        // Particle sitting on the source: nothing sensible to apply
        if distance_squared < EPSILON {
            return;
        }
        let direction = normalize_or_zero(&separation);

        let magnitude = -BIG_G * particle.mass() * self.mass / distance_squared;
        let force = direction * magnitude;
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied point gravity");
    }
}

/// Velocity drag with linear and quadratic coefficients
pub struct Drag {
    pub k1: Real, // linear drag coefficient
    pub k2: Real, // quadratic drag coefficient
}

impl ForceGenerator for Drag {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let particle = set.get_mut(target);

        let speed = particle.vel.norm();
        if speed < EPSILON {
            return;
        }

        // -(k1 |v| + k2 |v|^2) along the direction of motion
        let drag_coeff = self.k1 * speed + self.k2 * speed * speed;
        let force = normalize_or_zero(&particle.vel) * -drag_coeff;
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied drag");
    }
}

/// Unit upward force inside a disc of the x-z plane
pub struct Uplift {
    pub origin: Vec3, // centre of the updraft column
    pub radius: Real, // horizontal reach of the column
}

impl ForceGenerator for Uplift {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let particle = set.get_mut(target);

        // Horizontal distance only; height does not matter
        let dx = particle.pos.x - self.origin.x;
        let dz = particle.pos.z - self.origin.z;
        if dx * dx + dz * dz < self.radius * self.radius {
            let force = Vec3::new(0.0, 1.0, 0.0);
            particle.add_force(force);

            trace!(particle = particle.label(), "applied uplift");
        }
    }
}

/// Spring coupling the target to another particle
///
/// Uses the absolute stretch magnitude, so the pull is toward the other
/// end whether extended or compressed. The generator acts on the target
/// only; register a second instance the other way around for a symmetric
/// pair
pub struct Spring {
    pub other: ParticleHandle, // far end of the spring
    pub spring_constant: Real, // stiffness k [N/m]
    pub rest_length: Real,     // natural length [m]
}

impl Spring {
    /// Critical damping 2 sqrt(m k) for a caller-chosen mass
    pub fn calc_crit_damping(&self, mass: Real) -> Real {
        2.0 * (mass * self.spring_constant).sqrt()
    }
}

impl ForceGenerator for Spring {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let other_pos = set.get(self.other).pos;
        let particle = set.get_mut(target);

        let d = particle.pos - other_pos;
        let magnitude = (d.norm() - self.rest_length).abs() * self.spring_constant;

        let force = normalize_or_zero(&d) * -magnitude;
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied spring force");
    }
}

/// Spring anchored to a fixed point, with an elastic limit
pub struct AnchoredSpring {
    pub anchor: Vec3,          // fixed end of the spring
    pub spring_constant: Real, // stiffness k [N/m]
    pub rest_length: Real,     // natural length [m]
    pub elastic_limit: Real,   // stretch at which the spring starts to give
}

impl ForceGenerator for AnchoredSpring {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let particle = set.get_mut(target);

        let d = particle.pos - self.anchor;
        let stretched_length = d.norm();

        let magnitude = (stretched_length - self.rest_length).abs() * self.spring_constant;
        let mut force = normalize_or_zero(&d) * -magnitude;

        // Past the elastic limit the spring only delivers a quarter of the
        // computed force
        if stretched_length >= self.elastic_limit {
            force *= 0.25;
        }

        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied anchored spring force");
    }
}

/// One-sided spring: only pulls once extended past the rest length
pub struct Bungee {
    pub other: ParticleHandle, // far end of the bungee
    pub spring_constant: Real, // stiffness k [N/m]
    pub rest_length: Real,     // slack length [m]
}

impl ForceGenerator for Bungee {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, _dt: Real) {
        let other_pos = set.get(self.other).pos;
        let particle = set.get_mut(target);

        let d = particle.pos - other_pos;

        // Slack bungee applies nothing
        let length = d.norm();
        if length <= self.rest_length {
            return;
        }

        let magnitude = self.spring_constant * (length - self.rest_length);
        let force = normalize_or_zero(&d) * -magnitude;
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied bungee force");
    }
}

/// Stiff spring replacement driven by the analytic underdamped solution
///
/// Instead of stepping a stiff spring numerically, compute where the
/// damped oscillator would be at the end of the step and apply the force
/// that gets the particle there
pub struct FakeSpring {
    pub anchor: Vec3,          // fixed end of the spring
    pub spring_constant: Real, // stiffness k
    pub damping: Real,         // oscillation damping d
}

impl ForceGenerator for FakeSpring {
    fn update_force(&self, set: &mut ParticleSet, target: ParticleHandle, dt: Real) {
        let particle = set.get_mut(target);

        if !particle.has_finite_mass() {
            return;
        }

        let pos = particle.pos - self.anchor;
        let vel = particle.vel;

        // gamma = 0.5 sqrt(4k - d^2); overdamped or critically damped
        // configurations fall outside this solution, so bail out
        let discriminant = 4.0 * self.spring_constant - self.damping * self.damping;
        if discriminant <= 0.0 {
            return;
        }
        let gamma = 0.5 * discriminant.sqrt();

        let c = pos * (self.damping / (2.0 * gamma)) + vel * (1.0 / gamma);

        // Target position from the analytic solution
        let mut target_pos = pos * (gamma * dt).cos() + c * (gamma * dt).sin();
        target_pos *= (-0.5 * self.damping * dt).exp();

        // Back out the acceleration, and from it the force, that produces
        // the target position over this step
        let acc = (target_pos - pos) * (1.0 / (dt * dt)) - vel * dt;
        let force = acc * particle.mass();
        particle.add_force(force);

        trace!(particle = particle.label(), force = ?force, "applied fake spring force");
    }
}
