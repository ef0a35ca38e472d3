//! Particle contacts and the iterative contact resolver
//!
//! A contact records two particles in interpenetration or at rest against
//! each other (the second slot is empty for contacts with scenery).
//! Resolving a contact removes the interpenetration and applies an impulse
//! along the normal sized by the restitution coefficient. The resolver
//! processes a whole buffer of contacts, worst-first, for a bounded number
//! of passes

use super::math::{Real, Vec3};
use super::states::{ParticleHandle, ParticleSet};

/// Two bodies in contact
///
/// `normal` is a unit vector in world coordinates pointing from the second
/// particle toward the first; `penetration` is positive while the bodies
/// interpenetrate. `movement` caches the displacement each particle
/// received during the last interpenetration resolution, which the
/// resolver uses to correct the penetration of overlapping contacts
#[derive(Debug, Clone)]
pub struct ParticleContact {
    pub particles: (ParticleHandle, Option<ParticleHandle>),
    pub normal: Vec3,
    pub penetration: Real,
    pub restitution: Real, // in [0, 1]; 0 = inelastic, 1 = elastic
    pub movement: [Vec3; 2],
}

impl ParticleContact {
    pub fn new(
        first: ParticleHandle,
        second: Option<ParticleHandle>,
        normal: Vec3,
        penetration: Real,
        restitution: Real,
    ) -> Self {
        Self {
            particles: (first, second),
            normal,
            penetration,
            restitution,
            movement: [Vec3::zeros(), Vec3::zeros()],
        }
    }

    /// Component of the relative velocity along the contact normal;
    /// negative when the bodies are closing
    pub fn separating_velocity(&self, set: &ParticleSet) -> Real {
        let mut relative_velocity = set.get(self.particles.0).vel;
        if let Some(other) = self.particles.1 {
            relative_velocity -= set.get(other).vel;
        }
        relative_velocity.dot(&self.normal)
    }

    /// Resolve this contact for both velocity and interpenetration
    pub fn resolve(&mut self, set: &mut ParticleSet, dt: Real) {
        self.resolve_velocity(set, dt);
        self.resolve_interpenetration(set);
    }

    // Impulse calculation for the collision
    fn resolve_velocity(&mut self, set: &mut ParticleSet, dt: Real) {
        let separating_velocity = self.separating_velocity(set);

        // Already separating or stationary: no impulse required
        if separating_velocity > 0.0 {
            return;
        }

        let mut new_sep_velocity = -separating_velocity * self.restitution;

        // Closing velocity built up by acceleration over this single step
        // (resting contacts): take it back out of the rebound, clamping at
        // zero so we never remove more than was there
        let mut acc_caused_velocity = set.get(self.particles.0).acc;
        if let Some(other) = self.particles.1 {
            acc_caused_velocity -= set.get(other).acc;
        }
        let acc_caused_sep_velocity = acc_caused_velocity.dot(&self.normal) * dt;
        if acc_caused_sep_velocity < 0.0 {
            new_sep_velocity += self.restitution * acc_caused_sep_velocity;
            if new_sep_velocity < 0.0 {
                new_sep_velocity = 0.0;
            }
        }

        let delta_velocity = new_sep_velocity - separating_velocity;

        // Velocity change is shared in proportion to inverse mass: heavier
        // bodies move less
        let mut total_inverse_mass = set.get(self.particles.0).inverse_mass();
        if let Some(other) = self.particles.1 {
            total_inverse_mass += set.get(other).inverse_mass();
        }

        // Two immovables: impulses have no effect
        if total_inverse_mass <= 0.0 {
            return;
        }

        let impulse = delta_velocity / total_inverse_mass;
        let impulse_per_imass = self.normal * impulse;

        {
            let first = set.get_mut(self.particles.0);
            let im = first.inverse_mass();
            first.vel += impulse_per_imass * im;
        }
        if let Some(other) = self.particles.1 {
            // Second particle goes the opposite way
            let second = set.get_mut(other);
            let im = second.inverse_mass();
            second.vel += impulse_per_imass * -im;
        }
    }

    // Move the particles apart in proportion to inverse mass
    fn resolve_interpenetration(&mut self, set: &mut ParticleSet) {
        if self.penetration <= 0.0 {
            return;
        }

        let mut total_inverse_mass = set.get(self.particles.0).inverse_mass();
        if let Some(other) = self.particles.1 {
            total_inverse_mass += set.get(other).inverse_mass();
        }
        if total_inverse_mass <= 0.0 {
            return;
        }

        let move_per_imass = self.normal * (self.penetration / total_inverse_mass);

        self.movement[0] = move_per_imass * set.get(self.particles.0).inverse_mass();
        if let Some(other) = self.particles.1 {
            self.movement[1] = move_per_imass * -set.get(other).inverse_mass();
        } else {
            self.movement[1] = Vec3::zeros();
        }

        let m0 = self.movement[0];
        set.get_mut(self.particles.0).pos += m0;
        if let Some(other) = self.particles.1 {
            let m1 = self.movement[1];
            set.get_mut(other).pos += m1;
        }
    }
}

/// Polymorphic interface for contact generators
///
/// `add_contacts` appends at most `limit` contacts to the buffer and
/// returns how many it wrote (0 when no contact exists this step)
pub trait ContactGenerator {
    fn add_contacts(&self, set: &ParticleSet, contacts: &mut Vec<ParticleContact>, limit: usize) -> usize;
}

/// Iterative worst-first contact resolver
///
/// Each pass resolves the contact with the most negative separating
/// velocity, then folds the displacements it applied into the penetration
/// of every other contact sharing a particle. Resolving worst-first makes
/// each pass count when the iteration cap is small, as it is in a
/// real-time loop
pub struct ContactResolver {
    iterations: usize,      // number of passes allowed
    iterations_used: usize, // passes actually consumed by the last call
}

impl ContactResolver {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            iterations_used: 0,
        }
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn iterations_used(&self) -> usize {
        self.iterations_used
    }

    /// Resolve a set of contacts for both penetration and velocity
    pub fn resolve_contacts(&mut self, set: &mut ParticleSet, contacts: &mut [ParticleContact], dt: Real) {
        self.iterations_used = 0;

        while self.iterations_used < self.iterations {
            // Find the contact with the largest closing velocity that
            // still needs work
            let mut max = Real::MAX;
            let mut max_index = contacts.len();
            for (i, contact) in contacts.iter().enumerate() {
                let sep_vel = contact.separating_velocity(set);
                if sep_vel < max && (sep_vel < 0.0 || contact.penetration > 0.0) {
                    max = sep_vel;
                    max_index = i;
                }
            }

            // Nothing worth resolving
            if max_index == contacts.len() {
                break;
            }

            contacts[max_index].resolve(set, dt);

            // Propagate the applied movement into every contact sharing a
            // particle with the one just resolved, correcting its
            // penetration estimate without recomputing positions
            let movement = contacts[max_index].movement;
            let resolved = contacts[max_index].particles;
            for contact in contacts.iter_mut() {
                if contact.particles.0 == resolved.0 {
                    contact.penetration -= movement[0].dot(&contact.normal);
                } else if Some(contact.particles.0) == resolved.1 {
                    contact.penetration -= movement[1].dot(&contact.normal);
                }

                if let Some(second) = contact.particles.1 {
                    if second == resolved.0 {
                        contact.penetration += movement[0].dot(&contact.normal);
                    } else if Some(second) == resolved.1 {
                        contact.penetration += movement[1].dot(&contact.normal);
                    }
                }
            }

            self.iterations_used += 1;
        }
    }
}
