//! Particle links and scenery contacts
//!
//! Links connect two particles and generate a contact when the pair
//! violates the link's constraint: cables cap the separation, rods hold
//! it fixed. `GroundContacts` is the scenery case, emitting a contact for
//! every tracked particle that has fallen below the ground plane

use super::contacts::{ContactGenerator, ParticleContact};
use super::math::{normalize_or_zero, Real, Vec3, EPSILON};
use super::states::{ParticleHandle, ParticleSet};

/// A two-particle link that constrains separation
///
/// A link can only ever produce a single contact per step, so `limit` is
/// assumed to be at least 1 by the time a link is asked
pub trait ParticleLink: ContactGenerator {
    /// The pair of particles connected by this link
    fn endpoints(&self) -> [ParticleHandle; 2];

    /// Current separation of the two endpoints
    fn current_length(&self, set: &ParticleSet) -> Real {
        let [a, b] = self.endpoints();
        (set.get(a).pos - set.get(b).pos).norm()
    }
}

/// Cable: holds two particles within a maximum separation
pub struct ParticleCable {
    pub particles: [ParticleHandle; 2],
    pub max_length: Real,  // separation at which the cable goes taut
    pub restitution: Real, // bounciness of the cable
}

impl ParticleLink for ParticleCable {
    fn endpoints(&self) -> [ParticleHandle; 2] {
        self.particles
    }
}

impl ContactGenerator for ParticleCable {
    fn add_contacts(&self, set: &ParticleSet, contacts: &mut Vec<ParticleContact>, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }

        let length = self.current_length(set);

        // Slack cable: no contact
        if length < self.max_length {
            return 0;
        }

        // Normal pulls the pair back together, from particle 0 toward 1
        let normal =
            normalize_or_zero(&(set.get(self.particles[1]).pos - set.get(self.particles[0]).pos));

        contacts.push(ParticleContact::new(
            self.particles[0],
            Some(self.particles[1]),
            normal,
            length - self.max_length,
            self.restitution,
        ));
        1
    }
}

/// Rod: holds two particles at an exact separation
pub struct ParticleRod {
    pub particles: [ParticleHandle; 2],
    pub length: Real, // fixed separation the rod maintains
}

impl ParticleLink for ParticleRod {
    fn endpoints(&self) -> [ParticleHandle; 2] {
        self.particles
    }
}

impl ContactGenerator for ParticleRod {
    fn add_contacts(&self, set: &ParticleSet, contacts: &mut Vec<ParticleContact>, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }

        let current_len = self.current_length(set);

        // At the rod length within tolerance: no contact. An exact float
        // equality gate would essentially never fire, leaving the rod
        // generating a correcting contact every single step
        if (current_len - self.length).abs() < EPSILON {
            return 0;
        }

        let normal =
            normalize_or_zero(&(set.get(self.particles[1]).pos - set.get(self.particles[0]).pos));

        // Normal direction depends on extending vs compressing
        let (contact_normal, penetration) = if current_len > self.length {
            (normal, current_len - self.length)
        } else {
            (-normal, self.length - current_len)
        };

        // Rods never rebound
        contacts.push(ParticleContact::new(
            self.particles[0],
            Some(self.particles[1]),
            contact_normal,
            penetration,
            0.0,
        ));
        1
    }
}

/// Scenery contacts for the ground plane at y = 0
pub struct GroundContacts {
    pub particles: Vec<ParticleHandle>, // particles checked against the plane
    pub restitution: Real,
}

impl GroundContacts {
    pub fn new(particles: Vec<ParticleHandle>) -> Self {
        Self {
            particles,
            restitution: 0.2,
        }
    }

    pub fn with_restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }
}

impl ContactGenerator for GroundContacts {
    fn add_contacts(&self, set: &ParticleSet, contacts: &mut Vec<ParticleContact>, limit: usize) -> usize {
        let mut count = 0;
        for &p in &self.particles {
            if count == limit {
                return count;
            }

            let y = set.get(p).pos.y;
            if y < 0.0 {
                contacts.push(ParticleContact::new(
                    p,
                    None,
                    Vec3::new(0.0, 1.0, 0.0),
                    -y,
                    self.restitution,
                ));
                count += 1;
            }
        }
        count
    }
}
