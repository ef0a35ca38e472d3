//! World orchestration
//!
//! `ParticleWorld` conducts one physics step: apply the registered force
//! generators, integrate every particle, collect contacts from the contact
//! generators into a fixed-capacity buffer, and hand the buffer to the
//! resolver

use tracing::{debug, info};

use super::contacts::{ContactGenerator, ContactResolver, ParticleContact};
use super::forces::ForceRegistry;
use super::math::Real;
use super::states::{Particle, ParticleHandle, ParticleSet};

/// A population of particles, their force bindings, and contact handling
pub struct ParticleWorld {
    particles: ParticleSet,
    registered: Vec<ParticleHandle>, // integration order = insertion order
    registry: ForceRegistry,
    contact_generators: Vec<Box<dyn ContactGenerator + Send + Sync>>,

    // Contact buffer; capacity is fixed at construction and never grows
    contacts: Vec<ParticleContact>,
    max_contacts: usize,

    resolver: ContactResolver,
    calculate_iterations: bool, // iterations = 2 x used contacts, per step
}

impl ParticleWorld {
    /// Create a world holding at most `max_contacts` contacts per step.
    /// `iterations` caps the resolver; pass 0 to have the world pick
    /// twice the number of generated contacts each step
    pub fn new(max_contacts: usize, iterations: usize) -> Self {
        Self {
            particles: ParticleSet::new(),
            registered: Vec::new(),
            registry: ForceRegistry::new(),
            contact_generators: Vec::new(),
            contacts: Vec::with_capacity(max_contacts),
            max_contacts,
            resolver: ContactResolver::new(iterations),
            calculate_iterations: iterations == 0,
        }
    }

    /// Register a particle; it joins the integration sequence at the end
    pub fn add_particle(&mut self, particle: Particle) -> ParticleHandle {
        let handle = self.particles.add(particle);
        self.registered.push(handle);
        handle
    }

    /// Drop a particle from the integration sequence and purge its force
    /// registrations. The arena keeps the storage, so other handles stay
    /// valid
    pub fn remove_particle(&mut self, handle: ParticleHandle) {
        self.registered.retain(|&h| h != handle);
        self.registry.remove_particle(handle);
        info!(particle = self.particles.get(handle).label(), "removed particle from world");
    }

    pub fn add_contact_generator<T>(&mut self, generator: T)
    where
        T: ContactGenerator + Send + Sync + 'static,
    {
        self.contact_generators.push(Box::new(generator));
        info!("added contact generator to world");
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn particle(&self, handle: ParticleHandle) -> &Particle {
        self.particles.get(handle)
    }

    pub fn particle_mut(&mut self, handle: ParticleHandle) -> &mut Particle {
        self.particles.get_mut(handle)
    }

    /// Handles of the registered particles, in integration order
    pub fn registered(&self) -> &[ParticleHandle] {
        &self.registered
    }

    pub fn force_registry(&self) -> &ForceRegistry {
        &self.registry
    }

    pub fn force_registry_mut(&mut self) -> &mut ForceRegistry {
        &mut self.registry
    }

    /// Clear the accumulators of every registered particle, for callers
    /// that drive force updates and integration out-of-band
    pub fn start_frame(&mut self) {
        for &h in &self.registered {
            let p = self.particles.get_mut(h);
            p.clear_net_force();
            p.clear_net_potential();
        }
    }

    /// Ask every contact generator to fill the buffer, shrinking the
    /// window as it goes. Contacts past the buffer capacity are dropped
    /// for this step; growing the buffer mid-frame is worse than losing
    /// them
    pub fn generate_contacts(&mut self) -> usize {
        self.contacts.clear();

        for generator in &self.contact_generators {
            let remaining = self.max_contacts - self.contacts.len();
            if remaining == 0 {
                break;
            }
            generator.add_contacts(&self.particles, &mut self.contacts, remaining);
        }

        self.contacts.len()
    }

    /// Integrate every registered particle by `dt`
    pub fn integrate(&mut self, dt: Real) {
        for &h in &self.registered {
            self.particles.get_mut(h).integrate(dt);
        }
    }

    /// Advance the world by one step. Returns the number of contacts
    /// used; a return equal to `max_contacts` means the buffer filled and
    /// some contacts may have been dropped
    pub fn run_physics(&mut self, dt: Real) -> usize {
        // Apply the force generators
        self.registry.update_forces(&mut self.particles, dt);

        // Integrate the particles (consumes and clears the accumulators)
        self.integrate(dt);

        // Generate and resolve contacts
        let used = self.generate_contacts();
        if used > 0 {
            if self.calculate_iterations {
                self.resolver.set_iterations(used * 2);
            }
            self.resolver
                .resolve_contacts(&mut self.particles, &mut self.contacts[..used], dt);
            debug!(contacts = used, iterations = self.resolver.iterations_used(), "resolved contacts");
        }

        used
    }
}
