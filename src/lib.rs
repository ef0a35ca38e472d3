pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::math::{Real, Vec2, Vec3, VecN, BIG_G, EPSILON, distance, is_zero, normalize_or_zero};
pub use simulation::integrator::{runge_kutta4, verlet_step};
pub use simulation::states::{Particle, ParticleHandle, ParticleSet};
pub use simulation::forces::{
    AnchoredSpring, Bungee, Drag, EarthGravity, FakeSpring, ForceGenerator, ForceRegistry,
    GeneratorHandle, PointGravity, Spring, UniversalForceRegistry, Uplift,
};
pub use simulation::potentials::{LennardJones, PotentialGenerator, PotentialHandle, PotentialRegistry};
pub use simulation::contacts::{ContactGenerator, ContactResolver, ParticleContact};
pub use simulation::links::{GroundContacts, ParticleCable, ParticleLink, ParticleRod};
pub use simulation::world::ParticleWorld;
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::ScenarioConfig;

pub use benchmark::benchmark::{bench_self_gravity, bench_world_step};
