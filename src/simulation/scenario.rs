//! Build fully-initialized scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle:
//! a populated `ParticleWorld`, the universal self-gravity registry, the
//! run parameters, and the name -> handle map used to look particles up
//! afterwards

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::configuration::config::{ForceConfig, LinkConfig, ParticleConfig, ScenarioConfig};
use crate::simulation::forces::{
    AnchoredSpring, Bungee, Drag, EarthGravity, PointGravity, Spring, UniversalForceRegistry, Uplift,
};
use crate::simulation::links::{GroundContacts, ParticleCable, ParticleRod};
use crate::simulation::math::{Real, Vec3};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, ParticleHandle};
use crate::simulation::world::ParticleWorld;

/// A fully-initialized runtime scenario
pub struct Scenario {
    pub parameters: Parameters,
    pub world: ParticleWorld,
    pub universal: UniversalForceRegistry,
    pub names: HashMap<String, ParticleHandle>,
}

fn vec3_from(components: &[f64], what: &str) -> Result<Vec3> {
    if components.len() != 3 {
        return Err(anyhow!("{} needs exactly three components", what));
    }
    Ok(Vec3::new(
        components[0] as Real,
        components[1] as Real,
        components[2] as Real,
    ))
}

fn build_particle(cfg: &ParticleConfig) -> Result<Particle> {
    let pos = vec3_from(&cfg.pos, "particle position")?;
    let vel = vec3_from(&cfg.vel, "particle velocity")?;

    let inverse_mass = if cfg.immovable {
        0.0
    } else {
        match cfg.mass {
            Some(m) if m != 0.0 => 1.0 / (m as Real),
            Some(_) => return Err(anyhow!("particle \"{}\" has zero mass", cfg.name)),
            None => 1.0,
        }
    };

    Ok(Particle::new(pos, vel, Vec3::zeros(), cfg.damping as Real, inverse_mass).named(&cfg.name))
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> Result<Self> {
        let mut world = ParticleWorld::new(cfg.world.max_contacts, cfg.world.iterations);
        let mut names: HashMap<String, ParticleHandle> = HashMap::new();

        // Particles: map each ParticleConfig into the world's arena
        for pc in &cfg.particles {
            let handle = world.add_particle(build_particle(pc)?);
            names.insert(pc.name.clone(), handle);
        }

        let lookup = |name: &str| -> Result<ParticleHandle> {
            names
                .get(name)
                .copied()
                .with_context(|| format!("unknown particle name \"{}\"", name))
        };

        // Pairwise force bindings
        for fc in &cfg.forces {
            match fc {
                ForceConfig::EarthGravity { g, applies_to } => {
                    let gen = world.force_registry_mut().add_generator(EarthGravity {
                        gravity: vec3_from(g, "earth_gravity g")?,
                    });
                    for name in applies_to {
                        let p = lookup(name)?;
                        world.force_registry_mut().register(p, gen);
                    }
                }
                ForceConfig::PointGravity { origin, mass, applies_to } => {
                    let gen = world.force_registry_mut().add_generator(PointGravity {
                        origin: vec3_from(origin, "point_gravity origin")?,
                        mass: *mass as Real,
                    });
                    for name in applies_to {
                        let p = lookup(name)?;
                        world.force_registry_mut().register(p, gen);
                    }
                }
                ForceConfig::Drag { k1, k2, applies_to } => {
                    let gen = world.force_registry_mut().add_generator(Drag {
                        k1: *k1 as Real,
                        k2: *k2 as Real,
                    });
                    for name in applies_to {
                        let p = lookup(name)?;
                        world.force_registry_mut().register(p, gen);
                    }
                }
                ForceConfig::Uplift { origin, radius, applies_to } => {
                    let gen = world.force_registry_mut().add_generator(Uplift {
                        origin: vec3_from(origin, "uplift origin")?,
                        radius: *radius as Real,
                    });
                    for name in applies_to {
                        let p = lookup(name)?;
                        world.force_registry_mut().register(p, gen);
                    }
                }
                ForceConfig::Spring { on, other, spring_constant, rest_length } => {
                    let target = lookup(on)?;
                    let other = lookup(other)?;
                    let gen = world.force_registry_mut().add_generator(Spring {
                        other,
                        spring_constant: *spring_constant as Real,
                        rest_length: *rest_length as Real,
                    });
                    world.force_registry_mut().register(target, gen);
                }
                ForceConfig::AnchoredSpring {
                    anchor,
                    spring_constant,
                    rest_length,
                    elastic_limit,
                    applies_to,
                } => {
                    let gen = world.force_registry_mut().add_generator(AnchoredSpring {
                        anchor: vec3_from(anchor, "anchored_spring anchor")?,
                        spring_constant: *spring_constant as Real,
                        rest_length: *rest_length as Real,
                        elastic_limit: *elastic_limit as Real,
                    });
                    for name in applies_to {
                        let p = lookup(name)?;
                        world.force_registry_mut().register(p, gen);
                    }
                }
                ForceConfig::Bungee { on, other, spring_constant, rest_length } => {
                    let target = lookup(on)?;
                    let other = lookup(other)?;
                    let gen = world.force_registry_mut().add_generator(Bungee {
                        other,
                        spring_constant: *spring_constant as Real,
                        rest_length: *rest_length as Real,
                    });
                    world.force_registry_mut().register(target, gen);
                }
            }
        }

        // Universal self-gravity registry
        let mut universal = UniversalForceRegistry::new();
        for name in &cfg.universal_gravity {
            let p = lookup(name)?;
            universal.add(world.particles(), p);
        }

        // Links
        for lc in &cfg.links {
            match lc {
                LinkConfig::Cable { between, max_length, restitution } => {
                    let cable = ParticleCable {
                        particles: [lookup(&between[0])?, lookup(&between[1])?],
                        max_length: *max_length as Real,
                        restitution: *restitution as Real,
                    };
                    world.add_contact_generator(cable);
                }
                LinkConfig::Rod { between, length } => {
                    let rod = ParticleRod {
                        particles: [lookup(&between[0])?, lookup(&between[1])?],
                        length: *length as Real,
                    };
                    world.add_contact_generator(rod);
                }
            }
        }

        // Ground plane over every particle in the scenario
        if let Some(ground) = &cfg.ground {
            let all: Vec<ParticleHandle> = world.registered().to_vec();
            world.add_contact_generator(
                GroundContacts::new(all).with_restitution(ground.restitution as Real),
            );
        }

        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            t_end: p_cfg.t_end as Real,
            h0: p_cfg.h0 as Real,
            report_every: p_cfg.report_every,
        };

        Ok(Self {
            parameters,
            world,
            universal,
            names,
        })
    }
}
