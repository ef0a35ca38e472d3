use std::time::Instant;

use crate::simulation::forces::{EarthGravity, UniversalForceRegistry};
use crate::simulation::links::GroundContacts;
use crate::simulation::math::{Real, Vec3};
use crate::simulation::states::{Particle, ParticleHandle, ParticleSet};
use crate::simulation::world::ParticleWorld;

/// Helper to build a set of `n` particles on a deterministic spiral
fn make_set(n: usize) -> (ParticleSet, Vec<ParticleHandle>) {
    let mut set = ParticleSet::new();
    let mut handles = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as Real;
        // deterministic positions, no rand needed
        let pos = Vec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0 + 6.0,
            (i_f * 0.07).sin() * 5.0,
        );

        let particle = Particle::new(pos, Vec3::zeros(), Vec3::zeros(), 1.0, 1.0);
        handles.push(set.add(particle));
    }

    (set, handles)
}

/// Time one `apply_gravity` sweep of the universal registry over a range
/// of population sizes. Output is CSV: paste straight into a spreadsheet
pub fn bench_self_gravity() {
    let ns = [200, 400, 800, 1600, 3200];

    println!("N,apply_gravity_ms");

    for n in ns {
        let (mut set, handles) = make_set(n);

        let mut registry = UniversalForceRegistry::new();
        registry.add_many(&set, &handles);

        // Warm up
        registry.apply_gravity(&mut set);
        for p in set.iter_mut() {
            p.clear_net_force();
        }

        let t0 = Instant::now();
        registry.apply_gravity(&mut set);
        let elapsed = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6}", n, elapsed);
    }
}

/// Time full `run_physics` steps (uniform gravity + ground contacts) over
/// a range of population sizes
pub fn bench_world_step() {
    let ns = [200, 400, 800, 1600, 3200];
    let steps = 10; // steps per measurement
    let dt: Real = 0.01;

    println!("N,step_ms");

    for n in ns {
        let mut world = ParticleWorld::new(n, 0);

        let mut handles = Vec::with_capacity(n);
        for i in 0..n {
            let i_f = i as Real;
            let pos = Vec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 2.0 + 2.0,
                (i_f * 0.07).sin() * 5.0,
            );
            handles.push(world.add_particle(Particle::new(
                pos,
                Vec3::zeros(),
                Vec3::zeros(),
                1.0,
                1.0,
            )));
        }

        let gravity = world
            .force_registry_mut()
            .add_generator(EarthGravity { gravity: Vec3::new(0.0, -9.81, 0.0) });
        for &h in &handles {
            world.force_registry_mut().register(h, gravity);
        }

        world.add_contact_generator(GroundContacts::new(handles));

        // Warm up
        world.run_physics(dt);

        let t0 = Instant::now();
        for _ in 0..steps {
            world.run_physics(dt);
        }
        let per_step = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, per_step);
    }
}
