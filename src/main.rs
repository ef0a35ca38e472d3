use mote::{Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "freefall.yaml")]
    file_name: String,

    /// Run the built-in throughput benchmarks instead of a scenario
    #[arg(long, default_value_t = false)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    // Line-oriented log sink; silent unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if args.bench {
        mote::bench_self_gravity();
        mote::bench_world_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build(scenario_cfg)?;

    let params = scenario.parameters.clone();
    let steps = (params.t_end / params.h0).round() as u64;

    for step in 0..steps {
        // Self-gravity is driven outside the world's pairwise registry
        if !scenario.universal.is_empty() {
            scenario.universal.apply_gravity(scenario.world.particles_mut());
        }

        scenario.world.run_physics(params.h0);

        if params.report_every > 0 && step % params.report_every as u64 == 0 {
            let t = step as f64 * params.h0 as f64;
            for &h in scenario.world.registered() {
                let p = scenario.world.particle(h);
                println!(
                    "t={:10.3}  {:12}  pos=<{:+.3e}, {:+.3e}, {:+.3e}>  |v|={:.3e}",
                    t,
                    p.label(),
                    p.pos.x,
                    p.pos.y,
                    p.pos.z,
                    p.vel.norm(),
                );
            }
        }
    }

    // Final state summary
    println!("--- final state after {} steps ---", steps);
    for &h in scenario.world.registered() {
        let p = scenario.world.particle(h);
        println!(
            "{:12}  pos=<{:+.6e}, {:+.6e}, {:+.6e}>  vel=<{:+.6e}, {:+.6e}, {:+.6e}>  KE={:.6e}",
            p.label(),
            p.pos.x,
            p.pos.y,
            p.pos.z,
            p.vel.x,
            p.vel.y,
            p.vel.z,
            p.kinetic_energy(),
        );
    }

    Ok(())
}
