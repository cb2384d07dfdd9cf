use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};

use kdtree_gravity::config::{DEFAULT_DT, DEFAULT_SEED};
use kdtree_gravity::kd_tree::THETA;
use kdtree_gravity::{particle, tree_dump, SimConfig, SimError, System};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of particles to generate around the central body.
    #[arg(short, long)]
    number: usize,

    /// Number of steps to run the simulation.
    #[arg(short, long, default_value_t = 1)]
    steps: usize,

    /// Time step.
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f64,

    /// Barnes-Hut opening angle.
    #[arg(short, long, default_value_t = THETA)]
    theta: f64,

    /// Seed for initial conditions and pivot selection.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Write the tree of every step into this directory.
    #[arg(long)]
    dump_tree: Option<PathBuf>,

    /// Report total energy before and after the run. O(n^2).
    #[arg(short, long, default_value_t = false)]
    energy: bool,
}

fn run(args: Args) -> Result<(), SimError> {
    let config = SimConfig {
        theta: args.theta,
        dt: args.dt,
        steps: args.steps,
        seed: args.seed,
    };
    config.validate()?;

    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut bodies = particle::circular_orbits(args.number, &mut rng);
    let mut system = System::with_config(bodies.len(), &config);
    info!(
        "Running {} particles for {} steps (dt = {}, theta = {})",
        bodies.len(), config.steps, config.dt, config.theta
    );

    let initial_energy = args.energy.then(|| particle::calc_total_energy(&bodies));
    if let Some(e) = initial_energy {
        info!("Initial total energy: {:.6e}", e);
    }

    if let Some(dir) = &args.dump_tree {
        std::fs::create_dir_all(dir)?;
    }

    let start = Instant::now();
    system.advance_with(&mut bodies, config.steps, config.dt, |step, sys, parts| {
        if let Some(dir) = &args.dump_tree {
            if let Err(e) = tree_dump::dump_tree(dir, step, sys, parts) {
                warn!("Tree dump for step {} failed: {}", step, e);
                return Err(e);
            }
        }
        Ok(())
    })?;
    let elapsed = start.elapsed();

    if let Some(initial_energy) = initial_energy {
        let final_energy = particle::calc_total_energy(&bodies);
        info!("Final total energy: {:.6e}", final_energy);
        info!("Energy change: {:.6e} ({:.2}%)",
            final_energy - initial_energy,
            (final_energy - initial_energy).abs() / initial_energy.abs() * 100.0);
    }

    println!("Execution time: {} seconds", elapsed.as_nanos() as f64 / 1e9);
    if config.steps > 0 {
        println!("Average step time: {} seconds", elapsed.as_nanos() as f64 / (1e9 * config.steps as f64));
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
