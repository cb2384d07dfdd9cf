use kdtree_gravity::config::DEFAULT_SEED;
use kdtree_gravity::{particle, SimConfig, System};
use std::time::Instant;

fn main() {
    env_logger::init();
    println!("Barnes-Hut kd-tree Benchmark");
    println!("----------------------------");

    // Test parameters
    let particle_counts = [100, 1000, 10000, 100000];
    let thetas = [0.1, 0.3, 0.6];
    let steps = 10;
    let dt = 1e-3;

    println!("Running {} steps with dt={}", steps, dt);
    println!("\nParticle Count | Theta | Runtime (s) | Avg Step Time (s) | Momentum |P|");
    println!("---------------|-------|-------------|-------------------|------------");

    for &n in &particle_counts {
        for &theta in &thetas {
            let config = SimConfig { theta, dt, steps, seed: DEFAULT_SEED };
            let mut rng = fastrand::Rng::with_seed(config.seed);
            let mut bodies = particle::circular_orbits(n, &mut rng);
            let mut system = System::with_config(bodies.len(), &config);

            let start = Instant::now();
            if let Err(e) = system.advance(&mut bodies, steps, dt) {
                eprintln!("n = {}, theta = {}: {}", n, theta, e);
                continue;
            }
            let runtime = start.elapsed().as_nanos() as f64 / 1e9;
            let avg_step_time = runtime / steps as f64;
            let momentum = particle::calc_momentum(&bodies).norm();

            println!("{:14} | {:5} | {:11.4} | {:17.6} | {:.3e}",
                     n, theta, runtime, avg_step_time, momentum);
        }
        println!("---------------|-------|-------------|-------------------|------------");
    }
}
