use crate::vector::F64x3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
  pub p: F64x3,
  pub v: F64x3,
  pub m: f64
}

impl Particle {
  pub fn new(p: F64x3, v: F64x3, m: f64) -> Self {
    Particle { p, v, m }
  }
}

pub fn two_bodies() -> Vec<Particle> {
  vec![
    Particle::new(F64x3::zero(), F64x3::zero(), 1.0),
    Particle::new(F64x3::new(1.0, 0.0, 0.0), F64x3::new(0.0, 1.0, 0.0), 1e-20),
  ]
}

/// A unit-mass central body with `n` light particles on circular orbits in the
/// x-y plane, at radii spread evenly over `[0.1, 5.1)`.
pub fn circular_orbits(n: usize, rng: &mut fastrand::Rng) -> Vec<Particle> {
  let mut particle_buf = Vec::with_capacity(n + 1);
  particle_buf.push(Particle::new(F64x3::zero(), F64x3::zero(), 1.0));

  for i in 0..n {
    let d = 0.1 + ((i as f64) * 5.0 / (n as f64));
    let v = f64::sqrt(1.0 / d);
    let theta = rng.f64() * std::f64::consts::TAU;
    let (sin, cos) = theta.sin_cos();
    particle_buf.push(Particle::new(
      F64x3::new(d * cos, d * sin, 0.0),
      F64x3::new(-v * sin, v * cos, 0.0),
      1e-14,
    ));
  }
  particle_buf
}

/// `n` particles at rest, uniformly filling the cube `[-half, half)^3`, with
/// total mass 1.
pub fn random_cloud(n: usize, half: f64, rng: &mut fastrand::Rng) -> Vec<Particle> {
  let m = 1.0 / n.max(1) as f64;
  (0..n)
    .map(|_| {
      let p = F64x3::new(
        (rng.f64() * 2.0 - 1.0) * half,
        (rng.f64() * 2.0 - 1.0) * half,
        (rng.f64() * 2.0 - 1.0) * half,
      );
      Particle::new(p, F64x3::zero(), m)
    })
    .collect()
}

pub fn distance_sqr(x1: F64x3, x2: F64x3) -> f64 {
  (x1 - x2).norm_sqr()
}

pub fn distance(x1: F64x3, x2: F64x3) -> f64 {
  f64::sqrt(distance_sqr(x1, x2))
}

/// Acceleration on `pi` due to `pj`. Coincident particles contribute nothing.
pub fn calc_pp_accel(pi: &Particle, pj: &Particle) -> F64x3 {
  calc_cm_accel(pi, pj.m, pj.p)
}

/// Acceleration on `pi` due to a point mass `m` sitting at `cm`.
pub fn calc_cm_accel(pi: &Particle, m: f64, cm: F64x3) -> F64x3 {
  let dp = pi.p - cm;
  let dp2 = dp.norm_sqr();
  if dp2 == 0.0 {
    return F64x3::zero();
  }
  let dist = f64::sqrt(dp2);
  let magi = -m / (dist * dp2);
  dp * magi
}

/// Exact O(n) sum over every other particle. Reference for the tree evaluator.
pub fn calc_direct_accel(i: usize, particles: &[Particle]) -> F64x3 {
  particles.iter().enumerate().fold(F64x3::zero(), |acc, (j, pj)| {
    if j == i { acc } else { acc + calc_pp_accel(&particles[i], pj) }
  })
}

pub fn calc_kinetic_energy(particles: &[Particle]) -> f64 {
  particles.iter().fold(0.0, |ke, p| ke + 0.5 * p.m * p.v.norm_sqr())
}

pub fn calc_potential_energy(particles: &[Particle]) -> f64 {
  let mut pe = 0.0;
  for i in 0..particles.len() {
    for j in (i + 1)..particles.len() {
      let dist = distance(particles[i].p, particles[j].p);
      if dist > 0.0 {
        pe -= particles[i].m * particles[j].m / dist;
      }
    }
  }
  pe
}

pub fn calc_total_energy(particles: &[Particle]) -> f64 {
  calc_kinetic_energy(particles) + calc_potential_energy(particles)
}

pub fn calc_momentum(particles: &[Particle]) -> F64x3 {
  particles.iter().fold(F64x3::zero(), |mom, p| mom + p.v * p.m)
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn pp_accel_points_toward_other_body() {
    let a = Particle::new(F64x3::zero(), F64x3::zero(), 1.0);
    let b = Particle::new(F64x3::new(2.0, 0.0, 0.0), F64x3::zero(), 3.0);
    let acc = calc_pp_accel(&a, &b);
    assert_relative_eq!(acc.x, 3.0 / 4.0);
    assert_eq!(acc.y, 0.0);
    assert_eq!(acc.z, 0.0);
    let back = calc_pp_accel(&b, &a);
    assert_relative_eq!(back.x, -1.0 / 4.0);
  }

  #[test]
  fn coincident_particles_do_not_blow_up() {
    let a = Particle::new(F64x3::new(1.0, 1.0, 1.0), F64x3::zero(), 1.0);
    let acc = calc_pp_accel(&a, &a);
    assert_eq!(acc, F64x3::zero());
    assert_eq!(calc_cm_accel(&a, 5.0, a.p), F64x3::zero());
  }

  #[test]
  fn direct_sum_skips_self() {
    let parts = two_bodies();
    let a0 = calc_direct_accel(0, &parts);
    assert_relative_eq!(a0.x, 1e-20);
    let a1 = calc_direct_accel(1, &parts);
    assert_relative_eq!(a1.x, -1.0);
  }

  #[test]
  fn circular_orbit_speeds() {
    let mut rng = fastrand::Rng::with_seed(3);
    let parts = circular_orbits(100, &mut rng);
    assert_eq!(parts.len(), 101);
    for p in &parts[1..] {
      let r = p.p.norm();
      assert_relative_eq!(p.v.norm(), f64::sqrt(1.0 / r), max_relative = 1e-12);
      assert_eq!(p.p.z, 0.0);
      assert!(p.p.dot(p.v).abs() < 1e-12);
    }
  }

  #[test]
  fn random_cloud_bounds_and_mass() {
    let mut rng = fastrand::Rng::with_seed(11);
    let parts = random_cloud(500, 2.0, &mut rng);
    let total: f64 = parts.iter().map(|p| p.m).sum();
    assert_relative_eq!(total, 1.0, max_relative = 1e-12);
    for p in &parts {
      for dim in 0..3 {
        assert!(p.p[dim] >= -2.0 && p.p[dim] < 2.0);
      }
    }
  }

  #[test]
  fn energy_and_momentum() {
    let parts = vec![
      Particle::new(F64x3::zero(), F64x3::new(1.0, 0.0, 0.0), 2.0),
      Particle::new(F64x3::new(0.0, 2.0, 0.0), F64x3::new(0.0, -1.0, 0.0), 1.0),
    ];
    assert_relative_eq!(calc_kinetic_energy(&parts), 1.0 + 0.5);
    assert_relative_eq!(calc_potential_energy(&parts), -1.0);
    assert_relative_eq!(calc_total_energy(&parts), 0.5);
    assert_eq!(calc_momentum(&parts), F64x3::new(2.0, -1.0, 0.0));
  }
}
