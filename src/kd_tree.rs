use log::{debug, trace};
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::particle::{calc_cm_accel, calc_pp_accel, Particle};
use crate::quickstat::quickstat_index;
use crate::vector::F64x3;

pub const MAX_PARTS: usize = 7;
pub const THETA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KDTree {
    Leaf {
        num_parts: usize,
        leaf_parts: [usize; MAX_PARTS]
    },

    Internal {
        split_dim: usize,
        split_val: f64,
        m: f64,
        cm: F64x3,
        size: f64,
        left: usize,
        right: usize
    }
}

impl Default for KDTree {
    fn default() -> Self {
        KDTree::Leaf { num_parts: 0, leaf_parts: [0; MAX_PARTS] }
    }
}

impl KDTree {
    pub fn leaf(parts: &[usize]) -> KDTree {
        debug_assert!(parts.len() <= MAX_PARTS);
        let mut leaf_parts = [0; MAX_PARTS];
        leaf_parts[..parts.len()].copy_from_slice(parts);
        KDTree::Leaf { num_parts: parts.len(), leaf_parts }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, KDTree::Leaf { .. })
    }

    /// Particle indices held by a leaf; empty for internal nodes.
    pub fn leaf_particles(&self) -> &[usize] {
        match self {
            KDTree::Leaf { num_parts, leaf_parts } => &leaf_parts[..*num_parts],
            KDTree::Internal { .. } => &[],
        }
    }
}

/// Flat node storage for one tree. Nodes refer to each other by index only, so
/// the backing vector can be reallocated between (or during) builds.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<KDTree>,
    len: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena::default()
    }

    pub fn for_particles(num_parts: usize) -> Self {
        NodeArena {
            nodes: vec![KDTree::default(); nodes_needed_for_particles(num_parts)],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes written since the last `clear`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical reset. Storage is kept for the next build.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Grows to at least `n` slots, doubling the current capacity when that is larger.
    pub fn ensure_capacity(&mut self, n: usize) -> Result<(), SimError> {
        let old = self.nodes.len();
        if old >= n {
            return Ok(());
        }
        let new_cap = usize::max(old * 2, n);
        self.nodes
            .try_reserve_exact(new_cap - old)
            .map_err(|_| SimError::Allocation { requested: new_cap })?;
        debug!("growing node arena from {} to {} nodes", old, new_cap);
        self.nodes.resize(new_cap, KDTree::default());
        Ok(())
    }

    pub fn set(&mut self, idx: usize, node: KDTree) -> Result<(), SimError> {
        self.ensure_capacity(idx + 1)?;
        self.nodes[idx] = node;
        self.len = usize::max(self.len, idx + 1);
        Ok(())
    }

    pub fn get(&self, idx: usize) -> Option<&KDTree> {
        self.as_slice().get(idx)
    }

    pub fn as_slice(&self) -> &[KDTree] {
        &self.nodes[..self.len]
    }
}

// Starting arena size. Builds grow the arena if this comes up short.
fn nodes_needed_for_particles(num_parts: usize) -> usize {
    if num_parts <= MAX_PARTS {
        1
    } else {
        let min_num_leaves = num_parts / (MAX_PARTS / 2);
        2 * min_num_leaves.next_power_of_two() - 1
    }
}

/// Builds the subtree over `indices[start..end)` with its root at `cur_node`.
/// Returns the next free node index, so the nodes come out in preorder.
pub fn build_tree(
    indices: &mut [usize],
    start: usize,
    end: usize,
    particles: &[Particle],
    cur_node: usize,
    arena: &mut NodeArena,
    rng: &mut fastrand::Rng,
) -> Result<usize, SimError> {
    let np = end - start;
    if np <= MAX_PARTS {
        arena.set(cur_node, KDTree::leaf(&indices[start..end]))?;
        Ok(cur_node + 1)
    } else {
        // Pick split dim and value
        let mut min = F64x3::splat(f64::INFINITY);
        let mut max = F64x3::splat(f64::NEG_INFINITY);
        let mut m = 0.0;
        let mut cm = F64x3::zero();
        for &i in &indices[start..end] {
            let p = &particles[i];
            m += p.m;
            cm += p.p * p.m;
            min = min.min(p.p);
            max = max.max(p.p);
        }
        let cm = if m > 0.0 { cm / m } else { (min + max) * 0.5 };
        let extent = max - min;
        let mut split_dim = 0;
        for dim in 1..3 {
            if extent[dim] > extent[split_dim] {
                split_dim = dim
            }
        }
        let size = extent[split_dim];

        // Partition particles on split_dim
        let mid = (start + end) / 2;
        quickstat_index(&mut indices[start..end], mid - start, rng,
            |i| particles[i].p[split_dim]);
        let split_val = particles[indices[mid]].p[split_dim];

        // Recurse on children and build this node.
        let left = cur_node + 1;
        let right = build_tree(indices, start, mid, particles, left, arena, rng)?;
        let next = build_tree(indices, mid, end, particles, right, arena, rng)?;

        arena.set(cur_node, KDTree::Internal { split_dim, split_val, m, cm, size, left, right })?;
        Ok(next)
    }
}

fn accel_recur(cur_node: usize, p: usize, particles: &[Particle], nodes: &[KDTree], theta: f64) -> F64x3 {
    match &nodes[cur_node] {
        KDTree::Leaf { num_parts, leaf_parts } => {
            let mut acc = F64x3::zero();
            for &q in &leaf_parts[..*num_parts] {
                if q != p {
                    acc += calc_pp_accel(&particles[p], &particles[q]);
                }
            }
            acc
        }
        KDTree::Internal { m, cm, size, left, right, .. } => {
            let dist_sqr = (particles[p].p - *cm).norm_sqr();
            if size * size < theta * theta * dist_sqr {
                calc_cm_accel(&particles[p], *m, *cm)
            } else {
                accel_recur(*left, p, particles, nodes, theta)
                    + accel_recur(*right, p, particles, nodes, theta)
            }
        }
    }
}

/// Barnes-Hut acceleration on particle `p` from the tree in `nodes`.
pub fn calc_accel(p: usize, particles: &[Particle], nodes: &[KDTree], theta: f64) -> F64x3 {
    if nodes.is_empty() {
        F64x3::zero()
    } else {
        accel_recur(0, p, particles, nodes, theta)
    }
}

/// Per-simulation scratch state: the index permutation, the node arena and the
/// acceleration buffer. Create once and reuse for every step.
pub struct System {
    indices: Vec<usize>,
    arena: NodeArena,
    accels: Vec<F64x3>,
    theta: f64,
    rng: fastrand::Rng,
}

impl System {
    pub fn new(n: usize) -> Self {
        System::with_config(n, &SimConfig::default())
    }

    pub fn with_config(n: usize, config: &SimConfig) -> Self {
        System {
            indices: (0..n).collect(),
            arena: NodeArena::for_particles(n),
            accels: vec![F64x3::zero(); n],
            theta: config.theta,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Nodes of the most recent build, root first.
    pub fn nodes(&self) -> &[KDTree] {
        self.arena.as_slice()
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn arena_capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    fn reset_indices(&mut self, n: usize) -> Result<(), SimError> {
        if n > self.indices.len() {
            self.indices
                .try_reserve_exact(n - self.indices.len())
                .map_err(|_| SimError::Allocation { requested: n })?;
        }
        self.indices.resize(n, 0);
        for (i, idx) in self.indices.iter_mut().enumerate() {
            *idx = i;
        }
        Ok(())
    }

    fn reset_accels(&mut self, n: usize) -> Result<(), SimError> {
        if n > self.accels.len() {
            self.accels
                .try_reserve_exact(n - self.accels.len())
                .map_err(|_| SimError::Allocation { requested: n })?;
        }
        self.accels.resize(n, F64x3::zero());
        Ok(())
    }

    /// Rebuilds the tree over all of `particles` and returns the root index.
    /// With no particles the arena is left empty.
    pub fn build_tree(&mut self, particles: &[Particle]) -> Result<usize, SimError> {
        let n = particles.len();
        self.reset_indices(n)?;
        self.arena.clear();
        if n == 0 {
            return Ok(0);
        }
        let used = build_tree(&mut self.indices, 0, n, particles, 0, &mut self.arena, &mut self.rng)?;
        debug!("built kd-tree over {} particles with {} nodes", n, used);
        Ok(0)
    }

    /// Acceleration on particle `p` from the current tree. Read only, so it may be
    /// called from many threads at once.
    pub fn calc_accel(&self, particles: &[Particle], p: usize) -> F64x3 {
        calc_accel(p, particles, self.arena.as_slice(), self.theta)
    }

    pub fn advance(&mut self, particles: &mut [Particle], steps: usize, dt: f64) -> Result<(), SimError> {
        self.advance_with(particles, steps, dt, |_, _, _| Ok(()))
    }

    /// Like [`System::advance`], calling `hook` after each tree build and before
    /// the accelerations are computed.
    pub fn advance_with<H>(
        &mut self,
        particles: &mut [Particle],
        steps: usize,
        dt: f64,
        mut hook: H,
    ) -> Result<(), SimError>
    where
        H: FnMut(usize, &System, &[Particle]) -> Result<(), SimError>,
    {
        let n = particles.len();
        if n == 0 {
            return Ok(());
        }
        self.reset_accels(n)?;
        let min_len = usize::max(1, n / (4 * num_cpus::get()));

        for step in 0..steps {
            self.build_tree(particles)?;
            trace!("step {}: tree ready, running hook", step);
            hook(step, &*self, &*particles)?;

            // Calculate accelerations
            let nodes = self.arena.as_slice();
            let theta = self.theta;
            let parts: &[Particle] = particles;
            self.accels
                .par_iter_mut()
                .enumerate()
                .with_min_len(min_len)
                .for_each(|(i, acc)| {
                    *acc = accel_recur(0, i, parts, nodes, theta);
                });

            // Velocity first, then position with the new velocity
            for (p, a) in particles.iter_mut().zip(&self.accels) {
                p.v += *a * dt;
                p.p += p.v * dt;
            }
        }
        Ok(())
    }
}
