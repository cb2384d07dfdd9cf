//! Text dumps of a built tree, one file per step.
//!
//! Format: first line is the node count, then one record per node in arena
//! order. A leaf is `L <num_parts>` followed by one `x y z` line per particle;
//! an internal node is `I <split_dim> <split_val> <left> <right>`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::kd_tree::{KDTree, System};
use crate::particle::Particle;

pub fn write_tree<W: Write>(out: &mut W, tree: &[KDTree], particles: &[Particle]) -> std::io::Result<()> {
    writeln!(out, "{}", tree.len())?;
    for n in tree {
        match n {
            KDTree::Leaf { .. } => {
                let parts = n.leaf_particles();
                writeln!(out, "L {}", parts.len())?;
                for &p in parts {
                    writeln!(out, "{} {} {}", particles[p].p.x, particles[p].p.y, particles[p].p.z)?;
                }
            }
            KDTree::Internal { split_dim, split_val, left, right, .. } => {
                writeln!(out, "I {} {} {} {}", split_dim, split_val, left, right)?;
            }
        }
    }
    Ok(())
}

pub fn tree_file_name(dir: &Path, step: usize) -> PathBuf {
    dir.join(format!("tree{}.txt", step))
}

/// Writes `dir/tree<step>.txt` for the tree currently held by `system`.
pub fn dump_tree(dir: &Path, step: usize, system: &System, particles: &[Particle]) -> Result<PathBuf, SimError> {
    let path = tree_file_name(dir, step);
    let mut file = BufWriter::new(File::create(&path)?);
    write_tree(&mut file, system.nodes(), particles)?;
    file.flush()?;
    log::debug!("wrote {} nodes to {}", system.node_count(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::F64x3;

    #[test]
    fn dump_single_leaf() {
        let parts = vec![
            Particle::new(F64x3::new(1.0, 2.0, 3.0), F64x3::zero(), 1.0),
            Particle::new(F64x3::new(-1.5, 0.0, 0.25), F64x3::zero(), 1.0),
        ];
        let mut sys = System::new(parts.len());
        sys.build_tree(&parts).unwrap();
        let mut buf = Vec::new();
        write_tree(&mut buf, sys.nodes(), &parts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1");
        assert_eq!(lines[1], "L 2");
        assert_eq!(lines.len(), 4);
        assert!(lines.contains(&"1 2 3"));
        assert!(lines.contains(&"-1.5 0 0.25"));
    }

    #[test]
    fn dump_internal_records() {
        let parts: Vec<Particle> = (0..12)
            .map(|i| Particle::new(F64x3::new(i as f64, 0.0, 0.0), F64x3::zero(), 1.0))
            .collect();
        let mut sys = System::new(parts.len());
        sys.build_tree(&parts).unwrap();
        let mut buf = Vec::new();
        write_tree(&mut buf, sys.nodes(), &parts).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("3"));
        assert_eq!(lines.next(), Some("I 0 6 1 2"));
        assert_eq!(lines.next(), Some("L 6"));
        assert_eq!(text.lines().filter(|l| l.starts_with('L')).count(), 2);
        assert_eq!(text.lines().count(), 1 + 1 + 2 + 12);
    }

    #[test]
    fn dump_to_directory() {
        let dir = std::env::temp_dir().join(format!("kdtree_dump_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let parts = particle_line(20);
        let mut sys = System::new(parts.len());
        sys.build_tree(&parts).unwrap();
        let path = dump_tree(&dir, 3, &sys, &parts).unwrap();
        assert_eq!(path, dir.join("tree3.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some(sys.node_count().to_string().as_str()));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dump_to_missing_directory_fails() {
        let parts = particle_line(3);
        let mut sys = System::new(parts.len());
        sys.build_tree(&parts).unwrap();
        let dir = Path::new("/nonexistent/kdtree/dump/dir");
        assert!(matches!(dump_tree(dir, 0, &sys, &parts), Err(SimError::Io(_))));
    }

    fn particle_line(n: usize) -> Vec<Particle> {
        (0..n)
            .map(|i| Particle::new(F64x3::new(0.0, i as f64, 0.0), F64x3::zero(), 1.0))
            .collect()
    }
}
