//! Shared constructors for synthetic chains

use tmclust::align::secstr;
use tmclust::cluster::{ClusterParams, ScoreMode};
use tmclust::structure::{ChainData, ChainRecord};

/// Ideal alpha-helix trace: 2.3 A radius, 1.5 A rise, 100 degrees per
/// residue.
pub fn helix_coords(n: usize) -> Vec<[f64; 3]> {
    (0..n)
        .map(|i| {
            let a = (i as f64) * 100.0f64.to_radians();
            [2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f64]
        })
        .collect()
}

pub fn protein_chain(label: &str, xyz: Vec<[f64; 3]>) -> ChainRecord {
    let n = xyz.len();
    let sec = secstr::assign_protein(&xyz);
    ChainRecord::new(
        label.to_string(),
        -(n as i32),
        ChainData {
            seq: vec![b'A'; n],
            sec,
            xyz,
        },
    )
}

pub fn helix_chain(label: &str, n: usize) -> ChainRecord {
    protein_chain(label, helix_coords(n))
}

/// Same geometry as a protein helix but typed as a nucleic acid.
pub fn rna_chain(label: &str, n: usize) -> ChainRecord {
    let xyz = helix_coords(n);
    let sec = secstr::assign_nucleic(&xyz);
    ChainRecord::new(
        label.to_string(),
        n as i32,
        ChainData {
            seq: vec![b'G'; n],
            sec,
            xyz,
        },
    )
}

/// Deterministic large-step random walk; two different seeds give folds with
/// no meaningful structural similarity.
pub fn walk_chain(label: &str, n: usize, seed: u64) -> ChainRecord {
    let mut state = seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64 / (1u64 << 31) as f64) - 1.0
    };
    let mut xyz = Vec::with_capacity(n);
    let mut p = [0.0f64; 3];
    for _ in 0..n {
        xyz.push(p);
        let step = [next(), next(), next()];
        let norm = (step[0] * step[0] + step[1] * step[1] + step[2] * step[2])
            .sqrt()
            .max(1e-6);
        for k in 0..3 {
            p[k] += 12.0 * step[k] / norm;
        }
    }
    protein_chain(label, xyz)
}

pub fn params(tm_cut: f64, mode_flag: i32, workers: usize) -> ClusterParams {
    ClusterParams {
        tm_cut,
        mode: ScoreMode::from_flag(mode_flag).unwrap(),
        fast: false,
        workers,
    }
}
