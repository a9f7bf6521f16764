//! Coarse iterative aligner (HwRMSD)
//!
//! One sequence/secondary-structure seed alignment, then a fixed number of
//! superpose-and-realign rounds. No multi-seed search and no final
//! refinement, which is what makes it cheap enough to screen every surviving
//! representative before TM-align runs.

use super::kabsch::kabsch;
use super::nwdp::{aligned_pairs, nw_align, ScoreMatrix};
use super::tmscore::{d0_params, dist2, rmsd_of_alignment, tm_of_alignment};
use super::AlignScores;
use crate::structure::ChainView;

/// Seed gap penalty; refinement rounds use the distance-matrix gap below.
const SEED_GAP: f64 = -1.0;
const REFINE_GAP: f64 = -0.6;

/// Align `x` against `y` and score both normalisations.
///
/// `norm` is the engine's normalisation coupling flag (only the acceptance
/// target inside the refinement depends on it). `glocal` nonzero penalises
/// end gaps; the clustering engine always passes 0 (global with free ends).
pub fn hwrmsd(
    x: ChainView<'_>,
    y: ChainView<'_>,
    norm: i32,
    mol_sum: i32,
    glocal: i32,
    iter: usize,
) -> AlignScores {
    let xlen = x.len();
    let ylen = y.len();
    if xlen == 0 || ylen == 0 {
        return AlignScores {
            tm1: 0.0,
            tm2: 0.0,
            rmsd: 0.0,
            n_ali: 0,
        };
    }
    let penalize_ends = glocal != 0;
    let l_acc = acceptance_norm(norm, xlen, ylen);
    let d0_acc = d0_params(l_acc, mol_sum);
    let d0_search = d0_acc.d0_search;

    let seed = ScoreMatrix::from_fn(xlen, ylen, |i, j| {
        let mut s = 0.0;
        if x.seq[i] == y.seq[j] {
            s += 1.0;
        }
        if x.sec[i] == y.sec[j] {
            s += 0.5;
        }
        s
    });
    let mut map = nw_align(&seed, SEED_GAP, penalize_ends);

    for _ in 0..iter {
        let pairs = aligned_pairs(&map);
        if pairs.len() < 3 {
            break;
        }
        let xs: Vec<[f64; 3]> = pairs.iter().map(|&(i, _)| x.xyz[i]).collect();
        let ys: Vec<[f64; 3]> = pairs.iter().map(|&(_, j)| y.xyz[j]).collect();
        let t = kabsch(&xs, &ys);
        let moved: Vec<[f64; 3]> = x.xyz.iter().map(|&p| t.apply(p)).collect();
        let scores = ScoreMatrix::from_fn(xlen, ylen, |i, j| {
            1.0 / (1.0 + dist2(moved[i], y.xyz[j]) / (d0_search * d0_search))
        });
        let next = nw_align(&scores, REFINE_GAP, penalize_ends);
        if next == map {
            break;
        }
        map = next;
    }

    score_map(x, y, &map, mol_sum)
}

/// Normalisation length the refinement optimises for, from the coupling flag.
pub fn acceptance_norm(norm: i32, xlen: usize, ylen: usize) -> usize {
    match norm {
        -2 => xlen.max(ylen),
        -1 => xlen.min(ylen),
        1 => (xlen + ylen) / 2,
        _ => xlen.min(ylen),
    }
}

/// Final TM1/TM2/rmsd of a settled alignment map.
pub fn score_map(x: ChainView<'_>, y: ChainView<'_>, map: &[i32], mol_sum: i32) -> AlignScores {
    let xlen = x.len();
    let ylen = y.len();
    let n_ali = aligned_pairs(map).len();
    let (tm1, _) = tm_of_alignment(x.xyz, y.xyz, map, ylen, &d0_params(ylen, mol_sum));
    let (tm2, t2) = tm_of_alignment(x.xyz, y.xyz, map, xlen, &d0_params(xlen, mol_sum));
    AlignScores {
        tm1,
        tm2,
        rmsd: rmsd_of_alignment(x.xyz, y.xyz, map, &t2),
        n_ali,
    }
}
