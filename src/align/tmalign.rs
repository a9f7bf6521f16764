//! Sequence-independent structural alignment (TM-align)
//!
//! Multi-seed search: gapless threading, secondary-structure alignment, and
//! (in refined mode) sequence alignment each propose an initial
//! correspondence, which distance-matrix DP iteration then polishes. Fast
//! mode drops the sequence seed, samples fewer threading offsets and halves
//! the polish rounds; the final TM1/TM2 are always scored the same way, so
//! fast and refined differ only through the alignment they settle on.

use super::hwrmsd::{acceptance_norm, score_map};
use super::nwdp::{nw_align, AlignMap, ScoreMatrix};
use super::tmscore::{d0_params, dist2, tm_of_alignment};
use super::AlignScores;
use crate::structure::ChainView;

const REFINE_GAP: f64 = -0.6;
const SS_SEED_GAP: f64 = -1.0;
const SEQ_SEED_GAP: f64 = -0.6;

/// DP polish rounds per seed.
const ROUNDS_FULL: usize = 4;
const ROUNDS_FAST: usize = 2;
/// Threading offsets sampled across the length difference.
const OFFSETS_FULL: usize = 10;
const OFFSETS_FAST: usize = 4;
/// Stop trying further seeds once the acceptance TM clears the cutoff by
/// this margin; the alignment is already good enough to decide with.
const SEED_EXIT_MARGIN: f64 = 0.15;

/// Align `x` against `y`. `norm` is the normalisation coupling flag (drives
/// seed acceptance only), `tm_cut` the caller's decision threshold (used only
/// to stop the seed search early; 0 disables that).
pub fn tmalign(
    x: ChainView<'_>,
    y: ChainView<'_>,
    norm: i32,
    fast: bool,
    mol_sum: i32,
    tm_cut: f64,
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

    let l_acc = acceptance_norm(norm, xlen, ylen);
    let d0_acc = d0_params(l_acc, mol_sum);
    let d0_search = d0_params(xlen.min(ylen), mol_sum).d0_search;
    let rounds = if fast { ROUNDS_FAST } else { ROUNDS_FULL };

    let mut seeds: Vec<AlignMap> = Vec::new();
    if let Some(map) = best_threading_seed(x, y, l_acc, mol_sum, fast) {
        seeds.push(map);
    }
    seeds.push(ss_seed(x, y));
    if !fast {
        seeds.push(seq_seed(x, y));
    }

    let mut best_tm = f64::MIN;
    let mut best_map: AlignMap = vec![-1; xlen];
    for seed in seeds {
        let mut map = seed;
        for _ in 0..rounds {
            let (tm, t) = tm_of_alignment(x.xyz, y.xyz, &map, l_acc, &d0_acc);
            if tm > best_tm {
                best_tm = tm;
                best_map = map.clone();
            }
            let moved: Vec<[f64; 3]> = x.xyz.iter().map(|&p| t.apply(p)).collect();
            let scores = ScoreMatrix::from_fn(xlen, ylen, |i, j| {
                1.0 / (1.0 + dist2(moved[i], y.xyz[j]) / (d0_search * d0_search))
            });
            let next = nw_align(&scores, REFINE_GAP, false);
            if next == map {
                break;
            }
            map = next;
        }
        let (tm, _) = tm_of_alignment(x.xyz, y.xyz, &map, l_acc, &d0_acc);
        if tm > best_tm {
            best_tm = tm;
            best_map = map;
        }
        if tm_cut > 0.0 && best_tm >= tm_cut + SEED_EXIT_MARGIN {
            break;
        }
    }

    score_map(x, y, &best_map, mol_sum)
}

/// Gapless threading: slide the shorter chain along the longer one and keep
/// the offset whose rigid superposition scores best.
fn best_threading_seed(
    x: ChainView<'_>,
    y: ChainView<'_>,
    l_acc: usize,
    mol_sum: i32,
    fast: bool,
) -> Option<AlignMap> {
    let xlen = x.len();
    let ylen = y.len();
    let d0 = d0_params(l_acc, mol_sum);
    let span = ylen.abs_diff(xlen);
    let samples = if fast { OFFSETS_FAST } else { OFFSETS_FULL };
    let step = (span / samples).max(1);

    let mut best: Option<(f64, AlignMap)> = None;
    let mut off = 0i64;
    loop {
        let shift = if ylen >= xlen { off } else { -off };
        let map: AlignMap = (0..xlen)
            .map(|i| {
                let j = i as i64 + shift;
                if j >= 0 && (j as usize) < ylen {
                    j as i32
                } else {
                    -1
                }
            })
            .collect();
        let (tm, _) = tm_of_alignment(x.xyz, y.xyz, &map, l_acc, &d0);
        if best.as_ref().map_or(true, |(b, _)| tm > *b) {
            best = Some((tm, map));
        }
        off += step as i64;
        if off > span as i64 {
            break;
        }
    }
    best.map(|(_, m)| m)
}

/// Secondary-structure identity seed.
fn ss_seed(x: ChainView<'_>, y: ChainView<'_>) -> AlignMap {
    let s = ScoreMatrix::from_fn(x.len(), y.len(), |i, j| {
        if x.sec[i] == y.sec[j] {
            1.0
        } else {
            0.0
        }
    });
    nw_align(&s, SS_SEED_GAP, false)
}

/// Residue-identity seed (refined mode only).
fn seq_seed(x: ChainView<'_>, y: ChainView<'_>) -> AlignMap {
    let s = ScoreMatrix::from_fn(x.len(), y.len(), |i, j| {
        if x.seq[i] == y.seq[j] {
            1.0
        } else {
            0.0
        }
    });
    nw_align(&s, SEQ_SEED_GAP, false)
}
