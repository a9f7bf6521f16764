//! TM-score parameters and scoring of a fixed alignment
//!
//! The d0 scale follows the published TM-score conventions for proteins and
//! nucleic acids. Scoring a fixed residue correspondence searches for the
//! superposition maximising the score by iteratively re-fitting on the
//! close-pair subset, so a good local match is not washed out by divergent
//! tails.

use super::kabsch::{kabsch, Transform};

/// Maximum re-fit rounds when scoring a fixed alignment.
const MAX_REFIT: usize = 20;
/// Smallest pair subset a superposition may be fitted on.
const MIN_FIT_PAIRS: usize = 3;

/// Distance scale of the TM-score term `1 / (1 + (d/d0)^2)`, plus the
/// clamped variant used while searching for a superposition.
#[derive(Debug, Clone, Copy)]
pub struct D0 {
    pub d0: f64,
    pub d0_search: f64,
}

/// d0 for a given normalisation length. `mol_sum > 0` selects the
/// nucleic-acid scale (the sum of the two chains' molecule tallies, as the
/// engine passes it).
pub fn d0_params(l_norm: usize, mol_sum: i32) -> D0 {
    let l = l_norm as f64;
    let d0 = if mol_sum > 0 {
        match l_norm {
            0..=11 => 0.3,
            12..=15 => 0.4,
            16..=19 => 0.5,
            20..=23 => 0.6,
            24..=29 => 0.7,
            _ => 0.6 * (l - 0.5).sqrt() - 2.5,
        }
    } else if l_norm <= 21 {
        0.5
    } else {
        (1.24 * (l - 15.0).cbrt() - 1.8).max(0.5)
    };
    D0 {
        d0,
        d0_search: d0.clamp(4.5, 8.0),
    }
}

#[inline]
pub fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// TM-score of `map` under the best superposition found, normalised by
/// `l_norm`. Returns the score and the transform that produced it.
///
/// Superposition search: fit on the current subset, rescore every aligned
/// pair, keep pairs within the search cutoff (widening it until at least
/// [`MIN_FIT_PAIRS`] survive), stop when the subset is stable.
pub fn tm_of_alignment(
    x: &[[f64; 3]],
    y: &[[f64; 3]],
    map: &[i32],
    l_norm: usize,
    d0: &D0,
) -> (f64, Transform) {
    let pairs: Vec<(usize, usize)> = super::nwdp::aligned_pairs(map);
    if pairs.is_empty() || l_norm == 0 {
        return (0.0, Transform::identity());
    }

    let d0sq = d0.d0 * d0.d0;
    let mut subset: Vec<usize> = (0..pairs.len()).collect();
    let mut best = (f64::MIN, Transform::identity());

    for _ in 0..MAX_REFIT {
        let xs: Vec<[f64; 3]> = subset.iter().map(|&k| x[pairs[k].0]).collect();
        let ys: Vec<[f64; 3]> = subset.iter().map(|&k| y[pairs[k].1]).collect();
        let t = kabsch(&xs, &ys);

        let d2: Vec<f64> = pairs
            .iter()
            .map(|&(i, j)| dist2(t.apply(x[i]), y[j]))
            .collect();
        let tm = d2.iter().map(|&d| 1.0 / (1.0 + d / d0sq)).sum::<f64>() / l_norm as f64;
        if tm > best.0 {
            best = (tm, t);
        }

        let mut cutoff = d0.d0_search + 1.0;
        let mut next: Vec<usize> = (0..pairs.len())
            .filter(|&k| d2[k] < cutoff * cutoff)
            .collect();
        while next.len() < MIN_FIT_PAIRS && next.len() < pairs.len() {
            cutoff += 0.5;
            next = (0..pairs.len())
                .filter(|&k| d2[k] < cutoff * cutoff)
                .collect();
        }
        if next == subset {
            break;
        }
        subset = next;
    }
    (best.0, best.1)
}

/// Root-mean-square deviation over all aligned pairs under `t`.
pub fn rmsd_of_alignment(x: &[[f64; 3]], y: &[[f64; 3]], map: &[i32], t: &Transform) -> f64 {
    let pairs = super::nwdp::aligned_pairs(map);
    if pairs.is_empty() {
        return 0.0;
    }
    let sum: f64 = pairs
        .iter()
        .map(|&(i, j)| dist2(t.apply(x[i]), y[j]))
        .sum();
    (sum / pairs.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_d0_values() {
        assert!((d0_params(10, -2).d0 - 0.5).abs() < 1e-12);
        assert!((d0_params(21, -2).d0 - 0.5).abs() < 1e-12);
        // 1.24 * cbrt(100 - 15) - 1.8
        let d = d0_params(100, -2).d0;
        assert!((d - (1.24 * 85.0f64.cbrt() - 1.8)).abs() < 1e-12);
        assert!(d > 3.0 && d < 4.5);
    }

    #[test]
    fn nucleic_d0_values() {
        assert!((d0_params(10, 2).d0 - 0.3).abs() < 1e-12);
        assert!((d0_params(25, 2).d0 - 0.7).abs() < 1e-12);
        let d = d0_params(100, 2).d0;
        assert!((d - (0.6 * 99.5f64.sqrt() - 2.5)).abs() < 1e-12);
    }

    #[test]
    fn d0_search_is_clamped() {
        assert!((d0_params(10, -2).d0_search - 4.5).abs() < 1e-12);
        assert!((d0_params(3000, -2).d0_search - 8.0).abs() < 1e-12);
    }

    #[test]
    fn identical_alignment_scores_one() {
        let x: Vec<[f64; 3]> = (0..30).map(|i| helix_point(i)).collect();
        let map: Vec<i32> = (0..30).collect();
        let d0 = d0_params(30, -2);
        let (tm, _) = tm_of_alignment(&x, &x, &map, 30, &d0);
        assert!((tm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_alignment_normalises_by_l_norm() {
        let x: Vec<[f64; 3]> = (0..30).map(|i| helix_point(i)).collect();
        let map: Vec<i32> = (0..30).map(|i| if i < 15 { i } else { -1 }).collect();
        let d0 = d0_params(30, -2);
        let (tm, _) = tm_of_alignment(&x, &x, &map, 30, &d0);
        assert!((tm - 0.5).abs() < 1e-9);
    }

    fn helix_point(i: i32) -> [f64; 3] {
        let a = 1.745 * i as f64;
        [2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f64]
    }
}
