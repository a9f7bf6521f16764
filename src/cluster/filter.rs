//! Candidate pruning and stage thresholds
//!
//! The pruner rejects pairs that cannot reach the cutoff on length ratio
//! alone (the query is never longer than a representative, by the processing
//! order) and pairs mixing proteins with nucleic acids. The stage bounds set
//! the accept/reject corridors for the coarse and fast alignment tiers.

use super::score::ScoreMode;
use crate::structure::ChainRecord;

/// True when `(x, y)` cannot score at or above `tm_cut` under `mode`, or the
/// molecule types are incompatible. `xlen <= ylen` by construction.
pub fn reject_pair(
    xlen: usize,
    ylen: usize,
    mol_x: i32,
    mol_y: i32,
    tm_cut: f64,
    mode: ScoreMode,
) -> bool {
    if mol_x * mol_y < 0 {
        return true;
    }
    let x = xlen as f64;
    let y = ylen as f64;
    let c = tm_cut;
    match mode {
        ScoreMode::Larger => false,
        ScoreMode::Smaller => x < c * y,
        ScoreMode::Mean => x < (2.0 * c - 1.0) * y,
        ScoreMode::Harmonic => x * (2.0 / c - 1.0) < y,
        ScoreMode::Geometric => x < c * c * y,
        ScoreMode::RootMeanSquare => x * x < (2.0 * c * c - 1.0) * y * y,
    }
}

/// Representatives the query may still match, newest first (chains of
/// similar length cluster near the tail of the representative list).
pub fn prune_candidates(
    query: usize,
    table: &[ChainRecord],
    reprs: &[usize],
    tm_cut: f64,
    mode: ScoreMode,
) -> Vec<usize> {
    let xlen = table[query].len();
    let mol_x = table[query].mol_type();
    reprs
        .iter()
        .rev()
        .copied()
        .filter(|&r| !reject_pair(xlen, table[r].len(), mol_x, table[r].mol_type(), tm_cut, mode))
        .collect()
}

/// Lower bound a coarse HwRMSD score must clear to stay a candidate. Under
/// the by-shorter mode the corridor widens, more for nucleic acids whose
/// coarse alignments are noisier.
pub fn hwrmsd_lower_bound(mode: ScoreMode, tm_cut: f64, mol_sum: i32) -> f64 {
    if mode.flag() <= 1 {
        if mol_sum > 0 {
            0.02 * tm_cut
        } else {
            0.25 * tm_cut
        }
    } else {
        0.5 * tm_cut
    }
}

/// Lower bound below which a fast TM-align score is a definitive miss
/// (no refined rerun).
pub fn tmfast_lower_bound(mode: ScoreMode, tm_cut: f64, mol_sum: i32) -> f64 {
    if mode.flag() <= 1 {
        if mol_sum > 0 {
            0.60 * tm_cut
        } else {
            0.80 * tm_cut
        }
    } else {
        0.9 * tm_cut
    }
}

/// Upper bound above which a coarse or fast score is already decisive.
pub fn stage_upper_bound(tm_cut: f64) -> f64 {
    0.9 * tm_cut + 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecule_mismatch_always_rejects() {
        for mode in [ScoreMode::Larger, ScoreMode::Smaller, ScoreMode::Mean] {
            assert!(reject_pair(100, 100, -5, 5, 0.5, mode));
        }
    }

    #[test]
    fn larger_mode_never_rejects_on_length() {
        assert!(!reject_pair(6, 100_000, -1, -1, 0.99, ScoreMode::Larger));
    }

    #[test]
    fn smaller_mode_length_threshold() {
        // x < c*y rejects
        assert!(reject_pair(49, 100, -1, -1, 0.5, ScoreMode::Smaller));
        assert!(!reject_pair(50, 100, -1, -1, 0.5, ScoreMode::Smaller));
    }

    #[test]
    fn harmonic_mode_length_threshold() {
        // reject iff x*(2/c - 1) < y; c = 0.5 makes the factor 3
        assert!(reject_pair(33, 100, -1, -1, 0.5, ScoreMode::Harmonic));
        assert!(!reject_pair(34, 100, -1, -1, 0.5, ScoreMode::Harmonic));
    }

    #[test]
    fn rms_mode_length_threshold() {
        // c = 0.8: x^2 < 0.28 y^2  =>  x < 0.5292 y
        assert!(reject_pair(52, 100, -1, -1, 0.8, ScoreMode::RootMeanSquare));
        assert!(!reject_pair(53, 100, -1, -1, 0.8, ScoreMode::RootMeanSquare));
    }

    #[test]
    fn coarse_lower_bounds() {
        assert!((hwrmsd_lower_bound(ScoreMode::Larger, 0.5, 4) - 0.01).abs() < 1e-12);
        assert!((hwrmsd_lower_bound(ScoreMode::Larger, 0.5, -4) - 0.125).abs() < 1e-12);
        assert!((hwrmsd_lower_bound(ScoreMode::Smaller, 0.5, -4) - 0.25).abs() < 1e-12);
        assert!((hwrmsd_lower_bound(ScoreMode::Harmonic, 0.6, 4) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn fast_tier_bounds() {
        assert!((tmfast_lower_bound(ScoreMode::Larger, 0.5, 4) - 0.30).abs() < 1e-12);
        assert!((tmfast_lower_bound(ScoreMode::Larger, 0.5, -4) - 0.40).abs() < 1e-12);
        assert!((tmfast_lower_bound(ScoreMode::Smaller, 0.5, -4) - 0.45).abs() < 1e-12);
        assert!((stage_upper_bound(0.5) - 0.55).abs() < 1e-12);
    }
}
