//! Cross-component laws: the pruner may only reject pairs the combiner could
//! never score at the cutoff

use tmclust::cluster::filter::reject_pair;
use tmclust::cluster::ScoreMode;

const MODES: [ScoreMode; 6] = [
    ScoreMode::Larger,
    ScoreMode::Smaller,
    ScoreMode::Mean,
    ScoreMode::Harmonic,
    ScoreMode::Geometric,
    ScoreMode::RootMeanSquare,
];

/// With a shared distance scale, the two normalised scores of one alignment
/// obey TM1 = TM2 * x / y (the same pair sum divided by each length).
#[test]
fn rejected_pairs_cannot_reach_the_cutoff() {
    for mode in MODES {
        for &tm_cut in &[0.45, 0.5, 0.7, 0.9] {
            for xlen in (6..=120).step_by(3) {
                for ylen in (xlen..=240).step_by(7) {
                    if !reject_pair(xlen, ylen, -1, -1, tm_cut, mode) {
                        continue;
                    }
                    let ratio = xlen as f64 / ylen as f64;
                    for k in 0..=20 {
                        let tm2 = k as f64 / 20.0;
                        let tm1 = tm2 * ratio;
                        let combined = mode.combine(tm1, tm2);
                        assert!(
                            combined < tm_cut,
                            "{mode:?} c={tm_cut} x={xlen} y={ylen} tm2={tm2}: {combined}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn molecule_mismatch_rejection_is_unconditional() {
    for mode in MODES {
        assert!(reject_pair(100, 100, -3, 3, 0.45, mode));
        assert!(!reject_pair(100, 100, -3, -3, 0.45, ScoreMode::Larger));
    }
}
