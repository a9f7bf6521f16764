//! Parallel two-tier confirmation (TM-align stage)
//!
//! The ranked candidates are dealt round-robin to `W` workers. Each worker
//! runs the fast-then-refined tier protocol per candidate and races to seal
//! the first hit; the others observe the shared flag and stand down at their
//! next candidate boundary. When several candidates would qualify, whichever
//! worker seals first wins; downstream clusters inherit that choice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rustc_hash::FxHashMap;

use super::constants::FAST_UB;
use super::engine::ClusterParams;
use super::filter::{stage_upper_bound, tmfast_lower_bound};
use crate::align::tmalign;
use crate::structure::{ChainRecord, ChainView};

/// Decision after the first (possibly fast) TM-align pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierOutcome {
    Hit,
    Miss,
    Refine,
}

/// First-tier decision. A score at or above the upper bound is decisive; so
/// is clearing the cutoff when the fast result is already the final quality.
/// Below the lower bound, refinement cannot close the gap.
pub fn fast_tier_outcome(tm: f64, tm_cut: f64, ub: f64, lb: f64, used_fast: bool) -> TierOutcome {
    if !tm.is_finite() {
        return TierOutcome::Miss;
    }
    if tm >= ub || (tm >= tm_cut && used_fast) {
        TierOutcome::Hit
    } else if tm < lb {
        TierOutcome::Miss
    } else {
        TierOutcome::Refine
    }
}

/// Run the confirmation fan-out. Returns the cluster index of the sealed hit,
/// or `None` when every candidate missed.
pub fn confirm(
    query: usize,
    candidates: &[usize],
    table: &[ChainRecord],
    repr_index: &FxHashMap<usize, usize>,
    params: &ClusterParams,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let Some(xview) = table[query].view() else {
        return None;
    };

    let workers = params.workers.max(1);
    let mut chunks: Vec<Vec<usize>> = vec![Vec::new(); workers];
    for (k, &rep) in candidates.iter().enumerate() {
        chunks[k % workers].push(rep);
    }

    let found = AtomicBool::new(false);
    let seal: Mutex<Option<usize>> = Mutex::new(None);

    {
        let found = &found;
        let seal = &seal;
        rayon::scope(|scope| {
            for chunk in &chunks {
                if chunk.is_empty() {
                    continue;
                }
                scope.spawn(move |_| {
                    confirm_worker(query, xview, chunk, table, repr_index, params, found, seal);
                });
            }
        });
    }

    // scope re-raises worker panics, so the lock cannot be poisoned here
    seal.into_inner().unwrap_or(None)
}

#[allow(clippy::too_many_arguments)]
fn confirm_worker(
    query: usize,
    xview: ChainView<'_>,
    chunk: &[usize],
    table: &[ChainRecord],
    repr_index: &FxHashMap<usize, usize>,
    params: &ClusterParams,
    found: &AtomicBool,
    seal: &Mutex<Option<usize>>,
) {
    let xlen = table[query].len();
    let mol_x = table[query].mol_type();
    let ub = stage_upper_bound(params.tm_cut);
    let norm = params.mode.norm_flag();

    for &rep in chunk {
        if found.load(Ordering::Relaxed) {
            return;
        }
        let Some(yview) = table[rep].view() else {
            continue;
        };
        let ylen = table[rep].len();
        let mol_sum = mol_x + table[rep].mol_type();
        let lb = tmfast_lower_bound(params.mode, params.tm_cut, mol_sum);

        let l_ave = ((xlen * ylen) as f64).sqrt();
        let use_fast = params.fast || l_ave >= FAST_UB;

        let scores = tmalign(xview, yview, norm, use_fast, mol_sum, params.tm_cut);
        let tm = params.mode.combine(scores.tm1, scores.tm2);

        match fast_tier_outcome(tm, params.tm_cut, ub, lb, use_fast) {
            TierOutcome::Hit => {
                seal_hit(rep, repr_index, found, seal);
                return;
            }
            TierOutcome::Miss => continue,
            TierOutcome::Refine => {
                let scores = tmalign(xview, yview, norm, false, mol_sum, params.tm_cut);
                let tm = params.mode.combine(scores.tm1, scores.tm2);
                if tm.is_finite() && tm >= params.tm_cut {
                    seal_hit(rep, repr_index, found, seal);
                    return;
                }
            }
        }
    }
}

/// First worker through the mutex wins; later hits are discarded.
fn seal_hit(
    rep: usize,
    repr_index: &FxHashMap<usize, usize>,
    found: &AtomicBool,
    seal: &Mutex<Option<usize>>,
) {
    let mut guard = seal.lock().unwrap();
    if guard.is_none() {
        *guard = Some(repr_index[&rep]);
        found.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisive_scores_hit_without_refinement() {
        assert_eq!(
            fast_tier_outcome(0.56, 0.5, 0.55, 0.45, false),
            TierOutcome::Hit
        );
        assert_eq!(
            fast_tier_outcome(0.51, 0.5, 0.55, 0.45, true),
            TierOutcome::Hit
        );
    }

    #[test]
    fn mid_corridor_scores_get_refined() {
        // fast result between the bounds: a refined pass decides
        assert_eq!(
            fast_tier_outcome(0.46, 0.5, 0.55, 0.45, false),
            TierOutcome::Refine
        );
        // clearing the cutoff without fast mode still refines below ub
        assert_eq!(
            fast_tier_outcome(0.51, 0.5, 0.55, 0.45, false),
            TierOutcome::Refine
        );
    }

    #[test]
    fn low_scores_miss_outright() {
        assert_eq!(
            fast_tier_outcome(0.44, 0.5, 0.55, 0.45, false),
            TierOutcome::Miss
        );
        assert_eq!(
            fast_tier_outcome(f64::NAN, 0.5, 0.55, 0.45, true),
            TierOutcome::Miss
        );
    }
}
