//! Coarse candidate ranking (HwRMSD stage)
//!
//! Screens the pruned representative list with the cheap aligner, keeps the
//! promising entries, biases hinted ones to the front, and truncates to a
//! length-dependent cap so the expensive confirmation stage sees a short,
//! well-ordered list.

use rustc_hash::FxHashSet;

use super::constants::{FAST_LB, FAST_UB, HWRMSD_GLOCAL, HWRMSD_ITER, MAX_REPR, MIN_REPR};
use super::engine::ClusterParams;
use super::filter::{hwrmsd_lower_bound, stage_upper_bound};
use crate::align::hwrmsd;
use crate::structure::ChainRecord;

/// Score added to hinted entries so they sort above every unhinted one.
const HINT_BOOST: f64 = 1.0;

/// Rank `candidates` (pruned, newest first) for `query`. Returns the
/// representative ids the confirmer should try, best first.
pub fn rank_candidates(
    query: usize,
    candidates: &[usize],
    table: &[ChainRecord],
    params: &ClusterParams,
    hint: Option<&FxHashSet<String>>,
) -> Vec<usize> {
    let Some(xview) = table[query].view() else {
        return Vec::new();
    };
    let xlen = table[query].len();
    let mol_x = table[query].mol_type();
    let ub = stage_upper_bound(params.tm_cut);

    let mut kept: Vec<(f64, usize)> = Vec::new();
    let mut hinted_seen = 0usize;

    for &rep in candidates {
        // once the hint set is covered, stop spending HwRMSD calls on
        // unhinted entries
        if let Some(set) = hint {
            if hinted_seen >= 2
                && kept.len() >= set.len()
                && !set.contains(table[rep].label())
            {
                continue;
            }
        }
        let Some(yview) = table[rep].view() else {
            continue;
        };
        let ylen = table[rep].len();
        let mol_sum = mol_x + table[rep].mol_type();
        let lb = hwrmsd_lower_bound(params.mode, params.tm_cut, mol_sum);

        let scores = hwrmsd(
            xview,
            yview,
            params.mode.norm_flag(),
            mol_sum,
            HWRMSD_GLOCAL,
            HWRMSD_ITER,
        );
        let tm = params.mode.combine(scores.tm1, scores.tm2);
        if !tm.is_finite() {
            continue;
        }

        let l_ave = ((xlen * ylen) as f64).sqrt();
        let hinted = hint.map_or(false, |set| set.contains(table[rep].label()));
        if hinted {
            kept.push((tm + HINT_BOOST, rep));
            hinted_seen += 1;
            if let Some(set) = hint {
                if hinted_seen == set.len() {
                    break;
                }
            }
        } else if tm >= lb || l_ave <= FAST_LB {
            kept.push((tm, rep));
        }

        // a score this high survives refined confirmation essentially always
        if tm >= ub {
            break;
        }
    }

    kept.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let cap = retention_cap(xlen);
    let mut ranked = Vec::new();
    for &(tm, rep) in &kept {
        let l_ave = ((xlen * table[rep].len()) as f64).sqrt();
        if l_ave > FAST_LB && tm < 0.5 * params.tm_cut && ranked.len() >= cap {
            break;
        }
        eprintln!("#{}\t{}\t{:.4}", rep, table[rep].label(), tm);
        ranked.push(rep);
    }
    eprintln!("{} out of {} entries", ranked.len(), kept.len());
    ranked
}

/// How many ranked entries to retain: generous for short queries (cheap to
/// confirm, coarse scores less reliable), tight for long ones.
pub fn retention_cap(xlen: usize) -> usize {
    let x = xlen as f64;
    if x <= FAST_LB {
        MAX_REPR
    } else if x >= FAST_UB {
        MIN_REPR
    } else {
        MIN_REPR + ((FAST_UB - x) / (FAST_UB - FAST_LB) * (MAX_REPR - MIN_REPR) as f64) as usize
    }
}
