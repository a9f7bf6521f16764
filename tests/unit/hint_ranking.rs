//! Tentative-hint influence on candidate ranking

use tmclust::cluster::hints::parse_hints;
use tmclust::cluster::ranker::rank_candidates;

use super::helpers::{helix_chain, params, walk_chain};

#[test]
fn hinted_candidates_survive_below_the_coarse_bound() {
    // long dissimilar candidates: nothing clears lb_HwRMSD naturally and the
    // chains are too long for the short-chain bypass
    let table = vec![
        helix_chain("query", 200),
        walk_chain("c0", 205, 41),
        walk_chain("c1", 205, 42),
        walk_chain("c2", 205, 43),
        walk_chain("c3", 205, 44),
        walk_chain("c4", 205, 45),
    ];
    let hints = parse_hints("query\tc1\tc3\n");
    let p = params(0.5, 2, 1);

    let ranked = rank_candidates(0, &[1, 2, 3, 4, 5], &table, &p, hints.get("query"));
    let mut labels: Vec<&str> = ranked.iter().map(|&r| table[r].label()).collect();
    labels.sort_unstable();
    assert_eq!(labels, vec!["c1", "c3"]);
}

#[test]
fn unhinted_ranking_keeps_similar_candidates_first() {
    let table = vec![
        helix_chain("query", 60),
        walk_chain("junk", 62, 17),
        helix_chain("twin", 60),
    ];
    let p = params(0.5, 2, 1);
    let ranked = rank_candidates(0, &[1, 2], &table, &p, None);
    assert_eq!(ranked.first(), Some(&2));
}

#[test]
fn hints_do_not_override_thresholding() {
    // a hinted candidate is ranked, but ranking feeds confirmation; a junk
    // hint must still fail the TM threshold there
    let table = vec![helix_chain("query", 200), walk_chain("c0", 205, 41)];
    let hints = parse_hints("query\tc0\tother\n");
    let p = params(0.5, 2, 1);

    let ranked = rank_candidates(0, &[1], &table, &p, hints.get("query"));
    assert_eq!(ranked, vec![1]);

    let mut partition = tmclust::common::Partition::new(2);
    partition.add_representative(1);
    let outcome =
        tmclust::cluster::confirm::confirm(0, &ranked, &table, partition.repr_index(), &p);
    assert_eq!(outcome, None);
}
