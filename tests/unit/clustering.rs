//! End-to-end clustering runs on synthetic chains

use tmclust::cluster::cluster_chains;
use tmclust::cluster::hints::HintMap;
use tmclust::common::render_clusters;

use super::helpers::{helix_chain, params, protein_chain, rna_chain, walk_chain};

#[test]
fn short_chains_form_singleton_clusters() {
    let mut table = vec![
        helix_chain("len4", 4),
        helix_chain("len5", 5),
        helix_chain("len6", 6),
    ];
    let partition = cluster_chains(&mut table, &params(0.5, 2, 1), &HintMap::default());
    assert_eq!(partition.cluster_count(), 3);
    for chain in 0..3 {
        let cluster = partition.membership_of(chain).unwrap();
        assert_eq!(partition.representatives()[cluster], chain);
    }
}

#[test]
fn duplicated_chains_collapse_to_one_cluster() {
    let mut table = vec![
        helix_chain("copy0", 30),
        helix_chain("copy1", 30),
        helix_chain("copy2", 30),
    ];
    let partition = cluster_chains(&mut table, &params(0.5, 2, 1), &HintMap::default());
    assert_eq!(partition.cluster_count(), 1);
    // stable tie-break: the first parsed copy is the representative
    assert_eq!(partition.representatives(), &[0]);
    assert_eq!(render_clusters(&partition, &table), "copy0\tcopy1\tcopy2\n");
}

#[test]
fn protein_and_nucleic_chains_never_mix() {
    let mut table = vec![helix_chain("prot", 20), rna_chain("rna", 20)];
    let partition = cluster_chains(&mut table, &params(0.5, 2, 1), &HintMap::default());
    assert_eq!(partition.cluster_count(), 2);
}

#[test]
fn single_worker_runs_are_deterministic() {
    let build = || {
        vec![
            helix_chain("h0", 40),
            walk_chain("w0", 35, 7),
            helix_chain("h1", 40),
            walk_chain("w1", 30, 99),
            helix_chain("h2", 38),
            helix_chain("tiny", 4),
        ]
    };
    let p = params(0.5, 2, 1);
    let mut a = build();
    let mut b = build();
    let out_a = render_clusters(&cluster_chains(&mut a, &p, &HintMap::default()), &a);
    let out_b = render_clusters(&cluster_chains(&mut b, &p, &HintMap::default()), &b);
    assert_eq!(out_a, out_b);
}

#[test]
fn perturbed_copy_joins_its_template() {
    // jitter well under the d0 scale keeps the combined TM high
    let base = super::helpers::helix_coords(36);
    let mut jittered = base.clone();
    for (i, p) in jittered.iter_mut().enumerate() {
        p[0] += 0.25 * if i % 2 == 0 { 1.0 } else { -1.0 };
        p[1] -= 0.2 * if i % 3 == 0 { 1.0 } else { -0.5 };
    }
    let mut table = vec![
        protein_chain("template", base),
        protein_chain("jittered", jittered),
    ];
    let partition = cluster_chains(&mut table, &params(0.5, 2, 1), &HintMap::default());
    assert_eq!(partition.cluster_count(), 1);
}

#[test]
fn full_run_invariants_hold() {
    let mut table = vec![
        helix_chain("h0", 44),
        walk_chain("w0", 40, 3),
        helix_chain("h1", 44),
        helix_chain("tiny", 5),
        walk_chain("w1", 25, 11),
        helix_chain("h2", 40),
    ];
    let n = table.len();
    let partition = cluster_chains(&mut table, &params(0.5, 2, 2), &HintMap::default());

    // every chain has exactly one membership entry
    for chain in 0..n {
        assert!(partition.membership_of(chain).is_some());
    }
    // the representative of cluster k is a member of cluster k
    for (cluster, &rep) in partition.representatives().iter().enumerate() {
        assert_eq!(partition.membership_of(rep), Some(cluster));
        assert_eq!(partition.repr_index()[&rep], cluster);
    }
    // chains at or below the alignment minimum are their own representatives
    for chain in 0..n {
        if table[chain].len() <= 5 {
            let cluster = partition.membership_of(chain).unwrap();
            assert_eq!(partition.representatives()[cluster], chain);
        }
    }
    // representatives keep their buffers, absorbed members are released
    for chain in 0..n {
        let is_rep = partition.repr_index().contains_key(&chain);
        assert_eq!(table[chain].data().is_some(), is_rep);
    }
}
