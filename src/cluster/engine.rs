//! Clustering driver
//!
//! Chains are processed in stable length-descending order. The longest chain
//! seeds cluster 0; every later chain is pruned, coarse-ranked and confirmed
//! against the existing representatives, joining the first cluster that
//! accepts it or seeding a new one. Only one confirmation fan-out is live at
//! a time: the representative set a chain sees depends on every earlier
//! decision.

use std::cmp::Reverse;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use super::args::ClusterArgs;
use super::confirm::confirm;
use super::constants::MIN_ALIGN_LEN;
use super::filter::prune_candidates;
use super::hints::{read_hints, HintMap};
use super::ranker::rank_candidates;
use super::score::ScoreMode;
use crate::common::{write_clusters, Partition};
use crate::structure::reader::{collect_chain_files, load_chains};
use crate::structure::ChainRecord;

/// Engine parameters, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct ClusterParams {
    pub tm_cut: f64,
    pub mode: ScoreMode,
    pub fast: bool,
    pub workers: usize,
}

/// CLI entry: parse structures, cluster, write the partition.
pub fn run(args: ClusterArgs) -> Result<()> {
    args.validate()?;
    let t0 = Instant::now();

    let workers = match args.threads {
        Some(n) => n,
        None => num_cpus::get(),
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .context("failed to build thread pool")?;

    let params = ClusterParams {
        tm_cut: args.tm_cut,
        mode: ScoreMode::from_flag(args.score_mode).context("score mode already validated")?,
        fast: args.fast,
        workers,
    };
    let hints = match &args.init {
        Some(path) => read_hints(path)?,
        None => HintMap::default(),
    };

    eprintln!("Starting read structure files.");
    let files = collect_chain_files(&args.input, args.dir.as_deref(), &args.suffix)?;
    let mut table = load_chains(&files, &args.parse_options(), args.infmt, args.mol_override())?;
    if table.is_empty() {
        bail!("no chains parsed from input");
    }

    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by_key(|&i| Reverse(table[i].len()));
    eprintln!(
        "Clustering {} chains with TM-score cutoff >={}\nLongest chain {}\t{} residues.\nShortest chain {}\t{} residues.\nUsing {} threads for parallel computation.",
        table.len(),
        params.tm_cut,
        table[order[0]].label(),
        table[order[0]].len(),
        table[*order.last().context("non-empty order")?].label(),
        table[*order.last().context("non-empty order")?].len(),
        workers,
    );

    let partition = cluster_chains(&mut table, &params, &hints);
    write_clusters(&partition, &table, args.out.as_deref())?;
    eprintln!("#Total CPU time is {:5.2} seconds", t0.elapsed().as_secs_f32());
    Ok(())
}

/// Cluster a chain table. Non-representative chains have their heavy buffers
/// released as soon as their membership is recorded.
pub fn cluster_chains(
    table: &mut [ChainRecord],
    params: &ClusterParams,
    hints: &HintMap,
) -> Partition {
    let n = table.len();
    let mut partition = Partition::new(n);
    if n == 0 {
        return partition;
    }

    // stable sort: equal lengths keep their parse order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| Reverse(table[i].len()));

    partition.add_representative(order[0]);

    for (i, &query) in order.iter().enumerate().skip(1) {
        let xlen = table[query].len();
        if xlen <= MIN_ALIGN_LEN {
            partition.add_representative(query);
            continue;
        }

        let candidates =
            prune_candidates(query, table, partition.representatives(), params.tm_cut, params.mode);
        eprintln!(
            ">{}\t{}\t{:.2}%(#{})\t#repr={}/{}",
            table[query].label(),
            xlen,
            100.0 * i as f64 / n as f64,
            i,
            candidates.len(),
            partition.cluster_count(),
        );

        let hint = hints.get(table[query].label());
        let ranked = rank_candidates(query, &candidates, table, params, hint);

        match confirm(query, &ranked, table, partition.repr_index(), params) {
            Some(cluster) => {
                partition.assign(query, cluster);
                table[query].release();
            }
            None => partition.add_representative(query),
        }
    }

    partition
}
