//! Cluster partition state and output
//!
//! The partition owns three coupled structures: the membership vector
//! (chain id -> cluster index), the representative list (cluster index ->
//! chain id, in creation order), and the reverse index for chains that are
//! representatives. They move together through the two mutating operations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::structure::ChainRecord;

#[derive(Debug, Clone, Default)]
pub struct Partition {
    membership: Vec<Option<usize>>,
    representatives: Vec<usize>,
    repr_index: FxHashMap<usize, usize>,
}

impl Partition {
    pub fn new(n_chains: usize) -> Self {
        Self {
            membership: vec![None; n_chains],
            representatives: Vec::new(),
            repr_index: FxHashMap::default(),
        }
    }

    /// Open a new cluster with `chain` as its representative and sole member.
    pub fn add_representative(&mut self, chain: usize) {
        let cluster = self.representatives.len();
        self.membership[chain] = Some(cluster);
        self.repr_index.insert(chain, cluster);
        self.representatives.push(chain);
    }

    /// Record `chain` as a member of an existing cluster.
    pub fn assign(&mut self, chain: usize, cluster: usize) {
        debug_assert!(cluster < self.representatives.len());
        self.membership[chain] = Some(cluster);
    }

    /// Representatives in creation order; position = cluster index.
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Chain id -> cluster index, defined only for representatives.
    pub fn repr_index(&self) -> &FxHashMap<usize, usize> {
        &self.repr_index
    }

    pub fn membership_of(&self, chain: usize) -> Option<usize> {
        self.membership.get(chain).copied().flatten()
    }

    pub fn cluster_count(&self) -> usize {
        self.representatives.len()
    }

    pub fn n_chains(&self) -> usize {
        self.membership.len()
    }
}

/// Render the partition: one cluster per line, representative label first,
/// members by ascending chain id, tab-separated.
pub fn render_clusters(partition: &Partition, table: &[ChainRecord]) -> String {
    let mut out = String::new();
    for (cluster, &rep) in partition.representatives().iter().enumerate() {
        out.push_str(table[rep].label());
        for chain in 0..partition.n_chains() {
            if chain != rep && partition.membership_of(chain) == Some(cluster) {
                out.push('\t');
                out.push_str(table[chain].label());
            }
        }
        out.push('\n');
    }
    out
}

/// Write the rendered partition to `path`, with `None` or `-` meaning
/// stdout.
pub fn write_clusters(
    partition: &Partition,
    table: &[ChainRecord],
    path: Option<&Path>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = match path {
        Some(p) if p.as_os_str() != "-" => Box::new(BufWriter::new(File::create(p)?)),
        _ => Box::new(BufWriter::new(stdout.lock())),
    };
    writer.write_all(render_clusters(partition, table).as_bytes())?;
    writer.flush()?;
    Ok(())
}
