//! Structural-alignment primitives
//!
//! Pure functions over borrowed chain views: optimal superposition (Kabsch),
//! TM-score machinery, Needleman-Wunsch over precomputed score matrices, the
//! refined/fast `tmalign` aligner, the coarse `hwrmsd` aligner, and
//! secondary-structure assignment. Same inputs always produce the same
//! outputs and all scratch is call-local, so the clustering engine may invoke
//! them concurrently on shared chain data.

pub mod hwrmsd;
pub mod kabsch;
pub mod nwdp;
pub mod secstr;
pub mod tmalign;
pub mod tmscore;

pub use hwrmsd::hwrmsd;
pub use tmalign::tmalign;

/// Scores of one pairwise structural alignment.
///
/// `tm1` is the TM-score normalised by the second chain's length, `tm2` by
/// the first chain's; in the clustering engine the second chain is the
/// representative and never shorter than the query, so `tm1` is the
/// longer-normalised score and `tm2` the shorter-normalised one.
#[derive(Debug, Clone, Copy)]
pub struct AlignScores {
    pub tm1: f64,
    pub tm2: f64,
    pub rmsd: f64,
    pub n_ali: usize,
}
