//! Greedy length-sorted structural clustering
//!
//! Pipeline per chain, longest first: length-ratio pruning against the
//! current representatives, coarse HwRMSD ranking, then parallel two-tier
//! TM-align confirmation. A hit joins the sealed cluster and frees the
//! chain's buffers; a miss promotes the chain to a new representative.

pub mod args;
pub mod confirm;
pub mod constants;
pub mod engine;
pub mod filter;
pub mod hints;
pub mod ranker;
pub mod score;

pub use args::ClusterArgs;
pub use engine::{cluster_chains, run, ClusterParams};
pub use score::ScoreMode;
