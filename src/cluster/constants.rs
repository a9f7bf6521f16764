//! Engine tuning constants

/// Chains at or below this length always form singleton clusters; the
/// aligners cannot produce a meaningful correspondence for them.
pub const MIN_ALIGN_LEN: usize = 5;

/// HwRMSD screening parameters. Most alignments converge well before ten
/// rounds; ten costs little next to even one fast TM-align.
pub const HWRMSD_ITER: usize = 10;
pub const HWRMSD_GLOCAL: i32 = 0;

/// Retention window for the ranked candidate list; the per-query cap
/// interpolates between these with query length.
pub const MIN_REPR: usize = 10;
pub const MAX_REPR: usize = 50;

/// Length knees: at or below `FAST_LB` (geometric-mean length) chains bypass
/// the coarse filter entirely; at or above `FAST_UB` the confirmer always
/// runs TM-align in fast mode.
pub const FAST_LB: f64 = 50.0;
pub const FAST_UB: f64 = 1000.0;
