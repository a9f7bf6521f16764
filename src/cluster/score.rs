//! Combining the two length-normalised TM-scores into one scalar
//!
//! `TM1` is normalised by the longer chain, `TM2` by the shorter. The mode
//! picks the reduction used for thresholding and also fixes the
//! normalisation flag handed to the aligners.

/// Reduction of `(TM1, TM2)` selected by `-s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// 1: the larger score (normalised by the shorter chain).
    Larger,
    /// 2: the smaller score (normalised by the longer chain).
    Smaller,
    /// 3: arithmetic mean.
    Mean,
    /// 4: harmonic mean.
    Harmonic,
    /// 5: geometric mean.
    Geometric,
    /// 6: root mean square.
    RootMeanSquare,
}

impl ScoreMode {
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            1 => Some(Self::Larger),
            2 => Some(Self::Smaller),
            3 => Some(Self::Mean),
            4 => Some(Self::Harmonic),
            5 => Some(Self::Geometric),
            6 => Some(Self::RootMeanSquare),
            _ => None,
        }
    }

    pub fn flag(self) -> i32 {
        match self {
            Self::Larger => 1,
            Self::Smaller => 2,
            Self::Mean => 3,
            Self::Harmonic => 4,
            Self::Geometric => 5,
            Self::RootMeanSquare => 6,
        }
    }

    /// Combined score used for thresholding. The harmonic mean takes its
    /// limit value 0 when either input is 0.
    pub fn combine(self, tm1: f64, tm2: f64) -> f64 {
        match self {
            Self::Larger => tm2,
            Self::Smaller => tm1,
            Self::Mean => (tm1 + tm2) / 2.0,
            Self::Harmonic => {
                if tm1 <= 0.0 || tm2 <= 0.0 {
                    0.0
                } else {
                    2.0 / (1.0 / tm1 + 1.0 / tm2)
                }
            }
            Self::Geometric => (tm1 * tm2).sqrt(),
            Self::RootMeanSquare => ((tm1 * tm1 + tm2 * tm2) / 2.0).sqrt(),
        }
    }

    /// Normalisation flag passed to the aligners: -2 = by longer, -1 = by
    /// shorter, 1 = by average, 0 = aligner default. The geometric mode
    /// normalises by the shorter chain.
    pub fn norm_flag(self) -> i32 {
        match self {
            Self::Smaller | Self::Harmonic => -2,
            Self::Larger | Self::Geometric => -1,
            Self::Mean => 1,
            Self::RootMeanSquare => 0,
        }
    }
}
