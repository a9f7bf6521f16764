//! Needleman-Wunsch over a precomputed similarity matrix
//!
//! Both aligners drive their iterations through this one routine: seeds score
//! residue identity (sequence or secondary structure), refinement rounds
//! score superposed inter-residue distances. Gaps carry a flat per-column
//! penalty; end gaps are free in global mode so fragments can slide along a
//! longer partner.

/// Dense row-major similarity matrix (`rows` = first chain, `cols` = second).
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from a closure over `(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = Self::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.data[i * cols + j] = f(i, j);
            }
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }
}

/// Alignment map: `map[i]` is the column matched to row `i`, or -1.
pub type AlignMap = Vec<i32>;

/// Indices of the matched pairs in an alignment map.
pub fn aligned_pairs(map: &[i32]) -> Vec<(usize, usize)> {
    map.iter()
        .enumerate()
        .filter_map(|(i, &j)| (j >= 0).then(|| (i, j as usize)))
        .collect()
}

const DIAG: u8 = 0;
const UP: u8 = 1;
const LEFT: u8 = 2;

/// Global alignment maximising `sum(score) + gap * gap_columns`.
///
/// `gap` is negative. With `penalize_ends` false, leading and trailing gaps
/// are free (semi-global). Ties prefer the diagonal so that an all-equal
/// matrix yields the identity alignment.
pub fn nw_align(score: &ScoreMatrix, gap: f64, penalize_ends: bool) -> AlignMap {
    let m = score.rows();
    let n = score.cols();
    let mut map = vec![-1i32; m];
    if m == 0 || n == 0 {
        return map;
    }

    let w = n + 1;
    let mut h = vec![0.0f64; (m + 1) * w];
    let mut dir = vec![DIAG; (m + 1) * w];
    let end_gap = if penalize_ends { gap } else { 0.0 };
    for j in 1..=n {
        h[j] = end_gap * j as f64;
        dir[j] = LEFT;
    }
    for i in 1..=m {
        h[i * w] = end_gap * i as f64;
        dir[i * w] = UP;
    }

    for i in 1..=m {
        for j in 1..=n {
            let diag = h[(i - 1) * w + (j - 1)] + score.get(i - 1, j - 1);
            let up_gap = if !penalize_ends && j == n { 0.0 } else { gap };
            let left_gap = if !penalize_ends && i == m { 0.0 } else { gap };
            let up = h[(i - 1) * w + j] + up_gap;
            let left = h[i * w + (j - 1)] + left_gap;
            let (best, d) = if diag >= up && diag >= left {
                (diag, DIAG)
            } else if up >= left {
                (up, UP)
            } else {
                (left, LEFT)
            };
            h[i * w + j] = best;
            dir[i * w + j] = d;
        }
    }

    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        match dir[i * w + j] {
            DIAG => {
                map[i - 1] = (j - 1) as i32;
                i -= 1;
                j -= 1;
            }
            UP => i -= 1,
            _ => j -= 1,
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matrix_gives_identity() {
        let s = ScoreMatrix::from_fn(4, 4, |_, _| 1.0);
        let map = nw_align(&s, -0.6, false);
        assert_eq!(map, vec![0, 1, 2, 3]);
    }

    #[test]
    fn shifted_diagonal_is_found() {
        // rows match cols shifted by +2
        let s = ScoreMatrix::from_fn(3, 6, |i, j| if j == i + 2 { 1.0 } else { 0.0 });
        let map = nw_align(&s, -0.6, false);
        assert_eq!(map, vec![2, 3, 4]);
    }

    #[test]
    fn internal_gap_is_opened_when_worth_it() {
        // rows 0,1 match cols 0,1; row 2 matches col 4
        let s = ScoreMatrix::from_fn(3, 5, |i, j| {
            if (i < 2 && j == i) || (i == 2 && j == 4) {
                1.0
            } else {
                0.0
            }
        });
        let map = nw_align(&s, -0.3, false);
        assert_eq!(map, vec![0, 1, 4]);
    }

    #[test]
    fn empty_inputs() {
        let s = ScoreMatrix::new(0, 5);
        assert!(nw_align(&s, -0.6, false).is_empty());
        let s = ScoreMatrix::new(3, 0);
        assert_eq!(nw_align(&s, -0.6, false), vec![-1, -1, -1]);
    }

    #[test]
    fn aligned_pairs_skips_gaps() {
        assert_eq!(aligned_pairs(&[0, -1, 3]), vec![(0, 0), (2, 3)]);
    }
}
