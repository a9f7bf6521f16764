//! Optimal superposition of paired coordinate sets
//!
//! Closed-form Kabsch: eigendecomposition of the Gram matrix of the
//! cross-covariance via the characteristic cubic, with the reflection case
//! handled through the covariance determinant sign. Degenerate inputs
//! (fewer than three pairs, collinear sets) fall back to a pure translation.

const EPSILON: f64 = 1.0e-8;
const TOLERANCE: f64 = 0.01;
const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Packed upper-triangle index pairs for the symmetric 3x3 eigenproblem.
const TRI: [usize; 9] = [0, 1, 3, 1, 2, 4, 3, 4, 5];
const CYC: [usize; 4] = [1, 2, 0, 1];

/// Rigid-body transform `p ↦ rot·p + trans`.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub rot: [[f64; 3]; 3],
    pub trans: [f64; 3],
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            rot: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            trans: [0.0; 3],
        }
    }

    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let r = &self.rot;
        [
            r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2] + self.trans[0],
            r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2] + self.trans[1],
            r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2] + self.trans[2],
        ]
    }
}

/// Least-squares transform mapping `x[k]` onto `y[k]`.
pub fn kabsch(x: &[[f64; 3]], y: &[[f64; 3]]) -> Transform {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len().min(y.len());
    if n == 0 {
        return Transform::identity();
    }
    let nf = n as f64;

    let mut xc = [0.0; 3];
    let mut yc = [0.0; 3];
    for k in 0..n {
        for i in 0..3 {
            xc[i] += x[k][i];
            yc[i] += y[k][i];
        }
    }
    for i in 0..3 {
        xc[i] /= nf;
        yc[i] /= nf;
    }

    // cross-covariance: r[i][j] = sum_k (y_k[i] - yc[i]) (x_k[j] - xc[j])
    let mut r = [[0.0f64; 3]; 3];
    for k in 0..n {
        let dx = [x[k][0] - xc[0], x[k][1] - xc[1], x[k][2] - xc[2]];
        let dy = [y[k][0] - yc[0], y[k][1] - yc[1], y[k][2] - yc[2]];
        for i in 0..3 {
            for j in 0..3 {
                r[i][j] += dy[i] * dx[j];
            }
        }
    }

    let sigma = det3(&r);

    // Gram matrix rᵀr, packed upper triangle (00, 01, 11, 02, 12, 22)
    let mut rr = [0.0f64; 6];
    let mut m = 0;
    for j in 0..3 {
        for i in 0..=j {
            rr[m] = r[0][i] * r[0][j] + r[1][i] * r[1][j] + r[2][i] * r[2][j];
            m += 1;
        }
    }

    let spur = (rr[0] + rr[2] + rr[5]) / 3.0;
    let cof = (rr[2] * rr[5] - rr[4] * rr[4] + rr[0] * rr[5] - rr[3] * rr[3] + rr[0] * rr[2]
        - rr[1] * rr[1])
        / 3.0;
    let det = sigma * sigma;

    let mut rot = Transform::identity().rot;
    let mut e = [spur; 3];
    let mut ok = false;

    if spur > 0.0 {
        let d = spur * spur;
        let h = d - cof;
        let g = (spur * cof - det) / 2.0 - spur * h;
        if h > 0.0 {
            let sqrth = h.sqrt();
            let disc = (h * h * h - g * g).max(0.0);
            let angle = disc.sqrt().atan2(-g) / 3.0;
            let cth = sqrth * angle.cos();
            let sth = sqrth * SQRT3 * angle.sin();
            e[0] = spur + 2.0 * cth;
            e[1] = spur - cth + sth;
            e[2] = spur - cth - sth;

            if let Some(u) = assemble_rotation(&r, &rr, &e) {
                rot = u;
                ok = true;
            }
        }
    }
    if !ok && sigma < 0.0 {
        // reflection-only covariance with no usable eigenbasis: flip one axis
        rot[2][2] = -1.0;
    }

    let trans = [
        yc[0] - (rot[0][0] * xc[0] + rot[0][1] * xc[1] + rot[0][2] * xc[2]),
        yc[1] - (rot[1][0] * xc[0] + rot[1][1] * xc[1] + rot[1][2] * xc[2]),
        yc[2] - (rot[2][0] * xc[0] + rot[2][1] * xc[1] + rot[2][2] * xc[2]),
    ];
    Transform { rot, trans }
}

fn det3(r: &[[f64; 3]; 3]) -> f64 {
    r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
        - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
        + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0])
}

/// Build the rotation from the Gram-matrix eigenvalues: eigenvectors for the
/// extreme eigenvalues, middle column orthogonalised, image basis under `r`,
/// rotation = image · basisᵀ. Returns `None` when the geometry is too
/// degenerate for a stable basis.
fn assemble_rotation(r: &[[f64; 3]; 3], rr: &[f64; 6], e: &[f64; 3]) -> Option<[[f64; 3]; 3]> {
    let mut a = [[0.0f64; 3]; 3];
    let mut ss = [0.0f64; 6];

    for &l in &[0usize, 2usize] {
        let d = e[l];
        ss[0] = (d - rr[2]) * (d - rr[5]) - rr[4] * rr[4];
        ss[1] = (d - rr[5]) * rr[1] + rr[3] * rr[4];
        ss[2] = (d - rr[0]) * (d - rr[5]) - rr[3] * rr[3];
        ss[3] = (d - rr[2]) * rr[3] + rr[1] * rr[4];
        ss[4] = (d - rr[0]) * rr[4] + rr[1] * rr[3];
        ss[5] = (d - rr[0]) * (d - rr[2]) - rr[1] * rr[1];
        for s in &mut ss {
            if s.abs() <= EPSILON {
                *s = 0.0;
            }
        }

        let j = if ss[0].abs() >= ss[2].abs() && ss[0].abs() >= ss[5].abs() {
            0
        } else if ss[2].abs() >= ss[5].abs() {
            1
        } else {
            2
        };
        let mut norm = 0.0;
        for i in 0..3 {
            a[i][l] = ss[TRI[3 * j + i]];
            norm += a[i][l] * a[i][l];
        }
        let norm = if norm > EPSILON { 1.0 / norm.sqrt() } else { 0.0 };
        for i in 0..3 {
            a[i][l] *= norm;
        }
    }

    // orthogonalise: the column for the better-separated eigenvalue stays
    let dot = a[0][0] * a[0][2] + a[1][0] * a[1][2] + a[2][0] * a[2][2];
    let (m1, m0) = if e[0] - e[1] > e[1] - e[2] { (2, 0) } else { (0, 2) };
    let mut p = 0.0;
    for i in 0..3 {
        a[i][m1] -= dot * a[i][m0];
        p += a[i][m1] * a[i][m1];
    }
    if p <= TOLERANCE {
        let mut j = 0;
        p = 1.0;
        for i in 0..3 {
            if p < a[i][m0].abs() {
                p = a[i][m0].abs();
                j = i;
            }
        }
        let k = CYC[j];
        let l = CYC[j + 1];
        p = (a[k][m0] * a[k][m0] + a[l][m0] * a[l][m0]).sqrt();
        if p <= TOLERANCE {
            return None;
        }
        a[j][m1] = 0.0;
        a[k][m1] = -a[l][m0] / p;
        a[l][m1] = a[k][m0] / p;
    } else {
        let p = 1.0 / p.sqrt();
        for i in 0..3 {
            a[i][m1] *= p;
        }
    }
    a[0][1] = a[1][2] * a[2][0] - a[1][0] * a[2][2];
    a[1][1] = a[2][2] * a[0][0] - a[2][0] * a[0][2];
    a[2][1] = a[0][2] * a[1][0] - a[0][0] * a[1][2];

    // image of the basis under the covariance
    let mut b = [[0.0f64; 3]; 3];
    for l in 0..2 {
        let mut norm = 0.0;
        for i in 0..3 {
            b[i][l] = r[i][0] * a[0][l] + r[i][1] * a[1][l] + r[i][2] * a[2][l];
            norm += b[i][l] * b[i][l];
        }
        let norm = if norm > EPSILON { 1.0 / norm.sqrt() } else { 0.0 };
        for i in 0..3 {
            b[i][l] *= norm;
        }
    }
    let dot = b[0][0] * b[0][1] + b[1][0] * b[1][1] + b[2][0] * b[2][1];
    let mut p = 0.0;
    for i in 0..3 {
        b[i][1] -= dot * b[i][0];
        p += b[i][1] * b[i][1];
    }
    if p <= TOLERANCE {
        let mut j = 0;
        p = 1.0;
        for i in 0..3 {
            if p < b[i][0].abs() {
                p = b[i][0].abs();
                j = i;
            }
        }
        let k = CYC[j];
        let l = CYC[j + 1];
        p = (b[k][0] * b[k][0] + b[l][0] * b[l][0]).sqrt();
        if p <= TOLERANCE {
            return None;
        }
        b[j][1] = 0.0;
        b[k][1] = -b[l][0] / p;
        b[l][1] = b[k][0] / p;
    } else {
        let p = 1.0 / p.sqrt();
        for i in 0..3 {
            b[i][1] *= p;
        }
    }
    b[0][2] = b[1][0] * b[2][1] - b[1][1] * b[2][0];
    b[1][2] = b[2][0] * b[0][1] - b[2][1] * b[0][0];
    b[2][2] = b[0][0] * b[1][1] - b[0][1] * b[1][0];

    let mut u = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            u[i][j] = b[i][0] * a[j][0] + b[i][1] * a[j][1] + b[i][2] * a[j][2];
        }
    }
    Some(u)
}
