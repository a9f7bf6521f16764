//! Secondary-structure assignment from representative-atom geometry
//!
//! Proteins use the classic Cα-distance rules over the five-residue window
//! centred on each position; nucleic acids get a paired/unpaired call from
//! cross-strand C3'-C3' spacing. Both feed the aligners' seed stage only, so
//! coarse codes are enough.

use super::tmscore::dist2;

pub const HELIX: u8 = b'H';
pub const STRAND: u8 = b'E';
pub const TURN: u8 = b'T';
pub const COIL: u8 = b'C';
pub const PAIRED: u8 = b'P';

/// Dispatch on the chain's molecule tally (positive = nucleic acid).
pub fn assign(xyz: &[[f64; 3]], mol_type: i32) -> Vec<u8> {
    if mol_type > 0 {
        assign_nucleic(xyz)
    } else {
        assign_protein(xyz)
    }
}

/// Helix/strand/turn/coil from the six pairwise Cα distances among
/// {i-2, i-1, i, i+1, i+2}. Window ends are coil.
pub fn assign_protein(xyz: &[[f64; 3]]) -> Vec<u8> {
    let n = xyz.len();
    let mut sec = vec![COIL; n];
    if n < 5 {
        return sec;
    }
    for i in 2..n - 2 {
        let d13 = dist(xyz[i - 2], xyz[i]);
        let d14 = dist(xyz[i - 2], xyz[i + 1]);
        let d15 = dist(xyz[i - 2], xyz[i + 2]);
        let d24 = dist(xyz[i - 1], xyz[i + 1]);
        let d25 = dist(xyz[i - 1], xyz[i + 2]);
        let d35 = dist(xyz[i], xyz[i + 2]);
        sec[i] = window_code(d13, d14, d15, d24, d25, d35);
    }
    sec
}

fn window_code(d13: f64, d14: f64, d15: f64, d24: f64, d25: f64, d35: f64) -> u8 {
    let delta = 2.1;
    if (d15 - 6.37).abs() < delta
        && (d14 - 5.18).abs() < delta
        && (d25 - 5.18).abs() < delta
        && (d13 - 5.45).abs() < delta
        && (d24 - 5.45).abs() < delta
        && (d35 - 5.45).abs() < delta
    {
        return HELIX;
    }
    let delta = 1.42;
    if (d15 - 13.0).abs() < delta
        && (d14 - 10.4).abs() < delta
        && (d25 - 10.4).abs() < delta
        && (d13 - 6.1).abs() < delta
        && (d24 - 6.1).abs() < delta
        && (d35 - 6.1).abs() < delta
    {
        return STRAND;
    }
    if d15 < 8.0 {
        return TURN;
    }
    COIL
}

/// Paired/unpaired for nucleic acids: a residue is paired when some partner
/// at sequence separation >= 4 sits at canonical cross-strand C3' spacing
/// (A-form helices put paired C3' atoms near 18.2 A apart).
pub fn assign_nucleic(xyz: &[[f64; 3]]) -> Vec<u8> {
    const LO: f64 = 17.0 * 17.0;
    const HI: f64 = 19.5 * 19.5;
    let n = xyz.len();
    let mut sec = vec![COIL; n];
    for i in 0..n {
        for j in i + 4..n {
            let d2 = dist2(xyz[i], xyz[j]);
            if d2 > LO && d2 < HI {
                sec[i] = PAIRED;
                sec[j] = PAIRED;
                break;
            }
        }
    }
    sec
}

#[inline]
fn dist(a: [f64; 3], b: [f64; 3]) -> f64 {
    dist2(a, b).sqrt()
}
