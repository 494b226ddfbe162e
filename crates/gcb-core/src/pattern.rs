// crates/gcb-core/src/pattern.rs
//
// The 5-symbol pattern alphabet and its distance metric (spec section 3 data
// model, re-architected per the dense-matrix guidance in the redesign notes).

use crate::error::{GcbError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatChar {
    /// '-': both LEDs of the pair read off.
    Off,
    /// '0': positive LED off, complement LED on.
    Zero,
    /// '1': positive LED on, complement LED off.
    One,
    /// 'X': both LEDs read on (straddled transition).
    Both,
    /// '?': one or both readings missing.
    Unknown,
}

impl PatChar {
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '-' => Ok(PatChar::Off),
            '0' => Ok(PatChar::Zero),
            '1' => Ok(PatChar::One),
            'X' => Ok(PatChar::Both),
            '?' => Ok(PatChar::Unknown),
            _ => Err(GcbError::Validation(format!(
                "not a pattern character: {c:?}"
            ))),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PatChar::Off => '-',
            PatChar::Zero => '0',
            PatChar::One => '1',
            PatChar::Both => 'X',
            PatChar::Unknown => '?',
        }
    }

    fn ordinal(self) -> usize {
        match self {
            PatChar::Off => 0,
            PatChar::Zero => 1,
            PatChar::One => 2,
            PatChar::Both => 3,
            PatChar::Unknown => 4,
        }
    }
}

/// Per-character agreement score, indexed by (PatChar::ordinal, PatChar::ordinal).
/// '?' always scores 0 against anything, including itself: an unknown never
/// contributes evidence either way.
#[rustfmt::skip]
const PDIS_TBL: [[i32; 5]; 5] = [
    //  -    0    1    X    ?
    [  4,   2,   2,  -4,   0 ], // -
    [  2,   4,  -4,   2,   0 ], // 0
    [  2,  -4,   4,   2,   0 ], // 1
    [ -4,   2,   2,   4,   0 ], // X
    [  0,   0,   0,   0,   0 ], // ?
];

/// Normalized distance between two equal-length patterns, in [-1.0, 1.0].
/// A pattern compared against itself scores 1.0 for every non-'?' position.
pub fn pattern_distance(a: &str, b: &str) -> Result<f64> {
    let ac: Vec<char> = a.chars().collect();
    let bc: Vec<char> = b.chars().collect();
    if ac.is_empty() || ac.len() != bc.len() {
        return Err(GcbError::ShapeMismatch(format!(
            "pattern length mismatch: {} vs {}",
            ac.len(),
            bc.len()
        )));
    }

    let mut sum = 0i64;
    for (&x, &y) in ac.iter().zip(bc.iter()) {
        let px = PatChar::from_char(x)?;
        let py = PatChar::from_char(y)?;
        sum += PDIS_TBL[px.ordinal()][py.ordinal()] as i64;
    }
    Ok(sum as f64 / (ac.len() as f64 * 4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_one() {
        assert_eq!(pattern_distance("10X-", "10X-").unwrap(), 1.0);
    }

    #[test]
    fn full_disagreement_is_negative_one() {
        assert_eq!(pattern_distance("10X-", "01-X").unwrap(), -1.0);
    }

    #[test]
    fn unknowns_drag_toward_zero() {
        assert_eq!(pattern_distance("1???", "1???").unwrap(), 0.25);
    }

    #[test]
    fn symmetric() {
        assert_eq!(
            pattern_distance("10X-0", "01-X1").unwrap(),
            pattern_distance("01-X1", "10X-0").unwrap()
        );
    }

    #[test]
    fn length_mismatch_errors() {
        assert!(pattern_distance("10", "100").is_err());
    }
}
