// crates/gcb-core/src/decode/analytical.rs
//
// C6: closed-form Gray-code decoder for CL patterns.
//
// Reads the PPS bit and the ten B9..B0 bits in order, tracking a window
// origin t0 and pulse width pw. A '0' bit reports the lower half of the
// current window without narrowing it further; a '1' bit reports the upper
// half, advances the origin into it, and halves pw for the next bit (the
// window only needs to get finer once we've actually moved into it). Any
// other character is a transition edge, localizing the exposure directly and
// ending the scan.

use crate::error::{GcbError, Result};
use crate::result::Section;

const INITIAL_PULSE_WIDTH_SEC: f64 = 0.512;
/// decode_cl reads indices 0..=10 only (PPS + B9..B0); longer inputs (e.g. a
/// CLID padded to the beacon's full LED count) are accepted and the tail
/// ignored.
const MIN_PATTERN_LEN: usize = 11;

/// Decodes a CL pattern (PPS at index 0, then B9..B0) plus an exposure time
/// (seconds) into [fromMs, durMs, accMs]. Accuracy equals duration: the
/// analytical decoder has no independent error estimate beyond the resolved
/// pulse width.
pub fn decode_cl(pattern: &str, exp_time_sec: f64) -> Result<Section> {
    let chars: Vec<char> = pattern.chars().collect();
    if chars.len() < MIN_PATTERN_LEN {
        return Err(GcbError::ShapeMismatch(format!(
            "CL pattern must have at least {MIN_PATTERN_LEN} characters (PPS + B9..B0), got {}",
            chars.len()
        )));
    }

    let mut pw = INITIAL_PULSE_WIDTH_SEC;
    let mut t0 = 0.0_f64;
    let mut last_idc = chars[0];

    let mut from_t = t0;
    let mut to_t = t0 + pw - exp_time_sec;

    for &idc in &chars[1..=10] {
        match idc {
            '0' => {
                from_t = t0;
                to_t = t0 + pw - exp_time_sec;
            }
            '1' => {
                from_t = t0 + pw;
                to_t = t0 + 2.0 * pw - exp_time_sec;
                t0 += pw;
                pw /= 2.0;
            }
            _ => {
                if last_idc == 'X' {
                    from_t = t0 + 2.0 * pw - exp_time_sec;
                    to_t = t0 + 2.0 * pw;
                } else {
                    from_t = t0 + pw - exp_time_sec;
                    to_t = t0 + pw;
                }
                last_idc = idc;
                break;
            }
        }
        last_idc = idc;
    }

    let dur_ms = (to_t - from_t) * 1000.0;
    let from_ms = from_t.rem_euclid(1.0) * 1000.0;

    Ok(Section {
        from_ms: round2(from_ms),
        dur_ms: round2(dur_ms),
        acc_ms: round2(dur_ms),
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_bits_use_first_window() {
        let pattern = "0".to_string() + &"0".repeat(10) + &"?".repeat(11);
        let section = decode_cl(&pattern, 0.01).unwrap();
        assert_eq!(section.from_ms, 0.0);
        assert_eq!(section.dur_ms, 502.0);
        assert_eq!(section.acc_ms, 502.0);
    }

    #[test]
    fn all_one_bits_walk_the_upper_half_every_step() {
        // PPS + ten '1' bits (B9..B0 all set), exp_time = 0.01 s: each '1'
        // advances t0 by the current pw (0.512, 0.256, ..., 0.001 s) and
        // halves pw for the next bit, so t0 ends at
        // 0.512*(2 - 2^-9) = 1.023 s, one full PPS cycle plus 23 ms.
        // to_t telescopes to a constant 2*0.512 - 0.01 = 1.014 s throughout,
        // since each step's upper bound is the outer window's upper bound.
        let pattern = "0".to_string() + &"1".repeat(10) + &"?".repeat(11);
        let section = decode_cl(&pattern, 0.01).unwrap();
        assert_eq!(section.from_ms, 23.0);
        assert_eq!(section.dur_ms, -9.0);
        assert_eq!(section.acc_ms, -9.0);
    }

    #[test]
    fn transition_character_localizes_and_stops() {
        // PPS, then four zero bits, then a transition '?' - only the first
        // five loop iterations should matter.
        let pattern = "0".to_string() + "0000" + "?" + &"0".repeat(5) + &"?".repeat(11);
        let section = decode_cl(&pattern, 0.005).unwrap();
        assert!(section.dur_ms > 0.0);
    }

    #[test]
    fn too_short_pattern_errors() {
        assert!(decode_cl("0000", 0.01).is_err());
    }

    #[test]
    fn accuracy_equals_duration() {
        let pattern = "0".to_string() + &"0".repeat(10);
        let section = decode_cl(&pattern, 0.02).unwrap();
        assert_eq!(section.acc_ms, section.dur_ms);
    }
}
