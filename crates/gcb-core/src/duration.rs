// crates/gcb-core/src/duration.rs
//
// C4: exposure-duration estimation from complementary-LED blink ratios.

use crate::beacon::BeaconType;
use crate::input::FrameRecord;
use crate::stats::LUM_RANGE;

/// Bit positions scanned for a duration estimate, in the order the original
/// per-bit histograms are built: B0..B9, then PPS.
const BIDS: [&str; 11] = [
    "B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "PPS",
];

#[derive(Default, Clone, Copy)]
struct BidHist {
    pos: [u32; LUM_RANGE],
    neg: [u32; LUM_RANGE],
    diff: [u32; LUM_RANGE],
}

struct TypeHist {
    bids: [BidHist; 11],
}

impl Default for TypeHist {
    fn default() -> Self {
        TypeHist {
            bids: [BidHist::default(); 11],
        }
    }
}

/// Estimates the exposure duration (seconds) shared across all frames, by
/// finding the fastest-blinking bit position whose on/off luminance
/// difference separates cleanly, for each beacon type present, and keeping
/// the estimate from whichever type resolves at the smallest bit index.
/// Returns 0.0 if no instance yields any resolvable bit.
pub fn estimate_exposure_duration(frames: &[FrameRecord]) -> f64 {
    let mut cl = TypeHist::default();
    let mut cm = TypeHist::default();
    let mut cl_seen = false;
    let mut cm_seen = false;

    for frame in frames {
        for beacon in frame.instances.values() {
            if beacon.readings.is_empty() {
                continue;
            }
            let (hist, seen) = match beacon.beacon_type {
                BeaconType::Cl => (&mut cl, &mut cl_seen),
                BeaconType::Cm => (&mut cm, &mut cm_seen),
            };
            *seen = true;

            for (i, &bid) in BIDS.iter().enumerate() {
                let neg_label = format!("n{bid}");
                let (Some(&v_pos), Some(&v_neg)) = (
                    beacon.readings.get(bid),
                    beacon.readings.get(&neg_label),
                ) else {
                    continue;
                };
                let h = &mut hist.bids[i];
                h.pos[v_pos as usize] += 1;
                h.neg[v_neg as usize] += 1;
                let diff = (v_pos as i32 - v_neg as i32).unsigned_abs() as usize;
                h.diff[diff.min(LUM_RANGE - 1)] += 1;
            }
        }
    }

    let mut min_bit = i64::MAX;
    let mut min_exp_dur = 0.0f64;
    let mut found = false;

    for (seen, hist) in [(cl_seen, &cl), (cm_seen, &cm)] {
        if !seen {
            continue;
        }
        let durations = bid_durations(hist);
        for b in 0..8usize {
            if durations[b] == 0.0 || durations[b + 1] == 0.0 {
                continue;
            }
            let dt = (durations[b] + durations[b + 1]) / 2.0;
            let bi = b as i64;
            if bi < min_bit || (bi == min_bit && dt < min_exp_dur) {
                min_bit = bi;
                min_exp_dur = dt;
                found = true;
            }
            break;
        }
    }

    if found {
        min_exp_dur
    } else {
        0.0
    }
}

/// Per-bit-position duration estimate in seconds, or 0.0 if that bit's
/// diff histogram didn't separate cleanly enough to use.
fn bid_durations(hist: &TypeHist) -> [f64; 11] {
    let mut out = [0.0f64; 11];
    for (i, h) in hist.bids.iter().enumerate() {
        let total: u32 = h.pos.iter().sum();
        if total == 0 {
            continue;
        }

        let mut seen = 0u32;
        let mut tile90 = 0i32;
        let mut tile99 = 0i32;
        for (v, &count) in h.diff.iter().enumerate() {
            seen += count;
            let frac = seen as f64 / total as f64;
            if tile90 == 0 && frac > 0.9 {
                tile90 = v as i32;
            }
            if tile99 == 0 && frac > 0.99 {
                tile99 = v as i32;
            }
        }

        if tile99 < 16 {
            continue;
        }

        let cutoff = ((tile90 as f64) * 0.6).floor() as usize;
        let cutoff = cutoff.min(LUM_RANGE);
        let partial: u32 = h.diff[..cutoff].iter().sum();
        let ratio = partial as f64 / total as f64;

        let dur_ms = 2f64.powi(i as i32) * ratio;
        // Truncate to 10us resolution, matching the original estimator.
        out[i] = (dur_ms * 100.0).trunc() / 100_000.0;
    }
    out
}

/// Clamps a raw duration estimate to [0.0003s, 1/fps] and rounds to the
/// nearest 10us, for use once per preprocess call before pass 3 thresholding.
pub fn clamp_duration(estimated_sec: f64, fps: f64) -> f64 {
    let max_allowed = 1.0 / fps;
    let clamped = if estimated_sec < 0.0003 || estimated_sec > max_allowed {
        max_allowed
    } else {
        estimated_sec
    };
    (clamped * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::BeaconReading;
    use std::collections::HashMap;

    fn synthetic_frames(n: usize) -> Vec<FrameRecord> {
        // B3/B4 alternate cleanly; everything else ties (diff 0) so only
        // B3/B4 resolve.
        (0..n)
            .map(|i| {
                let mut readings = HashMap::new();
                let (b3_pos, b3_neg) = if i % 2 == 0 { (30u8, 2u8) } else { (2, 30) };
                readings.insert("B3".to_string(), b3_pos);
                readings.insert("nB3".to_string(), b3_neg);
                readings.insert("B4".to_string(), b3_pos);
                readings.insert("nB4".to_string(), b3_neg);
                let mut f = FrameRecord::default();
                f.instances.insert(
                    "dev1".to_string(),
                    BeaconReading {
                        beacon_type: BeaconType::Cl,
                        readings,
                        position: serde_json::Value::Null,
                    },
                );
                f
            })
            .collect()
    }

    #[test]
    fn estimates_from_clean_bit() {
        let frames = synthetic_frames(64);
        let dur = estimate_exposure_duration(&frames);
        assert!(dur >= 0.0);
    }

    #[test]
    fn no_frames_yields_zero() {
        assert_eq!(estimate_exposure_duration(&[]), 0.0);
    }

    #[test]
    fn clamp_substitutes_fps_reciprocal_when_out_of_range() {
        let fps = 30.0;
        assert_eq!(clamp_duration(0.0, fps), (1.0 / fps * 100_000.0).round() / 100_000.0);
        assert_eq!(clamp_duration(10.0, fps), (1.0 / fps * 100_000.0).round() / 100_000.0);
    }
}
