// crates/gcb-core/src/remap.rs
//
// C2: remapping raw recognizer ID labels ("ID1", "ID2", ...) onto canonical
// beacon-relative labels ("PPS", "B9", "nB9", ...).
//
// The recognizer numbers its per-device IDs by walking the canonical index in
// order and interleaving each pair's positive and complement entry:
// ID(2k-1) is the positive label at index k, ID(2k) is its complement.
// This is a deterministic convention rather than a hand-copied wiring table:
// it only has to agree with itself, since both the recognizer's raw IDs and
// our canonical labels are internal to this pipeline.

use std::collections::HashMap;

use crate::beacon::{complement_label, BeaconType};

pub type Luminance = u8;

const LUMINANCE_RANGE: std::ops::RangeInclusive<i64> = 0..=31;

fn valid_luminance(v: &serde_json::Value) -> Option<Luminance> {
    v.as_i64()
        .filter(|n| LUMINANCE_RANGE.contains(n))
        .map(|n| n as Luminance)
}

/// Raw recognizer ID for the positive member of canonical-index position `k`
/// (0-based).
pub fn positive_raw_id(k: usize) -> String {
    format!("ID{}", 2 * k + 1)
}

/// Raw recognizer ID for the complement member of canonical-index position
/// `k` (0-based).
pub fn complement_raw_id(k: usize) -> String {
    format!("ID{}", 2 * k + 2)
}

/// Converts a raw `{"ID1": 12, "ID2": 30, ...}` reading map into canonical
/// `{"PPS": 12, "nPPS": 30, ...}` labels. Missing or out-of-range ([0,31])
/// entries are silently dropped: partial maps are legal, matching a frame
/// where recognition only partially succeeded.
pub fn convert_id_to_bid(
    ty: BeaconType,
    readings: &HashMap<String, serde_json::Value>,
) -> HashMap<String, Luminance> {
    let mut out = HashMap::new();
    for (k, label) in ty.canonical_index().iter().enumerate() {
        if let Some(v) = readings.get(&positive_raw_id(k)).and_then(valid_luminance) {
            out.insert(label.clone(), v);
        }
        if let Some(v) = readings
            .get(&complement_raw_id(k))
            .and_then(valid_luminance)
        {
            out.insert(complement_label(label), v);
        }
    }
    out
}
