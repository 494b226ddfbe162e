// crates/gcb-core/src/binarize.rs
//
// C5: turning per-LED luminance readings into pattern characters, and
// walking a canonical index into a full CLID/CMID string.

use std::collections::HashMap;

use crate::beacon::complement_label;
use crate::pattern::PatChar;
use crate::remap::Luminance;
use crate::stats::InstanceStats;

/// Decides the pattern character for one pair position: on iff the reading
/// exceeds that LED's threshold. A LED with no known threshold (never seen
/// during the stats pass) or no reading this frame contributes '?'.
pub fn bit_char(
    label: &str,
    readings: &HashMap<String, Luminance>,
    stats: &InstanceStats,
) -> PatChar {
    let comp = complement_label(label);

    let pos_on = led_on(label, readings, stats);
    let comp_on = led_on(&comp, readings, stats);

    match (pos_on, comp_on) {
        (Some(true), Some(false)) => PatChar::One,
        (Some(false), Some(true)) => PatChar::Zero,
        (Some(true), Some(true)) => PatChar::Both,
        (Some(false), Some(false)) => PatChar::Off,
        _ => PatChar::Unknown,
    }
}

fn led_on(label: &str, readings: &HashMap<String, Luminance>, stats: &InstanceStats) -> Option<bool> {
    let value = *readings.get(label)?;
    let s = stats.get(label)?;
    if s.total == 0 {
        return None;
    }
    Some(value as i32 > s.th)
}

/// Builds the pattern string for `index`, one alphabet character per
/// position, in order.
pub fn build_pattern(
    index: &[String],
    readings: &HashMap<String, Luminance>,
    stats: &InstanceStats,
) -> String {
    index
        .iter()
        .map(|label| bit_char(label, readings, stats).to_char())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::BeaconType;
    use crate::stats::PerLedStat;

    fn stat(th: i32) -> PerLedStat {
        PerLedStat {
            total: 5,
            th,
            ..Default::default()
        }
    }

    #[test]
    fn build_pattern_length_matches_index_cardinality() {
        let ty = BeaconType::Cl;
        let index = ty.canonical_index();
        let readings = HashMap::new();
        let stats = InstanceStats::new();
        let pat = build_pattern(&index, &readings, &stats);
        assert_eq!(pat.chars().count(), ty.index_cardinality());
        assert!(pat.chars().all(|c| c == '?'));
    }

    #[test]
    fn on_off_pair_decodes_to_one_or_zero() {
        let mut readings = HashMap::new();
        readings.insert("B9".to_string(), 20u8);
        readings.insert("nB9".to_string(), 2u8);
        let mut stats = InstanceStats::new();
        stats.insert("B9".to_string(), stat(10));
        stats.insert("nB9".to_string(), stat(10));

        assert_eq!(bit_char("B9", &readings, &stats), PatChar::One);
    }
}
