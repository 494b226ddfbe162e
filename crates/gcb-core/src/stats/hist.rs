// crates/gcb-core/src/stats/hist.rs
//
// C3 passes 1-2: per-LED luminance histograms and threshold derivation.

use std::collections::HashMap;

use crate::beacon::complement_label;
use crate::input::FrameRecord;
use crate::remap::Luminance;

pub const LUM_RANGE: usize = 32;

/// Accumulated histogram and derived percentile tuple for one LED label
/// within one beacon instance (or the "all" aggregate across one instance's
/// non-PPS LEDs).
#[derive(Debug, Clone)]
pub struct PerLedStat {
    pub hist: [u32; LUM_RANGE],
    pub total: u32,
    pub tile0: i32,
    pub tile90: i32,
    pub tile99: i32,
    pub th: i32,
    pub on: bool,
}

impl Default for PerLedStat {
    fn default() -> Self {
        PerLedStat {
            hist: [0; LUM_RANGE],
            total: 0,
            tile0: -1,
            tile90: -1,
            tile99: -1,
            th: -1,
            on: false,
        }
    }
}

impl PerLedStat {
    fn record(&mut self, value: Luminance) {
        self.hist[value as usize] += 1;
        self.total += 1;
    }

    fn derive_percentiles(&mut self) {
        if self.total == 0 {
            return;
        }
        let ttl = self.total as f64;
        let mut tile0 = -1i32;
        let mut tile90 = -1i32;
        let mut tile99 = -1i32;
        let mut seen = 0u32;
        for (idx, &count) in self.hist.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if tile0 < 0 {
                tile0 = idx as i32;
            }
            seen += count;
            let frac = seen as f64 / ttl;
            if tile90 < 0 && frac > 0.9 {
                tile90 = idx as i32;
            }
            if tile99 < 0 && frac > 0.99 {
                tile99 = idx as i32;
            }
        }
        if tile90 < 0 {
            tile90 = tile0;
        }
        if tile99 < 0 {
            tile99 = tile90;
        }
        self.tile0 = tile0;
        self.tile90 = tile90;
        self.tile99 = tile99;
        self.th = tile0 + (tile90 - tile0) / 2;
    }
}

/// Per-instance LED statistics: label -> stat, plus a synthetic "all" entry
/// aggregating every non-PPS LED in the instance.
pub type InstanceStats = HashMap<String, PerLedStat>;

/// Passes 1 and 2: accumulate histograms across all frames, then derive
/// tile0/tile90/tile99/th for every LED of every instance seen.
pub fn aggregate(frames: &[FrameRecord]) -> HashMap<String, InstanceStats> {
    let mut stat: HashMap<String, InstanceStats> = HashMap::new();

    for frame in frames {
        for (instance, beacon) in &frame.instances {
            if beacon.readings.is_empty() {
                continue;
            }
            let index = beacon.beacon_type.canonical_index();
            let entry = stat.entry(instance.clone()).or_default();

            for label in &index {
                let comp = complement_label(label);
                for id in [label.clone(), comp] {
                    if let Some(&value) = beacon.readings.get(&id) {
                        entry.entry(id.clone()).or_default().record(value);
                        if label != "PPS" {
                            entry.entry("all".to_string()).or_default().record(value);
                        }
                    }
                }
            }
        }
    }

    for leds in stat.values_mut() {
        for s in leds.values_mut() {
            s.derive_percentiles();
        }
    }

    stat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::BeaconType;
    use crate::input::BeaconReading;
    use std::collections::HashMap;

    fn frame_with(instance: &str, readings: HashMap<String, Luminance>) -> FrameRecord {
        let mut f = FrameRecord::default();
        f.instances.insert(
            instance.to_string(),
            BeaconReading {
                beacon_type: BeaconType::Cl,
                readings,
                position: serde_json::Value::Null,
            },
        );
        f
    }

    #[test]
    fn tile_ordering_holds() {
        let frames: Vec<FrameRecord> = [2u8, 2, 5, 5, 5, 9, 30]
            .iter()
            .map(|&v| {
                let mut r = HashMap::new();
                r.insert("B9".to_string(), v);
                frame_with("dev1", r)
            })
            .collect();

        let stat = aggregate(&frames);
        let s = &stat["dev1"]["B9"];
        assert_eq!(s.total, 7);
        assert!(s.tile0 <= s.tile90);
        assert!(s.tile90 <= s.tile99);
        assert_eq!(s.tile0, 2);
    }

    #[test]
    fn empty_readings_are_skipped() {
        let frames = vec![frame_with("dev1", HashMap::new())];
        let stat = aggregate(&frames);
        assert!(stat.is_empty());
    }
}
