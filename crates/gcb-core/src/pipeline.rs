// crates/gcb-core/src/pipeline.rs
//
// C8: per-frame, per-instance orchestration of C5 (binarize) through C6/C7
// (decode), with a small cross-frame tracking state per instance.

use std::collections::HashMap;

use crate::beacon::BeaconType;
use crate::binarize::build_pattern;
use crate::decode::decode_cl;
use crate::dict::{parse_exposure_time, BeaconDict, MatchResult};
use crate::input::{BeaconReading, FrameRecord};
use crate::result::{ParseResult, Section};
use crate::stats::InstanceStats;

const DEFAULT_OFFSET_RANGE_MS: (f64, f64) = (0.0, 1000.0);

/// Per-instance cross-frame tracking state. A fresh instance starts
/// `Virgin`; once a frame parses successfully it moves to `Tracking`,
/// carrying the last chosen section forward for callers that reconstruct
/// absolute time (outside this crate's scope).
#[derive(Debug, Clone, Copy)]
pub enum InstanceState {
    Virgin,
    Tracking { last_section: Section },
}

pub struct Pipeline<'a> {
    stats: &'a HashMap<String, InstanceStats>,
    cl_dict: &'a BeaconDict,
    cm_dict: &'a BeaconDict,
    d_texp_sec: f64,
    state: HashMap<String, InstanceState>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        stats: &'a HashMap<String, InstanceStats>,
        cl_dict: &'a BeaconDict,
        cm_dict: &'a BeaconDict,
        d_texp_sec: f64,
    ) -> Self {
        Pipeline {
            stats,
            cl_dict,
            cm_dict,
            d_texp_sec,
            state: HashMap::new(),
        }
    }

    pub fn state_of(&self, instance: &str) -> InstanceState {
        self.state
            .get(instance)
            .copied()
            .unwrap_or(InstanceState::Virgin)
    }

    /// Parses every beacon instance present in `frame`, returning
    /// (instance_id, result) pairs in arbitrary order. An instance missing
    /// from the result failed entirely for this frame (no usable CLID, or
    /// neither the analytical decode nor any dictionary match succeeded).
    pub fn process_frame(&mut self, frame: &FrameRecord) -> Vec<(String, Option<ParseResult>)> {
        let mut out = Vec::with_capacity(frame.instances.len());
        for (instance_id, beacon) in &frame.instances {
            let result = self.process_instance(instance_id, beacon);
            match &result {
                Some(r) => {
                    self.state.insert(
                        instance_id.clone(),
                        InstanceState::Tracking {
                            last_section: r.time,
                        },
                    );
                }
                None => {
                    self.state
                        .entry(instance_id.clone())
                        .or_insert(InstanceState::Virgin);
                }
            }
            out.push((instance_id.clone(), result));
        }
        out
    }

    fn process_instance(&self, instance_id: &str, beacon: &BeaconReading) -> Option<ParseResult> {
        if beacon.readings.is_empty() {
            return None;
        }
        let stat = self.stats.get(instance_id)?;

        match beacon.beacon_type {
            BeaconType::Cl => self.process_cl(beacon, stat),
            BeaconType::Cm => self.process_cm(beacon, stat),
        }
    }

    fn process_cl(&self, beacon: &BeaconReading, stat: &InstanceStats) -> Option<ParseResult> {
        let index = BeaconType::Cl.canonical_index();
        let clid = build_pattern(&index, &beacon.readings, stat);

        let time_acl = decode_cl(&clid, self.d_texp_sec).ok()?;
        let time_cl_match = parse_exposure_time(
            &clid,
            self.d_texp_sec * 1000.0,
            self.cl_dict,
            DEFAULT_OFFSET_RANGE_MS,
        )
        .ok();

        let time = time_cl_match
            .as_ref()
            .and_then(first_section)
            .unwrap_or(time_acl);

        Some(ParseResult {
            d_texp_sec: self.d_texp_sec,
            clid,
            cmid: None,
            time,
            time_cl: time_cl_match.as_ref().and_then(first_section),
            time_cm: None,
            time_acl: Some(time_acl),
        })
    }

    fn process_cm(&self, beacon: &BeaconReading, stat: &InstanceStats) -> Option<ParseResult> {
        let cl_index = BeaconType::Cl.canonical_index();
        let cm_index = BeaconType::Cm.canonical_index();
        let clid = build_pattern(&cl_index, &beacon.readings, stat);
        let cmid = build_pattern(&cm_index, &beacon.readings, stat);

        let time_cl_match = parse_exposure_time(
            &clid,
            self.d_texp_sec * 1000.0,
            self.cl_dict,
            DEFAULT_OFFSET_RANGE_MS,
        )
        .ok();
        let time_cm_match = if has_signal(&cmid) {
            parse_exposure_time(
                &cmid,
                self.d_texp_sec * 1000.0,
                self.cm_dict,
                DEFAULT_OFFSET_RANGE_MS,
            )
            .ok()
        } else {
            None
        };

        let time = time_cm_match
            .as_ref()
            .and_then(first_section)
            .or_else(|| time_cl_match.as_ref().and_then(first_section))?;

        Some(ParseResult {
            d_texp_sec: self.d_texp_sec,
            clid,
            cmid: Some(cmid),
            time,
            time_cl: time_cl_match.as_ref().and_then(first_section),
            time_cm: time_cm_match.as_ref().and_then(first_section),
            time_acl: None,
        })
    }
}

fn has_signal(pattern: &str) -> bool {
    pattern.chars().any(|c| c != '?')
}

fn first_section(mr: &MatchResult) -> Option<Section> {
    mr.candidates.first().map(|c| Section {
        from_ms: c.offset_ms,
        dur_ms: c.duration_ms,
        acc_ms: c.duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::model::DictFile;
    use serde_json::json;
    use std::collections::HashMap;

    fn empty_dict() -> BeaconDict {
        let file: DictFile = serde_json::from_value(json!({"pat": {}, "dTexp": {}})).unwrap();
        BeaconDict::from_file(file).unwrap()
    }

    #[test]
    fn instance_without_stats_has_no_clid_and_is_skipped() {
        let stats: HashMap<String, InstanceStats> = HashMap::new();
        let cl_dict = empty_dict();
        let cm_dict = empty_dict();
        let mut pipeline = Pipeline::new(&stats, &cl_dict, &cm_dict, 0.01);

        let mut readings = HashMap::new();
        readings.insert("PPS".to_string(), 10u8);
        let beacon = BeaconReading {
            beacon_type: BeaconType::Cl,
            readings,
            position: serde_json::Value::Null,
        };
        let mut frame = FrameRecord::default();
        frame.instances.insert("dev1".to_string(), beacon);

        let results = pipeline.process_frame(&frame);
        assert_eq!(results.len(), 1);
        // stats map is empty, so this instance has no threshold data and
        // process_instance returns None (no CLID buildable for it).
        assert!(results[0].1.is_none());
    }

    #[test]
    fn cl_falls_back_to_analytical_when_no_dictionary_match() {
        let mut instance_stats = InstanceStats::new();
        for label in BeaconType::Cl.canonical_index() {
            instance_stats.insert(
                label.clone(),
                crate::stats::PerLedStat {
                    total: 5,
                    th: 10,
                    ..Default::default()
                },
            );
            instance_stats.insert(
                format!("n{label}"),
                crate::stats::PerLedStat {
                    total: 5,
                    th: 10,
                    ..Default::default()
                },
            );
        }
        let mut stats = HashMap::new();
        stats.insert("dev1".to_string(), instance_stats);

        let cl_dict = empty_dict();
        let cm_dict = empty_dict();
        let mut pipeline = Pipeline::new(&stats, &cl_dict, &cm_dict, 0.01);

        let mut readings = HashMap::new();
        for label in BeaconType::Cl.canonical_index() {
            readings.insert(label.clone(), 20u8);
            readings.insert(format!("n{label}"), 2u8);
        }
        let beacon = BeaconReading {
            beacon_type: BeaconType::Cl,
            readings,
            position: serde_json::Value::Null,
        };
        let mut frame = FrameRecord::default();
        frame.instances.insert("dev1".to_string(), beacon);

        let results = pipeline.process_frame(&frame);
        let (_, result) = &results[0];
        let result = result.as_ref().expect("CL decode should always succeed");
        assert_eq!(result.time, result.time_acl.unwrap());
        assert!(result.time_cl.is_none());
    }

    #[test]
    fn empty_readings_skip_instance() {
        let stats: HashMap<String, InstanceStats> = HashMap::new();
        let cl_dict = empty_dict();
        let cm_dict = empty_dict();
        let mut pipeline = Pipeline::new(&stats, &cl_dict, &cm_dict, 0.01);

        let beacon = BeaconReading {
            beacon_type: BeaconType::Cl,
            readings: HashMap::new(),
            position: serde_json::Value::Null,
        };
        let mut frame = FrameRecord::default();
        frame.instances.insert("dev1".to_string(), beacon);

        let results = pipeline.process_frame(&frame);
        assert!(results[0].1.is_none());
        assert!(matches!(
            pipeline.state_of("dev1"),
            InstanceState::Virgin
        ));
    }
}
