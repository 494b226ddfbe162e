// crates/gcb-core/src/input.rs
//
// Reshaping the recognizer's frame-keyed JSON object into a flat per-frame
// record list (spec section 6 external interfaces).

use std::collections::HashMap;

use crate::beacon::BeaconType;
use crate::error::{GcbError, Result};
use crate::remap::{self, Luminance};

/// One beacon instance's canonical-label readings for a single frame.
#[derive(Debug, Clone)]
pub struct BeaconReading {
    pub beacon_type: BeaconType,
    pub readings: HashMap<String, Luminance>,
    pub position: serde_json::Value,
}

/// All beacon instances present in one video frame, keyed by device name.
/// An instance absent from a frame (recognition failed or the device simply
/// isn't visible) is silently missing from the map, not an error.
#[derive(Debug, Clone, Default)]
pub struct FrameRecord {
    pub instances: HashMap<String, BeaconReading>,
}

/// Parses the recognizer's raw analyzer JSON (`{"frame_num": N, "frame0":
/// {...}, "frame1": {...}, ...}`) into an index-ordered list of frames.
/// The "device_keys" entry present alongside each frame's devices is
/// metadata, not a device, and is ignored.
pub fn convert_analyzer_result(raw: &serde_json::Value) -> Result<Vec<FrameRecord>> {
    let obj = raw
        .as_object()
        .ok_or_else(|| GcbError::ShapeMismatch("recognizer result must be a JSON object".into()))?;

    let frame_num = obj
        .get("frame_num")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| GcbError::ShapeMismatch("recognizer result missing frame_num".into()))?
        as usize;

    let mut frames: Vec<FrameRecord> = (0..frame_num).map(|_| FrameRecord::default()).collect();

    for (key, value) in obj {
        if key == "frame_num" {
            continue;
        }
        let idx: usize = key.strip_prefix("frame").and_then(|s| s.parse().ok()).ok_or_else(
            || GcbError::ShapeMismatch(format!("unexpected top-level key: {key}")),
        )?;

        let frame_obj = value
            .as_object()
            .ok_or_else(|| GcbError::ShapeMismatch(format!("{key} is not an object")))?;

        let mut record = FrameRecord::default();
        for (device, data) in frame_obj {
            if device == "device_keys" {
                continue;
            }
            let Some(device_name) = data.get("device_name").and_then(|v| v.as_str()) else {
                return Err(GcbError::ShapeMismatch(format!(
                    "{key}.{device}: missing device_name"
                )));
            };
            let beacon_type = match BeaconType::parse(device_name) {
                Ok(t) => t,
                Err(_) => {
                    tracing::debug!(frame = %key, device, device_name, "skipping unrecognized beacon type");
                    continue;
                }
            };

            let raw_readings: HashMap<String, serde_json::Value> = data
                .get("beacon")
                .and_then(|b| b.as_object())
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();

            let readings = remap::convert_id_to_bid(beacon_type, &raw_readings);
            let position = data.get("position").cloned().unwrap_or(serde_json::Value::Null);

            record.instances.insert(
                device.clone(),
                BeaconReading {
                    beacon_type,
                    readings,
                    position,
                },
            );
        }

        if idx < frames.len() {
            frames[idx] = record;
        } else {
            tracing::warn!(frame = %key, frame_num, "frame index beyond declared frame_num, dropping");
        }
    }

    Ok(frames)
}
