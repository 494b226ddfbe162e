// crates/gcb-core/src/preprocess.rs
//
// C9: the entry point tying C1-C8 together for one recognizer result.

use std::collections::HashMap;

use crate::dict::DictionaryStore;
use crate::duration::{clamp_duration, estimate_exposure_duration};
use crate::input::{convert_analyzer_result, FrameRecord};
use crate::pipeline::Pipeline;
use crate::result::ParseResult;
use crate::stats::{alwayson, hist, InstanceStats};

/// Everything preprocess needs beyond the raw recognizer JSON.
pub struct PreprocessConfig<'a> {
    pub dict: &'a DictionaryStore,
    /// Camera capture rate, used to bound the exposure-duration estimate.
    pub fps: f64,
    /// Caller-supplied exposure duration (seconds). When absent, it's
    /// estimated from the complementary-LED blink ratios (C4).
    pub exp_duration_sec: Option<f64>,
}

pub struct PreprocessOutput {
    pub frames: Vec<FrameRecord>,
    pub stats: HashMap<String, InstanceStats>,
    pub exp_duration_sec: f64,
    /// Per-frame, per-instance parse results, indexed like `frames`.
    pub results: Vec<Vec<(String, Option<ParseResult>)>>,
}

/// Runs the full pipeline over one recognizer result:
/// 1. Reshape the raw JSON into per-frame records (remapping IDs via C2).
/// 2. Stats pass 1-2: per-LED histograms and thresholds (C3).
/// 3. Resolve the exposure duration: caller-supplied duration is used as-is;
///    otherwise estimate it (C4) and clamp the estimate to [0.0003s, 1/fps].
/// 4. Stats pass 3: always-on detection, now that a duration estimate exists.
/// 5. Run the per-frame pipeline (C8) to produce parse results.
pub fn preprocess(
    analyzer_result: &serde_json::Value,
    config: &PreprocessConfig,
) -> crate::error::Result<PreprocessOutput> {
    let frames = convert_analyzer_result(analyzer_result)?;

    let mut stats = hist::aggregate(&frames);

    let exp_duration_sec = match config.exp_duration_sec {
        Some(d) => d,
        None => clamp_duration(estimate_exposure_duration(&frames), config.fps),
    };

    alwayson::apply(&mut stats, exp_duration_sec);

    let mut pipeline = Pipeline::new(&stats, config.dict.cl(), config.dict.cm(), exp_duration_sec);
    let results: Vec<Vec<(String, Option<ParseResult>)>> = frames
        .iter()
        .map(|frame| pipeline.process_frame(frame))
        .collect();

    Ok(PreprocessOutput {
        frames,
        stats,
        exp_duration_sec,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_dict_store() -> DictionaryStore {
        let cl_dir = std::env::temp_dir().join(format!("gcb-test-cl-{}.json", std::process::id()));
        let cm_dir = std::env::temp_dir().join(format!("gcb-test-cm-{}.json", std::process::id()));
        std::fs::write(&cl_dir, r#"{"pat": {}, "dTexp": {}}"#).unwrap();
        std::fs::write(&cm_dir, r#"{"pat": {}, "dTexp": {}}"#).unwrap();
        let store = DictionaryStore::load(&cl_dir, &cm_dir).unwrap();
        let _ = std::fs::remove_file(&cl_dir);
        let _ = std::fs::remove_file(&cm_dir);
        store
    }

    #[test]
    fn preprocess_is_idempotent_on_the_same_input() {
        let dict = empty_dict_store();
        let raw = json!({
            "frame_num": 1,
            "frame0": {
                "device_keys": ["dev1"],
                "dev1": {
                    "device_name": "CL-Beacon",
                    "beacon": {},
                    "position": {},
                },
            },
        });
        let config = PreprocessConfig {
            dict: &dict,
            fps: 30.0,
            exp_duration_sec: Some(0.01),
        };

        let a = preprocess(&raw, &config).unwrap();
        let b = preprocess(&raw, &config).unwrap();
        assert_eq!(a.exp_duration_sec, b.exp_duration_sec);
        assert_eq!(a.frames.len(), b.frames.len());
    }
}
