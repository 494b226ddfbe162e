// crates/gcb-core/src/dict/matcher.rs
//
// C7: dictionary-based fuzzy pattern matching.

use crate::error::{GcbError, Result};
use crate::pattern::pattern_distance;

use super::store::BeaconDict;

#[derive(Debug, Clone)]
pub struct DictCandidate {
    pub pattern_id: String,
    pub offset_ms: f64,
    pub duration_ms: f64,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub ratio: f64,
    pub duration_ms: f64,
    pub candidates: Vec<DictCandidate>,
}

/// Matches `pattern` against `dict`'s nearest duration bucket, restricted to
/// offsets within `offset_range_ms` (inclusive), returning every candidate
/// tied at the best (rounded to 3 decimals) distance, in offset order.
pub fn parse_exposure_time(
    pattern: &str,
    d_texp_ms: f64,
    dict: &BeaconDict,
    offset_range_ms: (f64, f64),
) -> Result<MatchResult> {
    let (duration_ms, table) = dict
        .lookup(d_texp_ms)
        .ok_or_else(|| GcbError::Config("dictionary has no dTexp entries".to_string()))?;

    let mut best_key = i64::MIN;
    let mut best: Vec<DictCandidate> = Vec::new();

    for (offset_ms, entries) in &table.entries {
        if *offset_ms < offset_range_ms.0 || *offset_ms > offset_range_ms.1 {
            continue;
        }
        for entry in entries {
            let dict_pattern = dict.pattern(&entry.pattern_id).ok_or_else(|| {
                GcbError::Config(format!(
                    "dictionary references unknown pattern id {}",
                    entry.pattern_id
                ))
            })?;
            if dict_pattern.chars().count() != pattern.chars().count() {
                return Err(GcbError::ShapeMismatch(format!(
                    "dictionary pattern length {} != query pattern length {}",
                    dict_pattern.chars().count(),
                    pattern.chars().count()
                )));
            }

            let dist = pattern_distance(pattern, dict_pattern)?;
            let bucket_key = (dist * 1000.0).round() as i64;
            let candidate = DictCandidate {
                pattern_id: entry.pattern_id.clone(),
                offset_ms: *offset_ms,
                duration_ms,
                ratio: bucket_key as f64 / 1000.0,
            };

            match bucket_key.cmp(&best_key) {
                std::cmp::Ordering::Greater => {
                    best_key = bucket_key;
                    best = vec![candidate];
                }
                std::cmp::Ordering::Equal => best.push(candidate),
                std::cmp::Ordering::Less => {}
            }
        }
    }

    if best.is_empty() {
        return Err(GcbError::Validation(
            "no dictionary candidates within offset range".to_string(),
        ));
    }

    Ok(MatchResult {
        ratio: best_key as f64 / 1000.0,
        duration_ms,
        candidates: best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::model::DictFile;
    use serde_json::json;

    fn dict_with_tie() -> BeaconDict {
        let file: DictFile = serde_json::from_value(json!({
            "pat": {"p1": "10X-", "p2": "10X-", "p3": "01-X"},
            "dTexp": {
                "10": {
                    "100": [["p1"], ["p2"]],
                    "200": [["p3"]]
                }
            }
        }))
        .unwrap();
        BeaconDict::from_file(file).unwrap()
    }

    #[test]
    fn ties_are_preserved_in_offset_order() {
        let dict = dict_with_tie();
        let result = parse_exposure_time("10X-", 10.0, &dict, (0.0, 1000.0)).unwrap();
        assert_eq!(result.ratio, 1.0);
        let ids: Vec<&str> = result.candidates.iter().map(|c| c.pattern_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn offset_range_filters_candidates() {
        let dict = dict_with_tie();
        let result = parse_exposure_time("01-X", 10.0, &dict, (150.0, 1000.0)).unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].pattern_id, "p3");
    }
}
