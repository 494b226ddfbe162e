// crates/gcb-core/src/dict/store.rs
//
// C1: the dictionary as a read-only, load-once handle. Load failures are
// fatal (ConfigError): a parser with no dictionary can't do dictionary
// matching at all, so there's no useful degraded mode.

use std::path::Path;

use crate::error::{GcbError, Result};

use super::model::DictFile;

/// One dictionary entry: the pattern id a duration/offset bucket resolves to,
/// plus whatever opaque metadata followed it in the source JSON array.
#[derive(Debug, Clone)]
pub struct DictEntry {
    pub pattern_id: String,
    pub meta: Vec<serde_json::Value>,
}

/// Offset-ms-sorted table of dictionary entries for one duration bucket.
#[derive(Debug, Clone, Default)]
pub struct OffsetTable {
    /// (offset_ms, entries), ascending by offset_ms.
    pub entries: Vec<(f64, Vec<DictEntry>)>,
}

/// One beacon type's dictionary: known patterns plus the duration/offset
/// lookup table used by the matcher.
#[derive(Debug, Clone, Default)]
pub struct BeaconDict {
    patterns: std::collections::HashMap<String, String>,
    /// (duration_ms, table), ascending by duration_ms.
    d_texp: Vec<(f64, OffsetTable)>,
}

impl BeaconDict {
    pub(crate) fn from_file(file: DictFile) -> Result<Self> {
        let mut d_texp: Vec<(f64, OffsetTable)> = Vec::with_capacity(file.d_texp.len());
        for (dur_key, offsets) in file.d_texp {
            let dur_ms: f64 = dur_key.parse().map_err(|_| {
                GcbError::Config(format!("dTexp key {dur_key:?} is not numeric"))
            })?;

            let mut entries: Vec<(f64, Vec<DictEntry>)> = Vec::with_capacity(offsets.len());
            for (off_key, values) in offsets {
                let off_ms: f64 = off_key.parse().map_err(|_| {
                    GcbError::Config(format!("offset key {off_key:?} is not numeric"))
                })?;
                let mut parsed = Vec::with_capacity(values.len());
                for v in values {
                    let arr = v.as_array().ok_or_else(|| {
                        GcbError::Config("dTexp entry must be an array".to_string())
                    })?;
                    let pattern_id = arr
                        .first()
                        .and_then(|x| x.as_str())
                        .ok_or_else(|| {
                            GcbError::Config("dTexp entry's first element must be a pattern id string".to_string())
                        })?
                        .to_string();
                    let meta = arr.get(1..).map(|s| s.to_vec()).unwrap_or_default();
                    parsed.push(DictEntry { pattern_id, meta });
                }
                entries.push((off_ms, parsed));
            }
            entries.sort_by(|a, b| a.0.total_cmp(&b.0));
            d_texp.push((dur_ms, OffsetTable { entries }));
        }
        d_texp.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(BeaconDict {
            patterns: file.pat,
            d_texp,
        })
    }

    pub fn pattern(&self, id: &str) -> Option<&str> {
        self.patterns.get(id).map(|s| s.as_str())
    }

    /// Nearest dTexp duration key to `d_texp_ms`, ties broken toward the
    /// smaller key. Returns None if the dictionary has no duration keys at
    /// all.
    /// Every duration bucket key, ascending, for reporting/inspection.
    pub fn duration_keys_ms(&self) -> Vec<f64> {
        self.d_texp.iter().map(|(k, _)| *k).collect()
    }

    /// Number of offset buckets under the nearest duration key to `d_texp_ms`.
    pub fn offset_count(&self, d_texp_ms: f64) -> usize {
        self.lookup(d_texp_ms).map(|(_, t)| t.entries.len()).unwrap_or(0)
    }

    pub fn lookup(&self, d_texp_ms: f64) -> Option<(f64, &OffsetTable)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, (k, _)) in self.d_texp.iter().enumerate() {
            let dist = (k - d_texp_ms).abs();
            if best.map(|(_, bd)| dist < bd).unwrap_or(true) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| (self.d_texp[i].0, &self.d_texp[i].1))
    }
}

/// Both beacon types' dictionaries, loaded once at startup.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    cl: BeaconDict,
    cm: BeaconDict,
}

impl DictionaryStore {
    pub fn load(cl_path: &Path, cm_path: &Path) -> Result<Self> {
        let cl = load_one(cl_path)?;
        let cm = load_one(cm_path)?;
        Ok(DictionaryStore { cl, cm })
    }

    pub fn cl(&self) -> &BeaconDict {
        &self.cl
    }

    pub fn cm(&self) -> &BeaconDict {
        &self.cm
    }
}

fn load_one(path: &Path) -> Result<BeaconDict> {
    let text = std::fs::read_to_string(path)?;
    let file: DictFile = serde_json::from_str(&text)?;
    BeaconDict::from_file(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DictFile {
        serde_json::from_value(json!({
            "pat": {"p1": "10X-", "p2": "01-X"},
            "dTexp": {
                "10": {"100": [["p1"]], "900": [["p2"]]},
                "20": {"500": [["p1"]]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn nearest_duration_ties_to_smaller() {
        let dict = BeaconDict::from_file(sample()).unwrap();
        let (chosen, _) = dict.lookup(15.0).unwrap();
        assert_eq!(chosen, 10.0);
    }

    #[test]
    fn offsets_sorted_ascending() {
        let dict = BeaconDict::from_file(sample()).unwrap();
        let (_, table) = dict.lookup(10.0).unwrap();
        let offs: Vec<f64> = table.entries.iter().map(|(o, _)| *o).collect();
        assert_eq!(offs, vec![100.0, 900.0]);
    }
}
