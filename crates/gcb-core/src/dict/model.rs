// crates/gcb-core/src/dict/model.rs
//
// On-disk dictionary JSON shape (spec section 6 external interfaces).

use std::collections::HashMap;

use serde::Deserialize;

/// `{"pat": {"<id>": "<pattern>", ...}, "dTexp": {"<durationMs>": {"<offsetMs>": [patternId, ...meta]}}}`
#[derive(Debug, Clone, Deserialize)]
pub struct DictFile {
    pub pat: HashMap<String, String>,
    #[serde(rename = "dTexp")]
    pub d_texp: HashMap<String, HashMap<String, Vec<serde_json::Value>>>,
}
