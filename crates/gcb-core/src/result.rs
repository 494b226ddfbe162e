// crates/gcb-core/src/result.rs
//
// Output shapes: a decoded time window and the full per-frame parse result.

use serde::Serialize;

/// A decoded exposure window: [fromMs, durMs, accMs], all milliseconds,
/// rounded to 2 decimal places. fromMs is the offset within the current
/// 1-second PPS cycle. Serializes as a 3-element JSON array, not an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 3]")]
pub struct Section {
    pub from_ms: f64,
    pub dur_ms: f64,
    pub acc_ms: f64,
}

impl Section {
    pub fn as_array(self) -> [f64; 3] {
        [self.from_ms, self.dur_ms, self.acc_ms]
    }
}

impl From<Section> for [f64; 3] {
    fn from(s: Section) -> Self {
        s.as_array()
    }
}

/// Per-instance, per-frame parse outcome (spec section 3 ParseResult).
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Estimated exposure duration fed into this frame's decode, in seconds.
    #[serde(rename = "dTexp")]
    pub d_texp_sec: f64,
    pub clid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmid: Option<String>,
    /// The chosen final time window: dictionary match when one exists,
    /// otherwise the analytical decode.
    pub time: Section,
    #[serde(rename = "timeCl", skip_serializing_if = "Option::is_none")]
    pub time_cl: Option<Section>,
    #[serde(rename = "timeCm", skip_serializing_if = "Option::is_none")]
    pub time_cm: Option<Section>,
    #[serde(rename = "timeAcl", skip_serializing_if = "Option::is_none")]
    pub time_acl: Option<Section>,
}
