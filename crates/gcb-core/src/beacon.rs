// crates/gcb-core/src/beacon.rs
//
// Beacon type and canonical LED index construction (data model, spec section 3).
//
// A beacon instance exposes one alphabet character per *pair position*: a PPS
// or "B" position paired with its complement ("n"-prefixed) LED. The pair
// positions are enumerated in a fixed canonical order; CLID/CMID are built by
// walking that order once per beacon.

use crate::error::{GcbError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BeaconType {
    Cl,
    Cm,
}

impl BeaconType {
    pub fn parse(device_name: &str) -> Result<Self> {
        match device_name {
            "CL-Beacon" => Ok(BeaconType::Cl),
            "CM-Beacon" => Ok(BeaconType::Cm),
            other => Err(GcbError::ShapeMismatch(format!(
                "unknown beacon device_name: {other:?}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BeaconType::Cl => "CL-Beacon",
            BeaconType::Cm => "CM-Beacon",
        }
    }

    /// Canonical pair-position index: one entry per (positive, complement) LED
    /// pair, in the fixed order the alphabet character for that pair is
    /// emitted. This is the "index" referenced throughout sections 3-4.
    ///
    /// CL-Beacon: PPS, B9, B8, ..., B0  (11 positions).
    /// CM-Beacon: PPS, then every Bij with 0<=i<=j<=9 rendered column-major:
    /// outer loop over the high column from 9 down to 0, inner loop over the
    /// row from that column down to 0 (56 positions): PPS, B9, B89, B79, ...,
    /// B09, B8, B78, B68, ..., B08, B7, ...
    pub fn canonical_index(self) -> Vec<String> {
        match self {
            BeaconType::Cl => {
                let mut v = Vec::with_capacity(11);
                v.push("PPS".to_string());
                for col in (0..=9).rev() {
                    v.push(format!("B{col}"));
                }
                v
            }
            BeaconType::Cm => {
                let mut v = Vec::with_capacity(56);
                v.push("PPS".to_string());
                for col in (0..=9).rev() {
                    for row in (0..=col).rev() {
                        if row == col {
                            v.push(format!("B{col}"));
                        } else {
                            v.push(format!("B{row}{col}"));
                        }
                    }
                }
                v
            }
        }
    }

    /// Number of pair positions (= CLID/CMID pattern length for this type).
    pub fn index_cardinality(self) -> usize {
        match self {
            BeaconType::Cl => 11,
            BeaconType::Cm => 56,
        }
    }
}

/// Complement label for a canonical positive label, e.g. "B9" -> "nB9".
pub fn complement_label(label: &str) -> String {
    format!("n{label}")
}
