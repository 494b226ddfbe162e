// crates/gcb-core/src/stats/alwayson.rs
//
// C3 pass 3: always-on LED detection, run once per preprocess call after an
// exposure duration estimate is available.

use std::collections::HashMap;

use super::hist::InstanceStats;

/// Digits excluded from always-on consideration because their bit position is
/// too fast to resolve at the given exposure duration. Falls back to "789"
/// when the duration can't feed a logarithm at all (zero or negative).
fn exc_digits(exp_duration_sec: f64) -> &'static str {
    let ms = exp_duration_sec * 1000.0;
    if ms <= 0.0 {
        return "789";
    }
    let bit = ms.log2().trunc() as i64 + 2;
    let bit = bit.clamp(0, 10) as usize;
    &"0123456789"[bit..]
}

fn label_excluded(label: &str, exc_id: &str) -> bool {
    let chars: Vec<char> = label.chars().collect();
    if chars.is_empty() {
        return false;
    }
    let last = chars[chars.len() - 1];
    let second_last = if chars.len() >= 2 {
        chars[chars.len() - 2]
    } else {
        last
    };
    exc_id.contains(last) || exc_id.contains(second_last)
}

/// Marks LEDs whose luminance distribution is too narrow (or too bright
/// overall) to ever read "off" as always-on: their threshold is pinned to
/// tile0 so every subsequent reading is treated as "on".
pub fn apply(stat: &mut HashMap<String, InstanceStats>, exp_duration_sec: f64) {
    let exc_id = exc_digits(exp_duration_sec);

    for leds in stat.values_mut() {
        let (tile_a_min, tile_a_max) = match leds.get("all") {
            Some(all) if all.total > 0 => (all.tile0, all.tile99),
            _ => continue,
        };
        let d_tile_a = (tile_a_max - tile_a_min) as f64;

        for (label, s) in leds.iter_mut() {
            if label == "all" || s.total == 0 {
                continue;
            }
            if label_excluded(label, exc_id) {
                continue;
            }
            let d_tile = (s.tile99 - s.tile0) as f64;
            if (s.tile0 as f64) > tile_a_min as f64 + d_tile_a / 4.0 || d_tile < d_tile_a * 0.6 {
                s.th = s.tile0;
                s.on = true;
            }
        }
    }
}
