// crates/gcb-cli/src/io/files.rs

use anyhow::Context;
use std::path::Path;

/// Reads and parses a JSON file, with the path attached to any error.
pub fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {} as json", path.display()))
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is None.
pub fn write_json(path: Option<&Path>, value: &serde_json::Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => std::fs::write(p, text).with_context(|| format!("write {}", p.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
