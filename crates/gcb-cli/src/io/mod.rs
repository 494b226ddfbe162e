// crates/gcb-cli/src/io/mod.rs

pub mod files;
