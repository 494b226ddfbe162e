// crates/gcb-cli/src/cmd/mod.rs

pub mod dict_info;
pub mod parse;
