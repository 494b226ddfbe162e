// crates/gcb-core/src/decode/mod.rs
//
// C6: analytical Gray-code decoder.

pub mod analytical;

pub use analytical::decode_cl;
