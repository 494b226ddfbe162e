// crates/gcb-core/src/lib.rs
//
// Gray-Code Beacon parser: decodes per-frame LED luminance readings from a
// recognizer pass into per-beacon exposure timing. See `preprocess::preprocess`
// for the entry point.

pub mod beacon;
pub mod binarize;
pub mod decode;
pub mod dict;
pub mod duration;
pub mod error;
pub mod input;
pub mod pattern;
pub mod pipeline;
pub mod preprocess;
pub mod remap;
pub mod result;
pub mod stats;

pub use beacon::BeaconType;
pub use error::{GcbError, Result};
pub use pipeline::{InstanceState, Pipeline};
pub use preprocess::{preprocess, PreprocessConfig, PreprocessOutput};
pub use result::{ParseResult, Section};
