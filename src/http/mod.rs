//! HTTP protocol layer module
//!
//! Content types, cache validators, byte ranges and response builders,
//! independent of the routes that use them.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::{parse_range, ByteRange, RangeOutcome};
pub use response::{
    apply_common_headers, build_304_response, build_404_response, build_405_response,
    build_413_response, build_416_response, build_json_response, build_options_response,
};
