//! HTTP protocol layer module
//!
//! Provides body decoding and response building, decoupled from specific
//! business logic.

pub mod body;
pub mod response;

pub use response::{
    build_413_response, build_asset_response, build_error_response, build_head_response,
    build_json_response, build_no_content_response, ErrorId,
};
