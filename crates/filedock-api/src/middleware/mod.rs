//! HTTP middleware.

pub mod cors;
pub mod logging;

pub use cors::build_cors_layer;
