//! JSON wire types served by the pipower HTTP endpoint.
//!
//! The field order of [`PowerUsageResponse`] is part of the external contract,
//! so the struct declares its fields in the order they are serialized.

mod response;

pub use response::{ErrorResponse, PowerUsageResponse};

/// The only route served. Every other path redirects here.
pub const POWER_USAGE_PATH: &str = "/power_usage";
