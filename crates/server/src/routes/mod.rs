pub mod blocks;
pub mod health;

/// Prefix of every versioned route
pub const API_VERSION: &str = "/v1";
