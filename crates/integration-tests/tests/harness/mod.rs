#![allow(dead_code)]

pub mod config;
pub mod mock_speech;
pub mod server;

/// Token every test configuration accepts
pub const TOKEN: &str = "integration-secret";

/// `Authorization` value carrying [`TOKEN`]
pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
