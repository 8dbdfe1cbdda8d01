//! Types shared by the gateway's feature crates and its server layer

mod error;
mod request_id;

pub use error::HttpError;
pub use request_id::{RequestIdGenerator, UuidRequestIds};
