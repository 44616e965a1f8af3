//! Cloud API client and wire types.

pub mod client;
pub mod responses;

pub use client::ApiClient;
pub use responses::{CsrfResponse, ShardEntry, ShardResponse};
