//! JSON envelopes returned by the cloud API.

use std::collections::HashMap;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Response of `GET /api/v2/tokens/csrf`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsrfResponse {
    pub email: Option<String>,
    pub body: CsrfBody,
}

/// Payload of [`CsrfResponse`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsrfBody {
    pub token: String,
    pub time: i64,
    pub status: i64,
}

/// Response of `GET /api/v2/dispatcher`.
///
/// `body` maps a shard label (`"upload"`, `"get"`, ...) to its candidates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShardResponse {
    pub email: Option<String>,
    pub body: HashMap<String, Vec<ShardEntry>>,
    pub time: i64,
    pub status: i64,
}

/// One storage node candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShardEntry {
    pub url: String,
    /// The server sends this as a string; numbers are accepted too.
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub count: u64,
}

fn count_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid shard count: {:?}", s))),
    }
}
