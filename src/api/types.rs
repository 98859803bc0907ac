//! Wire types of the remote node API.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Response of `POST /user/verify`.
///
/// The token is accepted either at the top level or inside `data`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyResponse {
    pub token: Option<String>,
    pub data: Option<TokenData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenData {
    pub token: Option<String>,
}

impl VerifyResponse {
    /// The bearer token, if the response carried a non-empty one.
    pub fn into_token(self) -> Option<String> {
        self.token
            .or_else(|| self.data.and_then(|d| d.token))
            .filter(|t| !t.is_empty())
    }
}

/// Envelope of `GET /v1/node/node_stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsEnvelope {
    pub data: NodeStats,
}

/// Snapshot of a node's standing, consumed for logging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStats {
    pub has_node: bool,
    pub node_address: Option<String>,
    #[serde(deserialize_with = "flexible_number")]
    pub points: f64,
    #[serde(deserialize_with = "flexible_number")]
    pub pending_rewards: f64,
    #[serde(deserialize_with = "flexible_number")]
    pub total_distributed: f64,
    pub last_checkin_time: Option<Value>,
    #[serde(deserialize_with = "flexible_number")]
    pub card_count: f64,
}

impl NodeStats {
    /// One-line human summary used in the routine log entry.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_checkin = match &self.last_checkin_time {
            None | Some(Value::Null) => "never".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        write!(
            f,
            "Has node: {} | Node: {} | Points: {} | Pending rewards: {} | Total distributed: {} | Cards: {} | Last check-in: {}",
            self.has_node,
            self.node_address.as_deref().unwrap_or("-"),
            self.points,
            self.pending_rewards,
            self.total_distributed,
            self.card_count,
            last_checkin,
        )
    }
}

/// Accept numbers, numeric strings and null (as zero).
fn flexible_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("number {} out of range", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("'{}' is not a number", s))),
        Some(other) => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}
