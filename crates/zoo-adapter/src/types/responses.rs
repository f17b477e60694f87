/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Outer response shape shared by all game endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiEnvelope {
    /// Server-provided failure reason; quest endpoints use `error`, the rest `message`.
    pub fn failure_reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|reason| !reason.trim().is_empty())
    }
}

/// Response of the base-URL lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDiscovery {
    #[serde(default)]
    pub zoo: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl EndpointDiscovery {
    /// `copyright`, falling back to `message`
    pub fn notice(&self) -> Option<&str> {
        self.copyright
            .as_deref()
            .or(self.message.as_deref())
            .filter(|notice| !notice.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyIpResponse {
    pub ip: String,
}
