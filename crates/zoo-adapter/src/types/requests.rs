/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Every game endpoint wraps its payload as `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmptyPayload {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "initData")]
    pub init_data: String,
    #[serde(rename = "startParam")]
    pub start_param: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
    pub platform: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    #[serde(rename = "chatType")]
    pub chat_type: String,
    #[serde(rename = "chatInstance")]
    pub chat_instance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyAnimalRequest {
    pub position: u32,
    #[serde(rename = "animalKey")]
    pub animal_key: String,
}

/// `[questKey, checkData]` as sent to the quest check/claim endpoints.
pub type QuestRequest = (String, Option<serde_json::Value>);

/// Feed purchase mode accepted by `/autofeed/buy`.
pub const AUTO_FEED_INSTANT: &str = "instant";
