/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform tag derived from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "ios")]
    Ios,
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Platform {
    /// Infer the platform from substring matches on a user-agent.
    ///
    /// `iPhone` / `iPad` map to ios, `Android` to android; matching is case-insensitive.
    pub fn detect(user_agent: &str) -> Self {
        let lowered = user_agent.to_ascii_lowercase();
        if lowered.contains("iphone") {
            Platform::Ios
        } else if lowered.contains("android") {
            Platform::Android
        } else if lowered.contains("ipad") {
            Platform::Ios
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quest verification kind from the quest catalog (`checkType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestCheckType {
    DonateTon,
    Invite,
    Username,
    TonWalletTransaction,
    CheckCode,
    Other(String),
}

impl QuestCheckType {
    /// Quests that can only be completed out-of-band (payments, referrals, profile edits).
    pub fn requires_manual_completion(&self) -> bool {
        matches!(
            self,
            QuestCheckType::DonateTon
                | QuestCheckType::Invite
                | QuestCheckType::Username
                | QuestCheckType::TonWalletTransaction
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuestCheckType::DonateTon => "donate_ton",
            QuestCheckType::Invite => "invite",
            QuestCheckType::Username => "username",
            QuestCheckType::TonWalletTransaction => "ton_wallet_transaction",
            QuestCheckType::CheckCode => "checkCode",
            QuestCheckType::Other(raw) => raw,
        }
    }
}

impl From<String> for QuestCheckType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "donate_ton" => QuestCheckType::DonateTon,
            "invite" => QuestCheckType::Invite,
            "username" => QuestCheckType::Username,
            "ton_wallet_transaction" => QuestCheckType::TonWalletTransaction,
            "checkCode" => QuestCheckType::CheckCode,
            _ => QuestCheckType::Other(value),
        }
    }
}

impl From<QuestCheckType> for String {
    fn from(value: QuestCheckType) -> Self {
        value.as_str().to_string()
    }
}

impl Default for QuestCheckType {
    fn default() -> Self {
        QuestCheckType::Other(String::new())
    }
}

/// State of one daily-reward slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DailyRewardState {
    CanTake,
    CannotTake,
    #[serde(other)]
    Other,
}
