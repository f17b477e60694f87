/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed game-state snapshot structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{DailyRewardState, QuestCheckType};

/// Format of `feed.nextFeedTime` (always UTC).
pub const FEED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Response of `/user/data/all`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub animals: Vec<OwnedAnimal>,
    #[serde(default)]
    pub feed: FeedStatus,
    #[serde(rename = "dbData", default)]
    pub db_data: ReferenceData,
}

impl GameStateSnapshot {
    pub fn animal_catalog(&self, key: &str) -> Option<&CatalogAnimal> {
        self.db_data.db_animals.iter().find(|animal| animal.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hero {
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub coins: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub tokens: Decimal,
    /// Completed onboarding markers; the server mixes numbers and strings.
    /// `None` when the field is absent or not an array.
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_list")]
    pub onboarding: Option<Vec<String>>,
}

impl Hero {
    pub fn has_onboarding_step(&self, step: &str) -> bool {
        self.onboarding
            .iter()
            .flatten()
            .any(|marker| marker == step)
    }

    /// Only an explicit empty marker list means onboarding never ran
    pub fn needs_onboarding(&self) -> bool {
        matches!(&self.onboarding, Some(markers) if markers.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedAnimal {
    pub key: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedStatus {
    #[serde(rename = "isNeedFeed", default)]
    pub is_need_feed: bool,
    #[serde(rename = "nextFeedTime", default)]
    pub next_feed_time: Option<String>,
}

impl FeedStatus {
    /// Parsed `nextFeedTime`, when present and well-formed.
    pub fn next_feed_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.next_feed_time.as_deref()?;
        NaiveDateTime::parse_from_str(raw.trim(), FEED_TIME_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Static reference tables shipped with the user data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(rename = "dbQuests", default)]
    pub db_quests: Vec<QuestDefinition>,
    #[serde(rename = "dbAnimals", default)]
    pub db_animals: Vec<CatalogAnimal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub key: String,
    #[serde(rename = "checkType", default)]
    pub check_type: QuestCheckType,
    #[serde(rename = "checkData", default)]
    pub check_data: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub reward: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAnimal {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub levels: Vec<AnimalLevel>,
}

impl CatalogAnimal {
    pub fn level(&self, level: u32) -> Option<&AnimalLevel> {
        self.levels.iter().find(|entry| entry.level == level)
    }

    /// Purchase price: the first level entry in catalog order.
    pub fn entry_price(&self) -> Option<Decimal> {
        self.levels.first().map(|entry| entry.price)
    }

    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalLevel {
    pub level: u32,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub price: Decimal,
}

/// Response of `/user/data/after`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostActionState {
    #[serde(
        rename = "dailyRewards",
        default,
        deserialize_with = "serde_helpers::deserialize_daily_rewards"
    )]
    pub daily_rewards: BTreeMap<u32, DailyRewardState>,
}

impl PostActionState {
    pub fn reward_state(&self, day: u32) -> Option<DailyRewardState> {
        self.daily_rewards.get(&day).copied()
    }
}

mod serde_helpers {
    use super::{DailyRewardState, Decimal};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        let raw = match &value {
            Value::String(raw) if raw.trim().is_empty() => return Ok(Decimal::ZERO),
            Value::String(raw) => raw.trim().to_string(),
            Value::Number(number) => number.to_string(),
            _ => return Err(serde::de::Error::custom("invalid decimal value")),
        };

        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(serde::de::Error::custom)
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize_string_list<'de, D>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(items) = value else {
            return Ok(None);
        };

        Ok(Some(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(raw) => Some(raw),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .collect()))
    }

    /// Accepts `{"1": "canTake", ...}` or a positional array where index == day.
    pub fn deserialize_daily_rewards<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<u32, DailyRewardState>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let entries: Vec<(u32, Value)> = match value {
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(day, state)| day.parse::<u32>().ok().map(|day| (day, state)))
                .collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(day, state)| (day as u32, state))
                .collect(),
            _ => Vec::new(),
        };

        Ok(entries
            .into_iter()
            .filter(|(_, state)| !state.is_null())
            .map(|(day, state)| {
                let state = serde_json::from_value(state).unwrap_or(DailyRewardState::Other);
                (day, state)
            })
            .collect())
    }
}
