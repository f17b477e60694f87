/*
[INPUT]:  Raw URL-encoded auth strings, one per account
[OUTPUT]: Parsed credentials (account id, display name, api key, auth payload)
[POS]:    Auth layer - account identity extraction
[UPDATE]: When the auth string layout changes
*/

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer};

use crate::http::{Result, ZooError};
use crate::types::AuthRequest;

/// Platform reported to the auth endpoint regardless of the bound user agent
const AUTH_PLATFORM: &str = "android";
const AUTH_CHAT_TYPE: &str = "channel";

/// The `user` object embedded in an auth string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// One account's auth string and the fields extracted from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredential {
    raw: String,
    user: TelegramUser,
    hash: String,
    start_param: String,
    chat_instance: String,
}

impl AccountCredential {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ZooError::InvalidCredential("empty auth string".to_string()));
        }

        let mut user = None;
        let mut hash = None;
        let mut start_param = None;
        let mut chat_instance = None;

        for pair in raw.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "user" => user = Some(value),
                "hash" => hash = Some(value),
                "start_param" => start_param = Some(value),
                "chat_instance" => chat_instance = Some(value),
                _ => {}
            }
        }

        let user = user.ok_or_else(|| ZooError::InvalidCredential("missing user".to_string()))?;
        let decoded = percent_decode_str(user)
            .decode_utf8()
            .map_err(|err| ZooError::InvalidCredential(format!("user is not valid UTF-8: {err}")))?;
        let user: TelegramUser = serde_json::from_str(&decoded)
            .map_err(|err| ZooError::InvalidCredential(format!("user is not valid JSON: {err}")))?;

        let hash = hash
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| ZooError::InvalidCredential("missing hash".to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            user,
            hash: hash.to_string(),
            start_param: start_param.unwrap_or_default().to_string(),
            chat_instance: chat_instance.unwrap_or_default().to_string(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn user(&self) -> &TelegramUser {
        &self.user
    }

    /// Stable key for the user-agent cache
    pub fn account_id(&self) -> &str {
        &self.user.id
    }

    /// Sent as `Api-Key` on every call
    pub fn api_key(&self) -> &str {
        &self.hash
    }

    pub fn display_name(&self) -> String {
        let full_name = [self.user.first_name.as_deref(), self.user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }
        self.user
            .username
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.user.id.clone())
    }

    pub fn auth_request(&self) -> AuthRequest {
        AuthRequest {
            init_data: self.raw.clone(),
            start_param: self.start_param.clone(),
            photo_url: self.user.photo_url.clone().unwrap_or_default(),
            platform: AUTH_PLATFORM.to_string(),
            chat_id: String::new(),
            chat_type: AUTH_CHAT_TYPE.to_string(),
            chat_instance: self.chat_instance.clone(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(id) => id.to_string(),
        Id::Text(id) => id,
    })
}
