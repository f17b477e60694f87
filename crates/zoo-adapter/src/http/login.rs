/*
[INPUT]:  Parsed account credential and onboarding step numbers
[OUTPUT]: Server session data and onboarding acknowledgements
[POS]:    HTTP layer - session exchange and onboarding endpoints
[UPDATE]: When the auth payload or onboarding flow changes
*/

use reqwest::Method;

use crate::auth::AccountCredential;
use crate::http::{Result, ZooClient};
use crate::types::Envelope;

/// Onboarding marker completed right after the first login
pub const ONBOARDING_INITIAL_STEP: u32 = 1;
/// Onboarding marker the server requires before any feed purchase
pub const ONBOARDING_FEED_STEP: u32 = 20;

impl ZooClient {
    /// Exchange the auth string for a server session
    ///
    /// POST /telegram/auth
    pub async fn authenticate(&self, credential: &AccountCredential) -> Result<serde_json::Value> {
        let body = Envelope::new(credential.auth_request());
        self.call(Method::POST, "/telegram/auth", &body).await
    }

    /// Mark an onboarding step as finished
    ///
    /// POST /hero/onboarding/finish
    pub async fn finish_onboarding(&self, step: u32) -> Result<serde_json::Value> {
        let body = Envelope::new(step);
        self.call(Method::POST, "/hero/onboarding/finish", &body).await
    }
}
