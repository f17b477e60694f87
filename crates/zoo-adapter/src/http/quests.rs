/*
[INPUT]:  Quest keys with their optional check payloads, daily reward day numbers
[OUTPUT]: Quest verification and reward claims
[POS]:    HTTP layer - quest and daily reward endpoints
[UPDATE]: When quest payload layout changes
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{Result, ZooClient};
use crate::types::{Envelope, QuestRequest};

impl ZooClient {
    /// Ask the server to verify a quest before claiming it
    ///
    /// POST /quests/check
    pub async fn check_quest(&self, key: &str, check_data: Option<&Value>) -> Result<Value> {
        let body: Envelope<QuestRequest> = Envelope::new((key.to_string(), check_data.cloned()));
        self.call(Method::POST, "/quests/check", &body).await
    }

    /// Claim a quest reward; `check_data` is sent as `null` when absent
    ///
    /// POST /quests/claim
    pub async fn claim_quest(&self, key: &str, check_data: Option<&Value>) -> Result<Value> {
        let body: Envelope<QuestRequest> = Envelope::new((key.to_string(), check_data.cloned()));
        self.call(Method::POST, "/quests/claim", &body).await
    }

    /// Claim the daily login reward for `day`
    ///
    /// POST /quests/daily/claim
    pub async fn claim_daily_reward(&self, day: u32) -> Result<Value> {
        let body = Envelope::new(day);
        self.call(Method::POST, "/quests/daily/claim", &body).await
    }
}
