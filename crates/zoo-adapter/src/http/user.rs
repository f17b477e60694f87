/*
[INPUT]:  Signed empty payloads
[OUTPUT]: Game state snapshots (hero, animals, feed, catalogs, daily rewards)
[POS]:    HTTP layer - user state endpoints
[UPDATE]: When adding new user endpoints or changing snapshot shape
*/

use reqwest::Method;

use crate::http::{Result, ZooClient};
use crate::types::{EmptyPayload, Envelope, GameStateSnapshot, PostActionState};

impl ZooClient {
    /// Fetch the full user state including reference catalogs
    ///
    /// POST /user/data/all
    pub async fn get_user_data(&self) -> Result<GameStateSnapshot> {
        let body = Envelope::new(EmptyPayload::default());
        self.call_json(Method::POST, "/user/data/all", &body).await
    }

    /// Fetch the post-action state (daily reward slots)
    ///
    /// POST /user/data/after
    pub async fn get_user_data_after(&self) -> Result<PostActionState> {
        let body = Envelope::new(EmptyPayload::default());
        self.call_json(Method::POST, "/user/data/after", &body).await
    }
}
