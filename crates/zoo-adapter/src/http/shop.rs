/*
[INPUT]:  Animal keys with target positions
[OUTPUT]: Purchase and upgrade acknowledgements, instant feed purchase
[POS]:    HTTP layer - spending endpoints
[UPDATE]: When shop payloads change
*/

use reqwest::Method;

use crate::http::{Result, ZooClient};
use crate::types::{AUTO_FEED_INSTANT, BuyAnimalRequest, Envelope};

impl ZooClient {
    /// Buy `animal_key` into `position`, or upgrade it when already owned there
    ///
    /// POST /animal/buy
    pub async fn buy_animal(&self, position: u32, animal_key: &str) -> Result<serde_json::Value> {
        let body = Envelope::new(BuyAnimalRequest {
            position,
            animal_key: animal_key.to_string(),
        });
        self.call(Method::POST, "/animal/buy", &body).await
    }

    /// Buy an instant feed
    ///
    /// POST /autofeed/buy
    pub async fn buy_auto_feed(&self) -> Result<serde_json::Value> {
        let body = Envelope::new(AUTO_FEED_INSTANT);
        self.call(Method::POST, "/autofeed/buy", &body).await
    }
}
