/*
[INPUT]:  HTTP client configuration and game endpoints
[OUTPUT]: Signed HTTP calls and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod login;
pub mod network;
pub mod quests;
pub mod shop;
pub mod signature;
pub mod user;

pub use error::{Result, ZooError};
pub use login::{ONBOARDING_FEED_STEP, ONBOARDING_INITIAL_STEP};
pub use signature::RequestSigner;

pub use client::{ClientConfig, Credentials, DEFAULT_BASE_URL, DEFAULT_IP_PROBE_URL, ZooClient};
