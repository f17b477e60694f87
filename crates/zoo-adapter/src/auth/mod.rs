/*
[INPUT]:  Raw account auth strings and the local fingerprint cache
[OUTPUT]: Parsed credentials and stable user-agent bindings
[POS]:    Auth layer - account identity for the game API
[UPDATE]: When credential format or fingerprint storage changes
*/

pub mod credential;
pub mod user_agent;

pub use credential::{AccountCredential, TelegramUser};
pub use user_agent::{DEFAULT_USER_AGENTS, UserAgentBinding, UserAgentStore};
