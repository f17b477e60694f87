/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Zoo adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AccountCredential, TelegramUser, UserAgentBinding, UserAgentStore};

// Re-export commonly used types from http
pub use http::{ClientConfig, Credentials, RequestSigner, Result, ZooClient, ZooError};

// Re-export all types
pub use types::*;
