/*
[INPUT]:  Request body string and send-time timestamp
[OUTPUT]: Checksum headers (Api-Time, api-hash)
[POS]:    HTTP layer - request signing for every game endpoint
[UPDATE]: When the server changes its checksum recipe or header names
*/

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const HEADER_API_TIME: &str = "Api-Time";
pub const HEADER_API_HASH: &str = "api-hash";
pub const HEADER_API_KEY: &str = "Api-Key";

/// Characters left untouched by browser `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Computes the server-mandated request checksum.
///
/// Format: `md5_hex(encodeURIComponent("{timestamp}_{payload}"))`.
/// This is a fixed integrity tag, not a secret-keyed MAC.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner;

impl RequestSigner {
    pub fn new() -> Self {
        Self
    }

    pub fn sign_request(&self, timestamp: u64, payload: &str) -> String {
        let combined = format!("{timestamp}_{payload}");
        let encoded = encode_uri_component(&combined);
        hex::encode(md5::compute(encoded.as_bytes()).0)
    }
}

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}
