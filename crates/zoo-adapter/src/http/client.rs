/*
[INPUT]:  HTTP configuration (base URL, timeouts, proxy, account credentials)
[OUTPUT]: Signed game API calls translated into typed results
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Proxy, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::auth::UserAgentBinding;
use crate::http::signature::{HEADER_API_HASH, HEADER_API_KEY, HEADER_API_TIME, RequestSigner};
use crate::http::{Result, ZooError};
use crate::types::ApiEnvelope;

/// Default game API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.zoo.team";
/// Public service echoing the caller's IP
pub const DEFAULT_IP_PROBE_URL: &str = "https://api.ipify.org?format=json";

const GAME_ORIGIN: &str = "https://game.zoo.team";
const GAME_REFERER: &str = "https://game.zoo.team/";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Deadline for the proxy IP probe and endpoint discovery
    pub probe_timeout: Duration,
    pub ip_probe_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(10),
            ip_probe_url: DEFAULT_IP_PROBE_URL.to_string(),
        }
    }
}

/// Per-account identity attached to every call
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The `hash` parameter of the account's auth string, sent as `Api-Key`
    pub api_key: String,
    pub fingerprint: UserAgentBinding,
}

/// HTTP client for the game API, bound to at most one proxy
#[derive(Debug)]
pub struct ZooClient {
    http_client: Client,
    probe_client: Client,
    base_url: Url,
    ip_probe_url: Url,
    proxy: Option<String>,
    timeout_secs: u64,
    signer: RequestSigner,
    credentials: Option<Credentials>,
}

impl ZooClient {
    /// Create a direct-connection client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a direct-connection client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL, None)
    }

    /// Create a client for an explicit base URL, optionally routed through a proxy
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        proxy: Option<&str>,
    ) -> Result<Self> {
        let proxy = proxy.map(str::trim).filter(|uri| !uri.is_empty());

        let http_client = build_http_client(config.timeout, config.connect_timeout, proxy)?;
        let probe_client =
            build_http_client(config.probe_timeout, config.connect_timeout, proxy)?;

        Ok(Self {
            http_client,
            probe_client,
            base_url: Url::parse(base_url)?,
            ip_probe_url: Url::parse(&config.ip_probe_url)?,
            proxy: proxy.map(str::to_string),
            timeout_secs: config.timeout.as_secs(),
            signer: RequestSigner::new(),
            credentials: None,
        })
    }

    /// Set credentials for signed requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for game endpoints, keeping any path prefix of the base URL
    fn endpoint_url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, endpoint.trim_start_matches('/')))
    }

    /// Issue one signed call and unwrap the `{success, data}` envelope.
    ///
    /// The body is serialized once; the exact bytes that are hashed are the bytes sent.
    /// HTTP 200 with `success: true` yields `data` (null when absent); anything else is an error.
    pub async fn call<B>(&self, method: Method, endpoint: &str, body: &B) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| ZooError::Config("credentials not set on client".to_string()))?;

        let payload = serde_json::to_string(body)?;
        let timestamp = Utc::now().timestamp().max(0) as u64;
        let api_hash = self.signer.sign_request(timestamp, &payload);

        let url = self.endpoint_url(endpoint)?;
        let builder = self
            .http_client
            .request(method.clone(), url)
            .headers(fingerprint_headers(&credentials.fingerprint)?)
            .header(HEADER_API_TIME, timestamp.to_string())
            .header(HEADER_API_HASH, api_hash)
            .header(HEADER_API_KEY, header_value(&credentials.api_key)?)
            .body(payload);

        let response = builder
            .send()
            .await
            .map_err(|err| ZooError::from_transport(err, self.timeout_secs))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ZooError::from_transport(err, self.timeout_secs))?;

        tracing::debug!(
            method = %method,
            endpoint = endpoint,
            status = status.as_u16(),
            "game api call completed"
        );

        unwrap_envelope(status, &text)
    }

    /// Same as [`ZooClient::call`], deserializing `data` into `T`
    pub async fn call_json<B, T>(&self, method: Method, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.call(method, endpoint, body).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub(crate) fn ip_probe_url(&self) -> &Url {
        &self.ip_probe_url
    }

    pub(crate) fn probe_client(&self) -> &Client {
        &self.probe_client
    }
}

fn build_http_client(
    timeout: Duration,
    connect_timeout: Duration,
    proxy: Option<&str>,
) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .default_headers(common_headers());

    if let Some(uri) = proxy {
        let proxy = Proxy::all(uri)
            .map_err(|err| ZooError::Config(format!("invalid proxy {uri}: {err}")))?;
        builder = builder.proxy(proxy);
    } else {
        builder = builder.no_proxy();
    }

    Ok(builder.build()?)
}

/// Headers shared by every account
fn common_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let pairs = [
        ("accept", "*/*"),
        ("accept-language", "en-US,en;q=0.9"),
        ("content-type", "application/json"),
        ("origin", GAME_ORIGIN),
        ("referer", GAME_REFERER),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
        ("is-beta-server", "null"),
    ];
    for (name, value) in pairs {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Headers pinned to the account's user-agent binding
fn fingerprint_headers(fingerprint: &UserAgentBinding) -> Result<HeaderMap> {
    let platform = fingerprint.platform.as_str();
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        header_value(&fingerprint.user_agent)?,
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        header_value(&format!(
            "\"Not)A;Brand\";v=\"99\", \"{platform} WebView\";v=\"127\", \"Chromium\";v=\"127\""
        ))?,
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        header_value(platform)?,
    );
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|err| ZooError::Config(format!("invalid header value: {err}")))
}

pub(crate) fn unwrap_envelope(status: StatusCode, text: &str) -> Result<serde_json::Value> {
    let envelope = serde_json::from_str::<ApiEnvelope>(text).ok();

    if status != StatusCode::OK {
        let message = envelope
            .as_ref()
            .and_then(ApiEnvelope::failure_reason)
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status code {}", status.as_u16()));
        return Err(ZooError::api_error(status, message));
    }

    let envelope = envelope.ok_or_else(|| {
        ZooError::InvalidResponse(format!("response is not a JSON envelope: {}", preview(text)))
    })?;

    if !envelope.success {
        let message = envelope
            .failure_reason()
            .unwrap_or("request was not successful")
            .to_string();
        return Err(ZooError::api_error(status, message));
    }

    Ok(envelope.data.unwrap_or(serde_json::Value::Null))
}

fn preview(text: &str) -> String {
    text.chars().take(120).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Platform;

    #[test]
    fn unwrap_envelope_returns_data_on_success() {
        let data = unwrap_envelope(StatusCode::OK, r#"{"success":true,"data":{"coins":5}}"#)
            .expect("success envelope");
        assert_eq!(data["coins"], 5);

        let empty = unwrap_envelope(StatusCode::OK, r#"{"success":true}"#).unwrap();
        assert!(empty.is_null());
    }

    #[test]
    fn unwrap_envelope_maps_failures() {
        let err = unwrap_envelope(StatusCode::OK, r#"{"success":false,"error":"already rewarded"}"#)
            .unwrap_err();
        assert!(err.is_already_rewarded());

        let err = unwrap_envelope(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").unwrap_err();
        match err {
            ZooError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "request failed with status code 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = unwrap_envelope(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ZooError::InvalidResponse(_)));
    }

    #[test]
    fn fingerprint_headers_follow_platform() {
        let binding = UserAgentBinding::new("Mozilla/5.0 (Linux; Android 13; SM-S918B)");
        let headers = fingerprint_headers(&binding).unwrap();

        assert_eq!(binding.platform, Platform::Android);
        assert_eq!(headers["sec-ch-ua-platform"], "android");
        assert!(
            headers["sec-ch-ua"]
                .to_str()
                .unwrap()
                .contains("\"android WebView\";v=\"127\"")
        );
    }

    #[test]
    fn client_rejects_malformed_proxy() {
        let err = ZooClient::with_config_and_base_url(
            ClientConfig::default(),
            DEFAULT_BASE_URL,
            Some("http://[::1"),
        )
        .unwrap_err();
        assert!(matches!(err, ZooError::Config(_)));
    }
}
