/*
[INPUT]:  Proxy-bound client, discovery URL
[OUTPUT]: Observed egress IP, resolved game API base URL
[POS]:    HTTP layer - unsigned auxiliary requests
[UPDATE]: When probe or discovery services change
*/

use reqwest::Client;

use crate::http::{ClientConfig, Result, ZooClient, ZooError};
use crate::types::{EndpointDiscovery, ProxyIpResponse};

impl ZooClient {
    /// Report the IP the outside world sees for this client's proxy
    pub async fn probe_proxy_ip(&self) -> Result<String> {
        let response = self
            .probe_client()
            .get(self.ip_probe_url().clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZooError::api_error(
                status,
                format!("ip probe failed with status code {}", status.as_u16()),
            ));
        }

        let body: ProxyIpResponse = response.json().await?;
        Ok(body.ip)
    }

    /// Look up the current game API base URL
    ///
    /// Returns the discovered base URL and the optional notice published next to it.
    pub async fn discover_endpoint(
        discovery_url: &str,
        config: &ClientConfig,
    ) -> Result<(String, Option<String>)> {
        let client = Client::builder()
            .timeout(config.probe_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let response = client.get(discovery_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ZooError::api_error(
                status,
                format!("endpoint discovery failed with status code {}", status.as_u16()),
            ));
        }

        let discovery: EndpointDiscovery = response.json().await?;
        let notice = discovery.notice().map(str::to_string);
        let base_url = discovery
            .zoo
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ZooError::InvalidResponse("discovery response has no endpoint".to_string()))?;
        url::Url::parse(&base_url)?;

        Ok((base_url, notice))
    }
}
