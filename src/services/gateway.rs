use crate::cache::{FetchedPage, Fetcher};
use crate::constants::{HTTP_USER_AGENT, UPSTREAM_TIMEOUT_SECONDS};
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

/// Prefix of the routing/geocoding provider; requests here carry a bearer.
const ORS_URL_PREFIX: &str = "https://api.openrouteservice.org/";
/// Host of the bike-share provider; requests here carry an apiKey parameter.
const JCDECAUX_HOST: &str = "api.jcdecaux.com";

/// Outbound HTTP gateway. Injects provider credentials, classifies the
/// outcome into a uniform [`FetchedPage`] and never propagates an error past
/// this boundary.
#[derive(Clone)]
pub struct UpstreamGateway {
    client: Client,
    ors_bearer: Option<String>,
    jcdecaux_api_key: Option<String>,
}

impl UpstreamGateway {
    pub fn new(ors_bearer: Option<String>, jcdecaux_api_key: Option<String>) -> Self {
        UpstreamGateway {
            client: Client::new(),
            ors_bearer,
            jcdecaux_api_key,
        }
    }
}

#[async_trait]
impl Fetcher for UpstreamGateway {
    /// Append the JCDecaux API key to bike-share URLs that lack one. A URL
    /// that already carries an apiKey parameter is left untouched; a missing
    /// configured key is tolerated (the request proceeds unauthenticated).
    fn normalize(&self, url: &str) -> String {
        if !url.contains(JCDECAUX_HOST) {
            return url.to_string();
        }
        if url.to_ascii_lowercase().contains("apikey=") {
            return url.to_string();
        }

        let key = match &self.jcdecaux_api_key {
            Some(k) if !k.is_empty() => k,
            _ => return url.to_string(),
        };

        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{}{}apiKey={}", url, sep, urlencoding::encode(key))
    }

    async fn fetch(&self, url: &str) -> FetchedPage {
        let mut request = self
            .client
            .get(url)
            .header(header::USER_AGENT, HTTP_USER_AGENT)
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECONDS));

        // Bearer only for ORS; its absence is a hard failure for the call,
        // not a silent skip.
        if url.starts_with(ORS_URL_PREFIX) {
            match &self.ors_bearer {
                Some(bearer) if !bearer.trim().is_empty() => {
                    request = request.bearer_auth(bearer.trim());
                }
                _ => {
                    tracing::error!(url, "ORS_BEARER missing in configuration");
                    return FetchedPage::local_error(url, "ORS_BEARER missing in configuration");
                }
            }
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url, "Upstream request failed: {}", e);
                return FetchedPage::local_error(url, &e.to_string());
            }
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(url, "Failed to read upstream body: {}", e);
                return FetchedPage::local_error(url, &e.to_string());
            }
        };

        if status.is_success() {
            FetchedPage::new(url, body, i32::from(status.as_u16()))
        } else {
            tracing::warn!(url, status = status.as_u16(), "Upstream HTTP error");
            FetchedPage::new(
                url,
                format!("(HTTP {} {}) {}", status.as_u16(), reason, body),
                i32::from(status.as_u16()),
            )
        }
    }
}
