use std::time::Duration;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{Error, Result};

const UNKNOWN_REASON: &str = "Unknown";
const USER_AGENT: &str = concat!("codeq-nlp-api-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

/// One JSON POST per call against a fixed endpoint. No retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers
            })
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClientBuild)?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Sends `payload` and returns the body of a `200 OK` response.
    ///
    /// Any other status becomes [`Error::Api`] and the body is not read.
    pub async fn post_json<Req>(&self, payload: &Req) -> Result<Vec<u8>>
    where
        Req: Serialize,
    {
        let body_bytes = serde_json::to_vec(payload).map_err(Error::JsonEncode)?;

        debug!(endpoint = %self.config.endpoint, "sending analysis request");
        let response = self
            .client
            .post(&self.config.endpoint)
            .body(body_bytes)
            .send()
            .await
            .map_err(Error::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = reason_phrase(&response);
            debug!(%status, %reason, "analysis request rejected");
            return Err(Error::Api { status, reason });
        }

        let body = response.bytes().await.map_err(Error::ResponseBody)?;
        trace!(bytes = body.len(), "analysis response received");
        Ok(body.to_vec())
    }
}

/// Reason phrase from the status line. hyper keeps it only when it differs from the
/// canonical one, so fall back to that, then to `Unknown`.
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| UNKNOWN_REASON.to_owned())
}
