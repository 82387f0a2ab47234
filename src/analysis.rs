//! Asynchronous client for the analysis endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use codeq_nlp_api::ClientConfig;
//! use codeq_nlp_api::analysis::Client;
//!
//! # async fn example() -> codeq_nlp_api::Result<()> {
//! let client = Client::new(ClientConfig::new("YOUR_USER_ID", "YOUR_USER_KEY"))?;
//!
//! let document = client
//!     .analyze("I loved the movie. Call me tomorrow.", "sentiment, task", false)
//!     .await?;
//! for sentence in document.sentences().unwrap_or_default() {
//!     println!("{}: {:?}", sentence.raw_sentence(), sentence.sentiments());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::ClientConfig;
use crate::document::Document;
use crate::pipeline::{Annotator, Pipeline, with_stage_shortcuts};
use crate::reqwestx::{ApiClient, ApiClientConfig};
use crate::wire::{self, AnalyzeRequest};
use crate::{Analyzer, Result};

/// Client holding only immutable configuration; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct Client {
    client: ApiClient,
    user_id: String,
    user_key: SecretString,
}

macro_rules! async_shortcuts {
    ($($(#[$doc:meta])* $method:ident => $stage:ident,)*) => {
        $(
            $(#[$doc])*
            pub async fn $method(&self, text: &str) -> Result<Document> {
                self.analyze(text, Annotator::$stage, false).await
            }
        )*
    };
}

impl Client {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ApiClient::new(ApiClientConfig {
            endpoint: config.endpoint,
            timeout: config.timeout,
        })?;

        Ok(Self {
            client,
            user_id: config.user_id,
            user_key: config.user_key,
        })
    }

    /// Create a client from the `CODEQ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Analyze `text` with the selected stages.
    ///
    /// `pipeline` accepts a comma-separated string, a list of stage names or
    /// [`Annotator`]s, or `None`/[`Pipeline::Full`] for the service default.
    /// `errors` and `run_time_stats` are only kept when `include_benchmark` is set.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`](crate::Error::Api) when the service answers with anything but `200 OK`
    /// - [`Error::Deserialize`](crate::Error::Deserialize) when the body is not a document
    /// - [`Error::Request`](crate::Error::Request) on network failures and timeouts
    pub async fn analyze(
        &self,
        text: &str,
        pipeline: impl Into<Pipeline>,
        include_benchmark: bool,
    ) -> Result<Document> {
        let pipeline = pipeline.into();
        debug!(
            stages = ?pipeline.stages(),
            benchmark = include_benchmark,
            text_len = text.len(),
            "analyzing text"
        );

        let request = AnalyzeRequest {
            user_id: &self.user_id,
            user_key: self.user_key.expose_secret(),
            text,
            pipeline: &pipeline,
            benchmark: include_benchmark,
        };
        let body = self.client.post_json(&request).await?;
        let document = wire::parse_document(&body, include_benchmark)?;

        debug!(
            sentences = document.sentences().map_or(0, <[_]>::len),
            "analysis complete"
        );
        Ok(document)
    }

    with_stage_shortcuts!(async_shortcuts);
}

#[async_trait]
impl Analyzer for Client {
    async fn analyze_with(
        &self,
        text: &str,
        pipeline: Pipeline,
        include_benchmark: bool,
    ) -> Result<Document> {
        self.analyze(text, pipeline, include_benchmark).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::StatusCode;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::Error;

    fn client(server: &MockServer) -> Client {
        Client::new(
            ClientConfig::new("user-1", "key-1")
                .with_endpoint(format!("{}/v1", server.uri()))
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    fn response() -> Value {
        json!({
            "raw_text": "Great movie. Call me.",
            "sentences": [
                {"raw_sentence": "Great movie.", "position": 0, "sentiments": ["positive"]},
                {"raw_sentence": "Call me.", "position": 1, "is_task": true}
            ],
            "errors": [],
            "run_time_stats": {"sentiment": 0.2, "task": 0.1}
        })
    }

    #[tokio::test]
    async fn analyze_posts_request_and_maps_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1"))
            .and(body_json(json!({
                "user_id": "user-1",
                "user_key": "key-1",
                "text": "Great movie. Call me.",
                "pipeline": ["sentiment", "task"],
                "benchmark": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let document = client(&mock_server)
            .analyze("Great movie. Call me.", "sentiment , task", false)
            .await
            .unwrap();

        assert_eq!(document.raw_text(), "Great movie. Call me.");
        let sentences = document.sentences().unwrap();
        assert_eq!(sentences[0].sentiments(), Some(vec!["positive".to_string()]));
        assert_eq!(sentences[1].is_task(), Some(true));
        assert_eq!(document.run_time_stats(), None);
    }

    #[tokio::test]
    async fn absent_pipeline_is_sent_as_null() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({"pipeline": null, "benchmark": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let document = client(&mock_server)
            .analyze("Great movie. Call me.", None::<&str>, true)
            .await
            .unwrap();

        let stats = document.run_time_stats().unwrap();
        assert_eq!(stats["task"], json!(0.1));
    }

    #[tokio::test]
    async fn shortcuts_request_a_single_stage() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({"pipeline": ["pos"], "benchmark": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"pipeline": ["coreference"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        client.pos("Great movie. Call me.").await.unwrap();
        client.coreferences("Great movie. Call me.").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_request_reports_status_and_reason() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(response()))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .analyze("text", "pos", false)
            .await
            .unwrap_err();

        match err {
            Error::Api { status, reason } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(reason, "Unauthorized");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_deserialize_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"raw_text": "x"})))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .analyze("x", "tokenize", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response()))
            .mount(&mock_server)
            .await;

        let analyzer: Arc<dyn Analyzer> = Arc::new(client(&mock_server));
        let document = analyzer
            .analyze_with("Great movie. Call me.", Pipeline::Full, false)
            .await
            .unwrap();
        assert_eq!(document.sentences().map(<[_]>::len), Some(2));
    }
}
