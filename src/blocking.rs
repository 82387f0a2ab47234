//! Synchronous client: every call blocks the calling thread until the exchange finishes.
//!
//! ```rust,no_run
//! use codeq_nlp_api::ClientConfig;
//! use codeq_nlp_api::blocking::Client;
//!
//! # fn example() -> codeq_nlp_api::Result<()> {
//! let client = Client::new(ClientConfig::new("YOUR_USER_ID", "YOUR_USER_KEY"))?;
//! let document = client.pos("The quick brown fox jumps.")?;
//! println!("{}", document.render_json());
//! # Ok(())
//! # }
//! ```
//!
//! Do not call it from inside an async runtime; use [`crate::analysis::Client`] there.

use tokio::runtime::{Builder, Runtime};

use crate::config::ClientConfig;
use crate::document::Document;
use crate::pipeline::{Annotator, Pipeline, with_stage_shortcuts};
use crate::{Error, Result, analysis};

#[derive(Debug)]
pub struct Client {
    inner: analysis::Client,
    runtime: Runtime,
}

macro_rules! blocking_shortcuts {
    ($($(#[$doc:meta])* $method:ident => $stage:ident,)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&self, text: &str) -> Result<Document> {
                self.analyze(text, Annotator::$stage, false)
            }
        )*
    };
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        let inner = analysis::Client::new(config)?;
        Ok(Self { inner, runtime })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    /// Blocking form of [`analysis::Client::analyze`].
    pub fn analyze(
        &self,
        text: &str,
        pipeline: impl Into<Pipeline>,
        include_benchmark: bool,
    ) -> Result<Document> {
        self.runtime
            .block_on(self.inner.analyze(text, pipeline, include_benchmark))
    }

    with_stage_shortcuts!(blocking_shortcuts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_server(runtime: &Runtime, status: u16) -> MockServer {
        runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(body_partial_json(json!({"pipeline": ["sentiment"]})))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "raw_text": "Nice.",
                    "sentences": [{"raw_sentence": "Nice.", "sentiments": ["positive"]}]
                })))
                .mount(&server)
                .await;
            server
        })
    }

    fn client(server: &MockServer) -> Client {
        Client::new(
            ClientConfig::new("id", "key")
                .with_endpoint(server.uri())
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[test]
    fn analyze_blocks_until_document_arrives() {
        let server_runtime = Runtime::new().unwrap();
        let server = mock_server(&server_runtime, 200);

        let document = client(&server).sentiment("Nice.").unwrap();
        let sentence = document.sentence(0).unwrap();
        assert_eq!(sentence.position(), Some(0));
        assert_eq!(sentence.sentiments(), Some(vec!["positive".to_string()]));
    }

    #[test]
    fn rejected_request_is_api_error() {
        let server_runtime = Runtime::new().unwrap();
        let server = mock_server(&server_runtime, 403);

        let err = client(&server)
            .analyze("Nice.", ["sentiment"], false)
            .unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
        assert!(err.to_string().contains("Forbidden"));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
