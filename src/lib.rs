//! # codeq-nlp-api
//!
//! Client SDK for the Codeq natural language processing API.
//!
//! The service does the linguistic work; this crate builds requests, sends them and maps
//! the JSON answer onto [`Document`] and [`Sentence`] values whose fields keep a stable
//! declaration order when rendered back to JSON.
//!
//! ## Features
//!
//! - **Async and blocking clients**: [`analysis::Client`] for async code,
//!   [`blocking::Client`] when the caller should simply wait for the answer
//! - **Pipeline selection**: run the full pipeline, a list of stages or a
//!   comma-separated string such as `"pos, ner, sentiment"`
//! - **Forward compatible model**: annotations the client does not know yet are kept
//!   and reachable by name; well-known ones have typed accessors
//! - **Ordered output**: [`Document::render_json`] prints present fields in declaration order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codeq_nlp_api::ClientConfig;
//! use codeq_nlp_api::analysis::Client;
//!
//! # async fn example() -> codeq_nlp_api::Result<()> {
//! let client = Client::new(ClientConfig::new("YOUR_USER_ID", "YOUR_USER_KEY"))?;
//!
//! let document = client.analyze("Hello world. How are you?", "pos, ner", false).await?;
//! for sentence in document.sentences().unwrap_or_default() {
//!     println!("{:?}", sentence.tagged_sentence());
//! }
//! println!("{}", document.render_json());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`analysis`] - Async client and single-stage shortcuts
//! - [`blocking`] - Synchronous client
//! - [`record`] - Insertion-ordered field storage behind the document model
//! - [`wire`] - Response decoding

pub mod analysis;
mod api;
pub mod blocking;
mod config;
mod document;
mod error;
mod pipeline;
pub mod record;
mod reqwestx;
mod sentence;
pub mod wire;

pub use api::Analyzer;
pub use config::*;
pub use document::{DOCUMENT_FIELDS, Document};
pub use error::{DeserializeError, Error, Result};
pub use pipeline::{Annotator, Pipeline, UnknownAnnotator};
pub use record::OrderedRecord;
pub use sentence::{ChunkTuple, Dependency, NamedEntity, SENTENCE_FIELDS, Sentence};
pub use wire::{deserialize_document, parse_document};
