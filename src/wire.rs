//! JSON wire format of the analysis endpoint.
//!
//! Requests are a flat object with credentials, text, pipeline and benchmark flag.
//! Responses are mapped onto [`Document`]/[`Sentence`] without validating annotation values,
//! so fields the service adds later are stored rather than rejected.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::document::Document;
use crate::error::{DeserializeError, json_kind};
use crate::pipeline::Pipeline;
use crate::sentence::Sentence;

const RAW_TEXT: &str = "raw_text";
const SENTENCES: &str = "sentences";
const RAW_SENTENCE: &str = "raw_sentence";
const POSITION: &str = "position";

#[derive(Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub user_id: &'a str,
    pub user_key: &'a str,
    pub text: &'a str,
    pub pipeline: &'a Pipeline,
    pub benchmark: bool,
}

/// Decodes a response body and maps it with [`deserialize_document`].
pub fn parse_document(body: &[u8], include_benchmark: bool) -> Result<Document, DeserializeError> {
    let payload: Value = serde_json::from_slice(body).map_err(DeserializeError::Json)?;
    deserialize_document(payload, include_benchmark)
}

/// Maps a parsed response onto a [`Document`].
///
/// `raw_text` and `sentences` are required, as is `raw_sentence` on every sentence. Every
/// other key is stored under its own name. Without `include_benchmark`, `errors` and
/// `run_time_stats` are left unset whatever the payload says.
pub fn deserialize_document(
    payload: Value,
    include_benchmark: bool,
) -> Result<Document, DeserializeError> {
    const CONTEXT: &str = "document";

    let mut fields = into_object(payload, CONTEXT)?;
    let raw_text = required_str(&fields, RAW_TEXT, CONTEXT)?.to_owned();
    let items = match fields.get_mut(SENTENCES).map(Value::take) {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => {
            return Err(DeserializeError::MissingField {
                context: CONTEXT.to_string(),
                field: SENTENCES,
            });
        }
        Some(other) => {
            return Err(DeserializeError::InvalidField {
                context: CONTEXT.to_string(),
                field: SENTENCES,
                expected: "an array of objects",
                found: json_kind(&other),
            });
        }
    };

    let mut document = Document::new(raw_text);
    for (name, value) in fields {
        if name != RAW_TEXT && name != SENTENCES {
            document.record.set(name, value);
        }
    }

    let sentences = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| deserialize_sentence(item, index))
        .collect::<Result<Vec<_>, _>>()?;
    document.sentences = Some(sentences);

    if !include_benchmark {
        document.clear_benchmark();
    }
    Ok(document)
}

fn deserialize_sentence(item: Value, index: usize) -> Result<Sentence, DeserializeError> {
    let context = format!("sentence {index}");
    let fields = into_object(item, &context)?;
    let raw_sentence = required_str(&fields, RAW_SENTENCE, &context)?.to_owned();

    let mut sentence = Sentence::new(raw_sentence);
    for (name, value) in fields {
        if name != RAW_SENTENCE {
            sentence.record.set(name, value);
        }
    }

    match sentence.record.get(POSITION) {
        None => sentence.set_position(index),
        Some(position) if position.as_u64() != Some(index as u64) => {
            warn!(%position, index, "sentence position does not match its index");
        }
        Some(_) => {}
    }
    Ok(sentence)
}

fn into_object(value: Value, context: &str) -> Result<Map<String, Value>, DeserializeError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(DeserializeError::NotAnObject {
            context: context.to_string(),
            found: json_kind(&other),
        }),
    }
}

fn required_str<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
    context: &str,
) -> Result<&'a str, DeserializeError> {
    match fields.get(field) {
        Some(Value::String(text)) => Ok(text),
        None | Some(Value::Null) => Err(DeserializeError::MissingField {
            context: context.to_string(),
            field,
        }),
        Some(other) => Err(DeserializeError::InvalidField {
            context: context.to_string(),
            field,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}
