use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::record::{OrderedRecord, is_present, typed_accessors};
use crate::{Error, Result};

/// Sentence fields in declaration order. Fields the service adds later are appended after these.
pub const SENTENCE_FIELDS: &[&str] = &[
    "raw_sentence",
    "position",
    "paragraph",
    "tokens",
    "tokens_filtered",
    "stems",
    "lemmas",
    "pos_tags",
    "dependencies",
    "semantic_roles",
    "chunks",
    "chunk_labels",
    "chunk_tuples",
    "truecase_sentence",
    "detruecase_sentence",
    "speech_acts",
    "speech_act_values",
    "question_types",
    "question_tags",
    "named_entities",
    "named_entities_linked",
    "named_entities_salience",
    "nes_terms",
    "nes_types",
    "nes_positions",
    "emotions",
    "sarcasm",
    "sentiments",
    "dates",
    "is_task",
    "task_subclassification",
    "task_actions",
    "coreferences",
    "compressed_sentence",
];

const RAW_SENTENCE: &str = "raw_sentence";

/// A named entity as `(tokens, type, token positions)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, Vec<usize>)")]
pub struct NamedEntity {
    pub text: String,
    pub kind: String,
    pub positions: Vec<usize>,
}

impl From<(String, String, Vec<usize>)> for NamedEntity {
    fn from((text, kind, positions): (String, String, Vec<usize>)) -> Self {
        Self {
            text,
            kind,
            positions,
        }
    }
}

/// A dependency arc as `(head, dependent, relation)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct Dependency {
    pub head: String,
    pub dependent: String,
    pub relation: String,
}

impl From<(String, String, String)> for Dependency {
    fn from((head, dependent, relation): (String, String, String)) -> Self {
        Self {
            head,
            dependent,
            relation,
        }
    }
}

/// A chunk as `(label, tokens, token positions)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, Vec<usize>)")]
pub struct ChunkTuple {
    pub label: String,
    pub text: String,
    pub positions: Vec<usize>,
}

impl From<(String, String, Vec<usize>)> for ChunkTuple {
    fn from((label, text, positions): (String, String, Vec<usize>)) -> Self {
        Self {
            label,
            text,
            positions,
        }
    }
}

/// One segmented sentence of a [`Document`](crate::Document) and its annotations.
///
/// Every annotation starts unset and is filled only when the matching pipeline stage ran.
/// Per-token lists (`tokens`, `pos_tags`, `lemmas`, ...) are index-aligned with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub(crate) record: OrderedRecord,
}

impl Sentence {
    pub fn new(raw_sentence: impl Into<String>) -> Self {
        let mut record = OrderedRecord::with_declared(SENTENCE_FIELDS);
        record.set(RAW_SENTENCE, raw_sentence.into());
        Self { record }
    }

    pub fn raw_sentence(&self) -> &str {
        self.record
            .get(RAW_SENTENCE)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn set_position(&mut self, position: usize) {
        self.record.set("position", position);
    }

    /// Assigns any field other than `raw_sentence`, including ones without a typed accessor.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        if name == RAW_SENTENCE {
            return Err(Error::ReservedField { name });
        }
        self.record.set(name, value);
        Ok(())
    }

    /// Raw JSON of a field; `None` when unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    pub fn record(&self) -> &OrderedRecord {
        &self.record
    }

    pub fn ordered_fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.record.ordered_fields()
    }

    typed_accessors! {
        /// Zero-based index of the sentence within its document.
        position: usize;
        paragraph: usize;
        tokens: Vec<String>;
        /// Tokens with stop words removed.
        tokens_filtered: Vec<String>;
        stems: Vec<String>;
        lemmas: Vec<String>;
        /// Part of speech tags, aligned with `tokens`.
        pos_tags: Vec<String>;
        /// Head, dependent and relation of each word.
        dependencies: Vec<Dependency>;
        /// Predicates, their lemmas and the typed arguments found for each.
        semantic_roles: Map<String, Value>;
        chunks: Vec<Value>;
        chunk_labels: Vec<String>;
        chunk_tuples: Vec<ChunkTuple>;
        truecase_sentence: String;
        detruecase_sentence: String;
        speech_acts: Vec<String>;
        speech_act_values: Vec<f64>;
        question_types: Vec<String>;
        question_tags: Vec<String>;
        named_entities: Vec<NamedEntity>;
        /// Disambiguated entities with their Wikipedia and Wikidata references.
        named_entities_linked: Vec<Map<String, Value>>;
        named_entities_salience: Vec<Value>;
        nes_terms: Vec<String>;
        nes_types: Vec<String>;
        nes_positions: Vec<Vec<usize>>;
        emotions: Vec<String>;
        sarcasm: String;
        sentiments: Vec<String>;
        /// Date entities with the resolved date in ISO format.
        dates: Vec<Value>;
        is_task: bool;
        task_subclassification: Vec<String>;
        task_actions: Vec<Value>;
        /// Resolved pronominal coreferences: mention, referent, first referent and chain.
        coreferences: Vec<Map<String, Value>>;
        compressed_sentence: String;
    }

    /// `token/TAG` pairs joined by spaces, rebuilt from `tokens` and `pos_tags` on every call.
    pub fn tagged_sentence(&self) -> Option<String> {
        let tags = self.pos_tags().filter(|tags| !tags.is_empty())?;
        let tokens = self.tokens()?;
        let tagged: Vec<String> = tokens
            .iter()
            .zip(&tags)
            .map(|(token, tag)| format!("{token}/{tag}"))
            .collect();
        Some(tagged.join(" "))
    }

    /// Present fields in declaration order.
    pub fn to_presentable_mapping(&self) -> Map<String, Value> {
        self.record.to_ordered_mapping(is_present)
    }

    pub fn render_json(&self) -> String {
        format!("{:#}", Value::Object(self.to_presentable_mapping()))
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sentence: {}", Value::Object(self.to_presentable_mapping()))
    }
}

impl Serialize for Sentence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_presentable_mapping().serialize(serializer)
    }
}
