use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::record::{OrderedRecord, is_present, typed_accessors};
use crate::sentence::Sentence;
use crate::{Error, Result};

/// Document fields in declaration order. `sentences` always comes last.
pub const DOCUMENT_FIELDS: &[&str] = &[
    "language",
    "language_probability",
    "raw_text",
    "tokens",
    "raw_detokens",
    "summary",
    "summary_detokens",
    "compressed_summary",
    "compressed_summary_detokens",
    "keyphrases",
    "keyphrases_scored",
    "errors",
    "run_time_stats",
];

const RAW_TEXT: &str = "raw_text";
const SENTENCES: &str = "sentences";
pub(crate) const ERRORS: &str = "errors";
pub(crate) const RUN_TIME_STATS: &str = "run_time_stats";

/// Analysis result for one submitted text.
///
/// Top-level annotations live in an [`OrderedRecord`]; the sentences are owned as typed
/// [`Sentence`] values and are rendered after the other fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) record: OrderedRecord,
    pub(crate) sentences: Option<Vec<Sentence>>,
}

impl Document {
    /// Creates a document for `raw_text` with no annotations and no sentences yet.
    pub fn new(raw_text: impl Into<String>) -> Self {
        let mut record = OrderedRecord::with_declared(DOCUMENT_FIELDS);
        record.set(RAW_TEXT, raw_text.into());
        Self {
            record,
            sentences: None,
        }
    }

    /// Builds a document from already segmented sentences.
    ///
    /// The raw text is the sentences joined by newlines and each sentence gets its index
    /// as position.
    ///
    /// ```
    /// use codeq_nlp_api::Document;
    ///
    /// let document = Document::from_sentence_strings(["a", "b", "c"]);
    /// assert_eq!(document.raw_text(), "a\nb\nc");
    /// assert_eq!(document.sentences().unwrap()[2].position(), Some(2));
    /// ```
    pub fn from_sentence_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sentences: Vec<Sentence> = strings
            .into_iter()
            .enumerate()
            .map(|(position, raw)| {
                let mut sentence = Sentence::new(raw);
                sentence.set_position(position);
                sentence
            })
            .collect();
        let raw_text = sentences
            .iter()
            .map(Sentence::raw_sentence)
            .collect::<Vec<_>>()
            .join("\n");

        let mut document = Self::new(raw_text);
        document.sentences = Some(sentences);
        document
    }

    pub fn raw_text(&self) -> &str {
        self.record
            .get(RAW_TEXT)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Sentences in document order, or `None` if the document was never segmented.
    pub fn sentences(&self) -> Option<&[Sentence]> {
        self.sentences.as_deref()
    }

    pub fn sentence(&self, position: usize) -> Option<&Sentence> {
        self.sentences.as_ref()?.get(position)
    }

    /// Replaces the sentences, renumbering their positions from zero.
    pub fn set_sentences(&mut self, mut sentences: Vec<Sentence>) {
        for (position, sentence) in sentences.iter_mut().enumerate() {
            sentence.set_position(position);
        }
        self.sentences = Some(sentences);
    }

    /// Assigns a top-level field. `raw_text` and `sentences` are rejected.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        if name == RAW_TEXT || name == SENTENCES {
            return Err(Error::ReservedField { name });
        }
        self.record.set(name, value);
        Ok(())
    }

    /// Raw JSON of a record field; `None` when unset and always for `sentences`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    pub fn record(&self) -> &OrderedRecord {
        &self.record
    }

    /// Top-level record fields in declaration order.
    ///
    /// `sentences` is not part of the record; reach it through [`Document::sentences`].
    pub fn ordered_fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.record.ordered_fields()
    }

    typed_accessors! {
        /// Predicted language code.
        language: String;
        language_probability: f64;
        /// Tokens of an unsegmented document.
        tokens: Vec<String>;
        raw_detokens: Vec<String>;
        summary: String;
        summary_detokens: String;
        compressed_summary: String;
        compressed_summary_detokens: String;
        /// Keyphrases by decreasing relevance.
        keyphrases: Vec<String>;
        /// Keyphrases paired with their scores.
        keyphrases_scored: Vec<(String, f64)>;
        /// Messages collected while the document was analyzed.
        errors: Vec<String>;
        /// Per-annotator timings, only kept for benchmark requests.
        run_time_stats: Map<String, Value>;
    }

    /// Drops benchmark-only output (`errors`, `run_time_stats`).
    pub fn clear_benchmark(&mut self) {
        self.record.unset(ERRORS);
        self.record.unset(RUN_TIME_STATS);
    }

    /// Present fields in declaration order, with each sentence reduced the same way.
    pub fn to_presentable_mapping(&self) -> Map<String, Value> {
        let mut mapping = self.record.to_ordered_mapping(is_present);
        if let Some(sentences) = self.sentences.as_ref().filter(|s| !s.is_empty()) {
            let sentences = sentences
                .iter()
                .map(|sentence| Value::Object(sentence.to_presentable_mapping()))
                .collect();
            mapping.insert(SENTENCES.to_owned(), Value::Array(sentences));
        }
        mapping
    }

    /// Presentable mapping as indented JSON.
    pub fn render_json(&self) -> String {
        format!("{:#}", Value::Object(self.to_presentable_mapping()))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document: {}", Value::Object(self.to_presentable_mapping()))
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_presentable_mapping().serialize(serializer)
    }
}
