//! Annotator stages and pipeline selection.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Expands `$callback!` with every `method => Variant` pair that gets a single-stage shortcut.
macro_rules! with_stage_shortcuts {
    ($callback:ident) => {
        $callback! {
            /// Detects the language of the text.
            language => Language,
            tokenize => Tokenize,
            detokenize => Detokenize,
            /// Splits the text into sentences.
            ssplit => Ssplit,
            /// Filters stop words.
            stopword => Stopword,
            stem => Stem,
            truecase => Truecase,
            detruecase => Detruecase,
            /// Part of speech tagging.
            pos => Pos,
            lemma => Lemma,
            speechact => Speechact,
            question => Question,
            /// Named entity recognition.
            ner => Ner,
            /// Dependency parsing.
            parse => Parse,
            semantic_roles => SemanticRoles,
            coreferences => Coreference,
            date => Date,
            task => Task,
            sentiment => Sentiment,
            emotion => Emotion,
            sarcasm => Sarcasm,
            compress => Compress,
            summarize => Summarize,
            summarize_compress => SummarizeCompress,
            chunk => Chunk,
            /// Named entity linking.
            nel => Nel,
            salience => Salience,
        }
    };
}

pub(crate) use with_stage_shortcuts;

/// A named unit of analysis the service can run selectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotator {
    Language,
    Tokenize,
    Detokenize,
    Ssplit,
    Stopword,
    Stem,
    Truecase,
    Detruecase,
    Pos,
    Lemma,
    Speechact,
    Question,
    Ner,
    Parse,
    SemanticRoles,
    Coreference,
    Date,
    Task,
    Sentiment,
    Emotion,
    Sarcasm,
    Compress,
    Summarize,
    SummarizeCompress,
    Chunk,
    Nel,
    Salience,
}

impl Annotator {
    pub const ALL: [Annotator; 27] = [
        Annotator::Language,
        Annotator::Tokenize,
        Annotator::Detokenize,
        Annotator::Ssplit,
        Annotator::Stopword,
        Annotator::Stem,
        Annotator::Truecase,
        Annotator::Detruecase,
        Annotator::Pos,
        Annotator::Lemma,
        Annotator::Speechact,
        Annotator::Question,
        Annotator::Ner,
        Annotator::Parse,
        Annotator::SemanticRoles,
        Annotator::Coreference,
        Annotator::Date,
        Annotator::Task,
        Annotator::Sentiment,
        Annotator::Emotion,
        Annotator::Sarcasm,
        Annotator::Compress,
        Annotator::Summarize,
        Annotator::SummarizeCompress,
        Annotator::Chunk,
        Annotator::Nel,
        Annotator::Salience,
    ];

    /// Stage name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Annotator::Language => "language",
            Annotator::Tokenize => "tokenize",
            Annotator::Detokenize => "detokenize",
            Annotator::Ssplit => "ssplit",
            Annotator::Stopword => "stopword",
            Annotator::Stem => "stem",
            Annotator::Truecase => "truecase",
            Annotator::Detruecase => "detruecase",
            Annotator::Pos => "pos",
            Annotator::Lemma => "lemma",
            Annotator::Speechact => "speechact",
            Annotator::Question => "question",
            Annotator::Ner => "ner",
            Annotator::Parse => "parse",
            Annotator::SemanticRoles => "semantic_roles",
            Annotator::Coreference => "coreference",
            Annotator::Date => "date",
            Annotator::Task => "task",
            Annotator::Sentiment => "sentiment",
            Annotator::Emotion => "emotion",
            Annotator::Sarcasm => "sarcasm",
            Annotator::Compress => "compress",
            Annotator::Summarize => "summarize",
            Annotator::SummarizeCompress => "summarize_compress",
            Annotator::Chunk => "chunk",
            Annotator::Nel => "nel",
            Annotator::Salience => "salience",
        }
    }
}

impl fmt::Display for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown annotator '{0}'")]
pub struct UnknownAnnotator(pub String);

impl FromStr for Annotator {
    type Err = UnknownAnnotator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Annotator::ALL
            .into_iter()
            .find(|annotator| annotator.as_str() == s)
            .ok_or_else(|| UnknownAnnotator(s.to_string()))
    }
}

/// Which stages to run. Stage names are not checked locally so that stages the service adds
/// later can be requested by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Pipeline {
    /// The service's default, full pipeline (`null` on the wire).
    #[default]
    Full,
    Stages(Vec<String>),
}

impl Pipeline {
    /// Splits a comma-separated list, trimming whitespace around each stage.
    ///
    /// Empty entries are dropped; a blank string selects the full pipeline.
    ///
    /// ```
    /// use codeq_nlp_api::Pipeline;
    ///
    /// assert_eq!(
    ///     Pipeline::parse("pos, ner,sentiment").stages(),
    ///     Some(&["pos".to_string(), "ner".to_string(), "sentiment".to_string()][..])
    /// );
    /// ```
    pub fn parse(list: &str) -> Self {
        let stages: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|stage| !stage.is_empty())
            .map(str::to_owned)
            .collect();
        if stages.is_empty() {
            Pipeline::Full
        } else {
            Pipeline::Stages(stages)
        }
    }

    pub fn stages(&self) -> Option<&[String]> {
        match self {
            Pipeline::Full => None,
            Pipeline::Stages(stages) => Some(stages),
        }
    }
}

impl From<&str> for Pipeline {
    fn from(list: &str) -> Self {
        Pipeline::parse(list)
    }
}

impl From<String> for Pipeline {
    fn from(list: String) -> Self {
        Pipeline::parse(&list)
    }
}

impl From<Vec<String>> for Pipeline {
    fn from(stages: Vec<String>) -> Self {
        Pipeline::Stages(stages)
    }
}

impl From<&[&str]> for Pipeline {
    fn from(stages: &[&str]) -> Self {
        Pipeline::Stages(stages.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Pipeline {
    fn from(stages: [&str; N]) -> Self {
        Pipeline::from(&stages[..])
    }
}

impl From<Annotator> for Pipeline {
    fn from(annotator: Annotator) -> Self {
        Pipeline::Stages(vec![annotator.as_str().to_string()])
    }
}

impl From<Vec<Annotator>> for Pipeline {
    fn from(annotators: Vec<Annotator>) -> Self {
        Pipeline::Stages(annotators.iter().map(|a| a.as_str().to_string()).collect())
    }
}

impl<T: Into<Pipeline>> From<Option<T>> for Pipeline {
    fn from(selection: Option<T>) -> Self {
        selection.map(Into::into).unwrap_or_default()
    }
}

impl Serialize for Pipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.stages().serialize(serializer)
    }
}
