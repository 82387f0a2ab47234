use reqwest::StatusCode;

/// Failure to map a response body onto a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("response body is not valid json: {0}")]
    Json(#[source] serde_json::Error),

    #[error("{context}: expected a json object, found {found}")]
    NotAnObject {
        context: String,
        found: &'static str,
    },

    #[error("{context}: missing required field `{field}`")]
    MissingField {
        context: String,
        field: &'static str,
    },

    #[error("{context}: field `{field}` must be {expected}, found {found}")]
    InvalidField {
        context: String,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http client build failed: {0}")]
    HttpClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("response body read failed: {0}")]
    ResponseBody(#[source] reqwest::Error),

    #[error("request json encode failed: {0}")]
    JsonEncode(#[source] serde_json::Error),

    #[error("api request failed with status {}: {reason}", status.as_u16())]
    Api { status: StatusCode, reason: String },

    #[error("response could not be decoded: {0}")]
    Deserialize(#[from] DeserializeError),

    #[error("field `{name}` is set at construction and cannot be reassigned")]
    ReservedField { name: String },

    #[error("missing credential `{name}` (set it in the config file or the environment)")]
    MissingCredential { name: &'static str },

    #[error("invalid value for `{name}`: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("blocking runtime build failed: {0}")]
    Runtime(#[source] std::io::Error),
}

impl Error {
    /// HTTP status of a rejected request, if this is an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// JSON type name used in decode error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_code_and_reason() {
        let err = Error::Api {
            status: StatusCode::UNAUTHORIZED,
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "api request failed with status 401: Unauthorized"
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn deserialize_error_names_context() {
        let err = Error::from(DeserializeError::MissingField {
            context: "sentence 2".to_string(),
            field: "raw_sentence",
        });
        assert!(err.to_string().contains("sentence 2"));
        assert!(err.to_string().contains("raw_sentence"));
        assert_eq!(err.status(), None);
    }
}
