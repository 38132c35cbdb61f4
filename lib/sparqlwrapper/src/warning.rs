use crate::format::{ContentCategory, ReturnFormat};
use std::fmt;

/// A non-fatal problem noticed while preparing a request or converting a response.
///
/// Warnings never abort an operation: the endpoint is the authority on query validity and on the returned format.
/// They are logged with [`tracing::warn!`] when raised.
#[derive(Eq, PartialEq, Debug, Clone)]
#[non_exhaustive]
pub enum Warning {
    /// The query form could not be recognized, `SELECT` has been assumed.
    UnknownQueryType { query: String },
    /// The endpoint returned another format than the requested one.
    FormatMismatch {
        requested: ReturnFormat,
        returned: ContentCategory,
        content_type: String,
    },
    /// The response content type is missing or not supported, the raw body is returned.
    UnknownContentType { content_type: Option<String> },
}

impl Warning {
    pub(crate) fn emit(self) -> Self {
        tracing::warn!("{self}");
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownQueryType { .. } => {
                f.write_str("unknown query type, the query is assumed to be a SELECT")
            }
            Self::FormatMismatch {
                requested,
                returned,
                content_type,
            } => write!(
                f,
                "Format requested was {}, but {} ({content_type}) has been returned by the endpoint",
                requested.name().to_ascii_uppercase(),
                returned
            ),
            Self::UnknownContentType {
                content_type: Some(content_type),
            } => write!(
                f,
                "unknown response content type {content_type}, returning raw response"
            ),
            Self::UnknownContentType { content_type: None } => {
                f.write_str("no response content type, returning raw response")
            }
        }
    }
}
