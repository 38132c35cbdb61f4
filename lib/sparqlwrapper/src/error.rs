use crate::xml::XmlParseError;
use oxrdfxml::RdfXmlParseError;
use std::error::Error;
use std::io;

/// An error returned by [`SparqlWrapper::query`](crate::SparqlWrapper::query).
///
/// The 400, 404 and 500 status codes get their own kinds, carrying the response body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The endpoint returned 400: the query is malformed.
    #[error("The endpoint considers the query malformed: {0}")]
    QueryBadFormed(String),
    /// The endpoint returned 404.
    #[error("The endpoint was not found: {0}")]
    EndpointNotFound(String),
    /// The endpoint returned 500.
    #[error("The endpoint failed with an internal error: {0}")]
    EndpointInternalError(String),
    /// Another non-success status code.
    #[error("Error {status} returned by {url} with payload:\n{body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },
    /// Error from the transport (connection, TLS, timeout...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Error while decoding the response in [`SparqlWrapper::query_and_convert`](crate::SparqlWrapper::query_and_convert).
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl QueryError {
    /// The HTTP status code returned by the endpoint, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::QueryBadFormed(_) => Some(400),
            Self::EndpointNotFound(_) => Some(404),
            Self::EndpointInternalError(_) => Some(500),
            Self::Http { status, .. } => Some(*status),
            Self::Io(_) | Self::Convert(_) => None,
        }
    }

    pub(crate) fn from_status(status: u16, url: String, body: String) -> Self {
        match status {
            400 => Self::QueryBadFormed(body),
            404 => Self::EndpointNotFound(body),
            500 => Self::EndpointInternalError(body),
            _ => Self::Http { status, url, body },
        }
    }
}

impl From<QueryError> for io::Error {
    #[inline]
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::Io(error) => error,
            QueryError::Convert(error) => error.into(),
            QueryError::QueryBadFormed(_) => Self::new(io::ErrorKind::InvalidInput, error),
            QueryError::EndpointNotFound(_) => Self::new(io::ErrorKind::NotFound, error),
            QueryError::EndpointInternalError(_) | QueryError::Http { .. } => Self::other(error),
        }
    }
}

/// An error while decoding a response body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// I/O error while reading the body.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The body is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The body is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlParseError),
    /// The body is not valid RDF/XML.
    #[error(transparent)]
    RdfXml(#[from] RdfXmlParseError),
    /// The body is not valid UTF-8 text.
    #[error("The response body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// Error from a custom decoder.
    #[error("{0}")]
    Decoder(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl From<ConvertError> for io::Error {
    #[inline]
    fn from(error: ConvertError) -> Self {
        match error {
            ConvertError::Io(error) => error,
            ConvertError::Json(error) => error.into(),
            ConvertError::Xml(error) => error.into(),
            ConvertError::RdfXml(error) => error.into(),
            ConvertError::InvalidUtf8(error) => Self::new(io::ErrorKind::InvalidData, error),
            ConvertError::Decoder(error) => match error.downcast() {
                Ok(error) => *error,
                Err(error) => Self::new(io::ErrorKind::InvalidData, error),
            },
        }
    }
}
