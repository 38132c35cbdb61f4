//! HTTP transport used to reach the endpoints.

#[cfg(not(feature = "http-client"))]
mod dummy;
#[cfg(feature = "http-client")]
mod simple;

use crate::request::SparqlRequest;
use std::fmt;
use std::io::{self, Read};

#[cfg(not(feature = "http-client"))]
pub use dummy::HttpTransport;
#[cfg(feature = "http-client")]
pub use simple::HttpTransport;

/// Sends a [`SparqlRequest`] and returns the raw response.
///
/// Non-success status codes must be returned as responses and not as errors: the caller maps them to [`QueryError`](crate::QueryError) kinds.
/// Timeouts, redirections and connection handling are the transport's concern.
///
/// ```
/// use sparqlwrapper::{HttpResponse, SparqlRequest, SparqlWrapper, Transport};
/// use std::io;
///
/// struct Canned;
///
/// impl Transport for Canned {
///     fn send(&self, request: &SparqlRequest) -> io::Result<HttpResponse> {
///         Ok(HttpResponse::new(
///             200,
///             request.url(),
///             vec![("Content-Type".into(), "text/turtle".into())],
///             io::Cursor::new(b"<s> <p> <o> .".to_vec()),
///         ))
///     }
/// }
///
/// let mut sparql = SparqlWrapper::new("http://example.com/sparql").with_transport(Canned);
/// sparql.set_query("CONSTRUCT WHERE { ?s ?p ?o }");
/// let result = sparql.query()?;
/// assert_eq!(result.content_type(), Some("text/turtle"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub trait Transport {
    fn send(&self, request: &SparqlRequest) -> io::Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &SparqlRequest) -> io::Result<HttpResponse> {
        (**self).send(request)
    }
}

/// A raw HTTP response with a body that can be read only once.
pub struct HttpResponse {
    status: u16,
    url: String,
    headers: Vec<(String, String)>,
    body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(
        status: u16,
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        body: impl Read + 'static,
    ) -> Self {
        Self {
            status,
            url: url.into(),
            headers,
            body: Box::new(body),
        }
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks for a header value, the name lookup is ASCII case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_parts(self) -> (u16, String, Vec<(String, String)>, Box<dyn Read>) {
        (self.status, self.url, self.headers, self.body)
    }

    /// Reads the full body as text, replacing invalid UTF-8 sequences.
    pub(crate) fn into_text(self) -> io::Result<String> {
        let mut body = Vec::new();
        let mut reader = self.body;
        reader.read_to_end(&mut body)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
