use crate::decoder::{Decoders, PLACEHOLDER_BASE_IRI};
use crate::error::ConvertError;
use crate::format::{ContentCategory, ReturnFormat};
use crate::table::write_results_table;
use crate::transport::HttpResponse;
use crate::warning::Warning;
use crate::xml::XmlDocument;
use oxrdf::Graph;
use serde_json::Value;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};

/// The response of a successful call to an endpoint.
///
/// The body is a stream that can be consumed only once, so all the methods reading it take `self` by value.
pub struct QueryResult {
    status: u16,
    url: String,
    headers: Vec<(String, String)>,
    body: Box<dyn Read>,
    requested_format: ReturnFormat,
    decoders: Decoders,
}

impl QueryResult {
    /// Wraps a raw response, remembering the format the caller asked for.
    pub fn from_response(response: HttpResponse, requested_format: ReturnFormat) -> Self {
        let (status, url, headers, body) = response.into_parts();
        Self {
            status,
            url,
            headers,
            body,
            requested_format,
            decoders: Decoders::default(),
        }
    }

    /// Sets the decoders used by [`convert`](Self::convert).
    #[must_use]
    pub fn with_decoders(mut self, decoders: Decoders) -> Self {
        self.decoders = decoders;
        self
    }

    /// The URL the request was sent to.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// All the response headers.
    #[inline]
    pub fn info(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks for a response header value, the name lookup is ASCII case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// The format that was set when the query has been sent.
    #[inline]
    pub fn requested_format(&self) -> ReturnFormat {
        self.requested_format
    }

    /// The raw body.
    pub fn into_reader(self) -> impl Read {
        self.body
    }

    /// The raw body, line by line.
    pub fn into_lines(self) -> impl Iterator<Item = io::Result<String>> {
        BufReader::new(self.body).lines()
    }

    /// Decodes the body according to the response `Content-Type`.
    ///
    /// The endpoint is authoritative: if it returned another format than the requested one,
    /// the body is decoded according to what has been returned and a [`Warning`] is logged.
    ///
    /// ```
    /// use sparqlwrapper::{ConvertedResult, HttpResponse, QueryResult, ReturnFormat};
    /// use std::io::Cursor;
    ///
    /// let response = HttpResponse::new(
    ///     200,
    ///     "http://example.com/sparql",
    ///     vec![("Content-Type".into(), "application/sparql-results+json".into())],
    ///     Cursor::new(r#"{"head":{"vars":["label"]},"results":{"bindings":[{"label":{"value":"Asturias"}}]}}"#),
    /// );
    /// let ConvertedResult::Json(json) = QueryResult::from_response(response, ReturnFormat::Json).convert()? else {
    ///     unreachable!()
    /// };
    /// assert_eq!(json["results"]["bindings"][0]["label"]["value"], "Asturias");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn convert(self) -> Result<ConvertedResult, ConvertError> {
        Ok(self.convert_with_warnings()?.0)
    }

    /// Same as [`convert`](Self::convert) but also returns the warnings raised while converting.
    pub fn convert_with_warnings(
        mut self,
    ) -> Result<(ConvertedResult, Vec<Warning>), ConvertError> {
        let Some(content_type) = self.content_type().map(str::to_owned) else {
            let warning = Warning::UnknownContentType { content_type: None }.emit();
            return Ok((ConvertedResult::Raw(self.read_body()?), vec![warning]));
        };
        let Some(category) = ContentCategory::from_content_type(&content_type) else {
            let warning = Warning::UnknownContentType {
                content_type: Some(content_type),
            }
            .emit();
            return Ok((ConvertedResult::Raw(self.read_body()?), vec![warning]));
        };
        let mut warnings = Vec::new();
        if !category.satisfies(self.requested_format) {
            warnings.push(
                Warning::FormatMismatch {
                    requested: self.requested_format,
                    returned: category,
                    content_type,
                }
                .emit(),
            );
        }

        let body = &mut self.body;
        let converted = match category {
            ContentCategory::SparqlXml => ConvertedResult::Xml(self.decoders.xml().decode(body)?),
            ContentCategory::SparqlJson => {
                ConvertedResult::Json(self.decoders.json().decode(body)?)
            }
            ContentCategory::RdfXml if self.requested_format == ReturnFormat::Xml => {
                ConvertedResult::Xml(self.decoders.xml().decode(body)?)
            }
            ContentCategory::RdfXml => {
                // The query string of GET requests is not part of the base
                let base_iri = self
                    .url
                    .split(['?', '#'])
                    .next()
                    .filter(|url| !url.is_empty())
                    .unwrap_or(PLACEHOLDER_BASE_IRI);
                ConvertedResult::Graph(self.decoders.rdf_xml().decode(body, base_iri)?)
            }
            ContentCategory::RdfN3 => {
                let mut text = Vec::new();
                body.read_to_end(&mut text)?;
                ConvertedResult::Text(String::from_utf8(text)?)
            }
        };
        Ok((converted, warnings))
    }

    /// Decodes the body as SPARQL JSON results and writes them as a text table.
    ///
    /// See [`write_results_table`] for the layout.
    pub fn print_results(
        mut self,
        min_width: Option<usize>,
        output: &mut impl Write,
    ) -> Result<(), ConvertError> {
        let results = self.decoders.json().decode(&mut self.body)?;
        write_results_table(&results, min_width, output)?;
        Ok(())
    }

    fn read_body(&mut self) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        self.body.read_to_end(&mut body)?;
        Ok(body)
    }
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("status", &self.status)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("requested_format", &self.requested_format)
            .finish_non_exhaustive()
    }
}

/// A decoded response body.
#[derive(Debug, Clone)]
pub enum ConvertedResult {
    /// [SPARQL JSON results](https://www.w3.org/TR/sparql11-results-json/).
    Json(Value),
    /// [SPARQL XML results](https://www.w3.org/TR/rdf-sparql-XMLres/) or RDF/XML when XML was requested.
    Xml(XmlDocument),
    /// An RDF/XML graph.
    Graph(Graph),
    /// Turtle, N-Triples or N3 text, not parsed.
    Text(String),
    /// The body of a response with a missing or unsupported content type.
    Raw(Vec<u8>),
}
