use crate::format::{ALL, ContentCategory, RequestMethod, ReturnFormat};
use crate::parameters::{Credentials, ParameterSet};
use crate::query_type::QueryType;
use std::collections::BTreeMap;
use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully specified HTTP request to a SPARQL endpoint.
///
/// It is built from scratch for each call and never modified afterward.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SparqlRequest {
    method: RequestMethod,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl SparqlRequest {
    #[inline]
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// The target URL, including the encoded parameters for `GET` requests.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// Looks for a header value, the name lookup is ASCII case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The form encoded payload of `POST` requests.
    #[inline]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// The `Accept` header value for a query form and a requested format.
///
/// ```
/// use sparqlwrapper::{accept_header, QueryType, ReturnFormat};
///
/// assert_eq!(
///     accept_header(QueryType::Select, ReturnFormat::Json),
///     "application/sparql-results+json,text/javascript,application/json"
/// );
/// assert_eq!(accept_header(QueryType::Insert, ReturnFormat::Json), "*/*");
/// ```
pub fn accept_header(query_type: QueryType, format: ReturnFormat) -> String {
    let media_types = if query_type.returns_solutions() {
        match format {
            ReturnFormat::Xml => ContentCategory::SparqlXml.media_types(),
            ReturnFormat::Json => ContentCategory::SparqlJson.media_types(),
            ReturnFormat::Turtle | ReturnFormat::Rdf => ALL,
        }
    } else if query_type.returns_graph() {
        match format {
            ReturnFormat::Turtle => ContentCategory::RdfN3.media_types(),
            ReturnFormat::Xml => ContentCategory::RdfXml.media_types(),
            ReturnFormat::Json | ReturnFormat::Rdf => ALL,
        }
    } else {
        ALL
    };
    media_types.join(",")
}

/// Builds [`SparqlRequest`]s for a given endpoint configuration.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    pub endpoint: &'a str,
    pub update_endpoint: &'a str,
    pub agent: &'a str,
    pub credentials: &'a Credentials,
}

impl RequestBuilder<'_> {
    /// Builds the request for the current query.
    ///
    /// Updates are sent to the update endpoint with the `update` parameter, everything else to the query endpoint with `query`.
    ///
    /// With `GET` all parameters are encoded in the URL.
    /// With `POST` only the query or update is sent, form encoded in the body: custom parameters and format hints are not sent.
    pub fn build(&self, parameters: &ParameterSet) -> SparqlRequest {
        let query_type = parameters.query_type();
        let (endpoint, key) = self.target(query_type);
        let (url, body) = match parameters.method() {
            RequestMethod::Get => (
                append_query_string(endpoint, &self.query_string(parameters)),
                None,
            ),
            RequestMethod::Post => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                serializer.append_pair(key, parameters.query());
                (endpoint.to_owned(), Some(serializer.finish().into_bytes()))
            }
        };

        let mut headers = vec![
            ("User-Agent", self.agent.to_owned()),
            (
                "Accept",
                accept_header(query_type, parameters.return_format()),
            ),
        ];
        if body.is_some() {
            headers.push(("Content-Type", FORM_CONTENT_TYPE.to_owned()));
        }
        if let Some(authorization) = self.credentials.authorization() {
            headers.push(("Authorization", authorization));
        }
        SparqlRequest {
            method: parameters.method(),
            url,
            headers,
            body,
        }
    }

    /// The `GET` parameters: custom ones, the query or update, and the format hints.
    pub fn query_string(&self, parameters: &ParameterSet) -> String {
        let (_, key) = self.target(parameters.query_type());
        let other_key = if key == "update" { "query" } else { "update" };
        let mut all = parameters
            .custom_parameters()
            .filter(|(name, _)| *name != other_key)
            .collect::<BTreeMap<_, _>>();
        all.insert(key, parameters.query());
        for (name, value) in parameters.format_hints() {
            all.insert(name, value);
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(all);
        serializer.finish()
    }

    fn target(&self, query_type: QueryType) -> (&str, &'static str) {
        if query_type.is_update() {
            (self.update_endpoint, "update")
        } else {
            (self.endpoint, "query")
        }
    }
}

fn append_query_string(endpoint: &str, query_string: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}{query_string}")
}
