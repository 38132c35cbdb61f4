use crate::decoder::Decoders;
use crate::error::QueryError;
use crate::format::{RequestMethod, ReturnFormat};
use crate::parameters::{
    Credentials, DEFAULT_GRAPH_PARAMETER, NAMED_GRAPH_PARAMETER, ParameterSet, QueryDefaults,
};
use crate::query_type::{QueryType, classify};
use crate::request::{RequestBuilder, SparqlRequest};
use crate::result::{ConvertedResult, QueryResult};
use crate::transport::{HttpTransport, Transport};
use crate::warning::Warning;
use std::fmt;

/// `User-Agent` sent when none is configured.
pub const DEFAULT_AGENT: &str = concat!("sparqlwrapper-rs/", env!("CARGO_PKG_VERSION"));

/// A client for a remote SPARQL endpoint.
///
/// It keeps its configuration (endpoints, agent, credentials, default format and graph) between queries.
/// Everything else (format, method, custom parameters) is reset each time a new query is set.
///
/// ```no_run
/// use sparqlwrapper::{ConvertedResult, ReturnFormat, SparqlWrapper};
///
/// let mut sparql = SparqlWrapper::new("http://dbpedia.org/sparql");
/// sparql.set_query(
///     "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
///     SELECT ?label WHERE { <http://dbpedia.org/resource/Asturias> rdfs:label ?label }",
/// );
/// sparql.set_return_format(ReturnFormat::Json);
/// if let ConvertedResult::Json(results) = sparql.query_and_convert()? {
///     for binding in results["results"]["bindings"].as_array().into_iter().flatten() {
///         println!("{}", binding["label"]["value"]);
///     }
/// }
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct SparqlWrapper {
    endpoint: String,
    update_endpoint: String,
    agent: String,
    defaults: QueryDefaults,
    credentials: Credentials,
    parameters: ParameterSet,
    warnings: Vec<Warning>,
    transport: Box<dyn Transport>,
    decoders: Decoders,
}

impl SparqlWrapper {
    /// Builds a client for the given endpoint, also used for updates.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let defaults = QueryDefaults::default();
        Self {
            update_endpoint: endpoint.clone(),
            endpoint,
            agent: DEFAULT_AGENT.into(),
            parameters: ParameterSet::initial(&defaults),
            defaults,
            credentials: Credentials::default(),
            warnings: Vec::new(),
            transport: Box::new(HttpTransport::default()),
            decoders: Decoders::default(),
        }
    }

    /// Sends updates to another endpoint.
    #[must_use]
    pub fn with_update_endpoint(mut self, update_endpoint: impl Into<String>) -> Self {
        self.update_endpoint = update_endpoint.into();
        self
    }

    /// Sets the format the queries are reset to.
    #[must_use]
    pub fn with_return_format(mut self, format: ReturnFormat) -> Self {
        self.defaults.return_format = format;
        self.parameters.set_return_format(format);
        self
    }

    /// Sets a `default-graph-uri` parameter kept for all queries.
    #[must_use]
    pub fn with_default_graph(mut self, default_graph: impl Into<String>) -> Self {
        let default_graph = default_graph.into();
        self.parameters
            .set_custom(DEFAULT_GRAPH_PARAMETER, default_graph.clone());
        self.defaults.default_graph = Some(default_graph);
        self
    }

    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    /// Sets how the requests are sent.
    ///
    /// By default an [`HttpTransport`] without timeout is used.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Sets the decoders given to the [`QueryResult`]s.
    #[must_use]
    pub fn with_decoders(mut self, decoders: Decoders) -> Self {
        self.decoders = decoders;
        self
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[inline]
    pub fn update_endpoint(&self) -> &str {
        &self.update_endpoint
    }

    #[inline]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// The current query, format, method and custom parameters.
    #[inline]
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    #[inline]
    pub fn query_type(&self) -> QueryType {
        self.parameters.query_type()
    }

    /// The warnings raised since the last [`set_query`](Self::set_query) or [`reset_query`](Self::reset_query).
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Resets the query and then sets it.
    ///
    /// The query form is detected from its first keyword, after the `BASE` and `PREFIX` declarations.
    /// If no form is recognized, `SELECT` is assumed and a [`Warning`] is raised:
    /// the endpoint is left to reject the query if it is actually invalid.
    ///
    /// ```
    /// use sparqlwrapper::{QueryType, SparqlWrapper};
    ///
    /// let mut sparql = SparqlWrapper::new("http://example.com/sparql");
    /// sparql.set_query("PREFIX ex: <http://example.com/> ASK { ex:s ex:p ex:o }");
    /// assert_eq!(sparql.query_type(), QueryType::Ask);
    /// assert!(sparql.warnings().is_empty());
    ///
    /// sparql.set_query("CLEAR ALL");
    /// assert_eq!(sparql.query_type(), QueryType::Select);
    /// assert_eq!(sparql.warnings().len(), 1);
    /// ```
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.reset_query();
        let query = query.into();
        let (query_type, warning) = classify(&query);
        self.parameters.set_query(query, query_type);
        self.warnings.extend(warning);
    }

    /// Restores the query, format, method and custom parameters to their defaults.
    pub fn reset_query(&mut self) {
        self.parameters = ParameterSet::initial(&self.defaults);
        self.warnings.clear();
    }

    #[inline]
    pub fn set_return_format(&mut self, format: ReturnFormat) {
        self.parameters.set_return_format(format);
    }

    /// Sets the format from its name (`json`, `xml`, `turtle`, `n3` or `rdf`).
    ///
    /// Unknown names are ignored and `false` is returned.
    pub fn try_set_return_format(&mut self, name: &str) -> bool {
        let Some(format) = ReturnFormat::from_name(name) else {
            tracing::debug!("Ignoring unknown return format {name}");
            return false;
        };
        self.set_return_format(format);
        true
    }

    #[inline]
    pub fn set_method(&mut self, method: RequestMethod) {
        self.parameters.set_method(method);
    }

    /// Sets the method from its name (`GET` or `POST`).
    ///
    /// Unknown names are ignored and `false` is returned.
    pub fn try_set_method(&mut self, name: &str) -> bool {
        let Some(method) = RequestMethod::from_name(name) else {
            tracing::debug!("Ignoring unknown request method {name}");
            return false;
        };
        self.set_method(method);
        true
    }

    /// Adds an endpoint specific parameter, replacing any previous value with the same name.
    ///
    /// Returns `false` for the reserved `query` parameter, which is not changed.
    /// Custom parameters are only sent with `GET`.
    pub fn add_custom_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        self.parameters.set_custom(name, value)
    }

    #[deprecated(note = "use add_custom_parameter(\"default-graph-uri\", uri)")]
    pub fn add_default_graph(&mut self, uri: impl Into<String>) {
        self.add_custom_parameter(DEFAULT_GRAPH_PARAMETER, uri);
    }

    #[deprecated(note = "use add_custom_parameter(\"named-graph-uri\", uri)")]
    pub fn add_named_graph(&mut self, uri: impl Into<String>) {
        self.add_custom_parameter(NAMED_GRAPH_PARAMETER, uri);
    }

    #[deprecated(note = "use add_custom_parameter")]
    pub fn add_extra_uri_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.add_custom_parameter(key, value);
    }

    /// Sets the HTTP basic authentication credentials.
    ///
    /// They are only sent if both the user and the password are non-empty.
    pub fn set_credentials(&mut self, user: impl Into<String>, password: impl Into<String>) {
        self.credentials = Credentials::new(Some(user.into()), Some(password.into()));
    }

    /// The URL of a `GET` request for the current query, whatever the current method is.
    ///
    /// ```
    /// use sparqlwrapper::SparqlWrapper;
    ///
    /// let mut sparql = SparqlWrapper::new("http://example.com/sparql");
    /// sparql.set_query("ASK {}");
    /// assert_eq!(
    ///     sparql.query_uri(),
    ///     "http://example.com/sparql?format=xml&output=xml&query=ASK+%7B%7D&results=xml"
    /// );
    /// ```
    pub fn query_uri(&self) -> String {
        let mut parameters = self.parameters.clone();
        parameters.set_method(RequestMethod::Get);
        self.request_builder().build(&parameters).url().to_owned()
    }

    /// The request [`query`](Self::query) would send.
    pub fn request(&self) -> SparqlRequest {
        self.request_builder().build(&self.parameters)
    }

    /// Sends the current query to the endpoint.
    ///
    /// Exactly one request is made. Non-success statuses are returned as [`QueryError`]s carrying the response body.
    pub fn query(&self) -> Result<QueryResult, QueryError> {
        let request = self.request();
        tracing::debug!(
            "Sending {} {} request to {}",
            self.parameters.query_type(),
            request.method(),
            request.url()
        );
        let response = self.transport.send(&request)?;
        tracing::debug!(
            "Response {} received from {}",
            response.status(),
            response.url()
        );
        if !response.is_success() {
            let status = response.status();
            let url = response.url().to_owned();
            return Err(QueryError::from_status(status, url, response.into_text()?));
        }
        Ok(
            QueryResult::from_response(response, self.parameters.return_format())
                .with_decoders(self.decoders.clone()),
        )
    }

    /// [`query`](Self::query) followed by [`QueryResult::convert`].
    pub fn query_and_convert(&self) -> Result<ConvertedResult, QueryError> {
        Ok(self.query()?.convert()?)
    }

    fn request_builder(&self) -> RequestBuilder<'_> {
        RequestBuilder {
            endpoint: &self.endpoint,
            update_endpoint: &self.update_endpoint,
            agent: &self.agent,
            credentials: &self.credentials,
        }
    }
}

impl fmt::Debug for SparqlWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparqlWrapper")
            .field("endpoint", &self.endpoint)
            .field("update_endpoint", &self.update_endpoint)
            .field("agent", &self.agent)
            .field("credentials", &self.credentials)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
