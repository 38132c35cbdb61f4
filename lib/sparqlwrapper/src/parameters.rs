use crate::format::{RequestMethod, ReturnFormat};
use crate::query_type::QueryType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;

/// Query used until a query is set.
pub const PLACEHOLDER_QUERY: &str = "SELECT * WHERE{ ?s ?p ?o }";

/// Parameter names defined by the [SPARQL protocol](https://www.w3.org/TR/sparql11-protocol/) that custom parameters can't override.
pub const RESERVED_PARAMETERS: [&str; 1] = ["query"];

/// Parameter names endpoints use to choose their output format.
///
/// There is no standard name (Virtuoso uses `format`, Joseki `output`...), so all of them are sent with the same value.
pub const FORMAT_HINT_PARAMETERS: [&str; 3] = ["format", "output", "results"];

pub const DEFAULT_GRAPH_PARAMETER: &str = "default-graph-uri";
pub const NAMED_GRAPH_PARAMETER: &str = "named-graph-uri";

/// The settings a [`ParameterSet`] is reset to.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct QueryDefaults {
    pub return_format: ReturnFormat,
    pub default_graph: Option<String>,
}

/// Everything describing the next endpoint call, except where it is sent.
///
/// A fresh value is built by [`ParameterSet::initial`] each time the query changes,
/// so no custom parameter, method or format leaks from one query to the next.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParameterSet {
    query: String,
    query_type: QueryType,
    return_format: ReturnFormat,
    method: RequestMethod,
    custom: BTreeMap<String, String>,
}

impl ParameterSet {
    /// The state right after construction or [`SparqlWrapper::reset_query`](crate::SparqlWrapper::reset_query).
    ///
    /// ```
    /// use sparqlwrapper::{ParameterSet, QueryDefaults, RequestMethod, ReturnFormat};
    ///
    /// let parameters = ParameterSet::initial(&QueryDefaults {
    ///     return_format: ReturnFormat::Json,
    ///     default_graph: Some("http://example.com/g".into()),
    /// });
    /// assert_eq!(parameters.return_format(), ReturnFormat::Json);
    /// assert_eq!(parameters.method(), RequestMethod::Get);
    /// assert_eq!(
    ///     parameters.custom_parameter("default-graph-uri"),
    ///     Some("http://example.com/g")
    /// );
    /// ```
    pub fn initial(defaults: &QueryDefaults) -> Self {
        let mut custom = BTreeMap::new();
        if let Some(default_graph) = &defaults.default_graph {
            custom.insert(DEFAULT_GRAPH_PARAMETER.into(), default_graph.clone());
        }
        Self {
            query: PLACEHOLDER_QUERY.into(),
            query_type: QueryType::Select,
            return_format: defaults.return_format,
            method: RequestMethod::Get,
            custom,
        }
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    #[inline]
    pub fn return_format(&self) -> ReturnFormat {
        self.return_format
    }

    #[inline]
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub(crate) fn set_query(&mut self, query: String, query_type: QueryType) {
        self.query = query;
        self.query_type = query_type;
    }

    pub(crate) fn set_return_format(&mut self, return_format: ReturnFormat) {
        self.return_format = return_format;
    }

    pub(crate) fn set_method(&mut self, method: RequestMethod) {
        self.method = method;
    }

    /// Sets a custom parameter, replacing any previous value.
    ///
    /// Returns `false` without changing anything if `name` is a reserved protocol parameter like `query`.
    ///
    /// ```
    /// use sparqlwrapper::{ParameterSet, QueryDefaults};
    ///
    /// let mut parameters = ParameterSet::initial(&QueryDefaults::default());
    /// assert!(parameters.set_custom("should-sponge", "soft"));
    /// assert!(!parameters.set_custom("query", "ASK {}"));
    /// assert_eq!(parameters.custom_parameter("should-sponge"), Some("soft"));
    /// assert_eq!(parameters.custom_parameter("query"), None);
    /// ```
    pub fn set_custom(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if RESERVED_PARAMETERS.contains(&name.as_str()) {
            return false;
        }
        self.custom.insert(name, value.into());
        true
    }

    pub fn custom_parameter(&self, name: &str) -> Option<&str> {
        self.custom.get(name).map(String::as_str)
    }

    /// The custom parameters, sorted by name.
    pub fn custom_parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The format hint parameters, all of them set to the current format name.
    pub fn format_hints(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        let name = self.return_format.name();
        FORMAT_HINT_PARAMETERS.into_iter().map(move |key| (key, name))
    }
}

/// HTTP basic authentication credentials.
#[derive(Eq, PartialEq, Clone, Default)]
pub struct Credentials {
    user: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(user: Option<String>, password: Option<String>) -> Self {
        Self { user, password }
    }

    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The `Authorization` header value, only if both the user and the password are set.
    ///
    /// ```
    /// use sparqlwrapper::Credentials;
    ///
    /// let credentials = Credentials::new(Some("Aladdin".into()), Some("open sesame".into()));
    /// assert_eq!(
    ///     credentials.authorization().as_deref(),
    ///     Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
    /// );
    /// assert_eq!(Credentials::new(Some("Aladdin".into()), None).authorization(), None);
    /// ```
    pub fn authorization(&self) -> Option<String> {
        let user = self.user.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some(format!(
            "Basic {}",
            STANDARD.encode(format!("{user}:{password}"))
        ))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
