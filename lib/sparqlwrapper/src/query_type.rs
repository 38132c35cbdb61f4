use crate::warning::Warning;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// The prologue is consumed first: a prefix named `select:` is not a keyword.
// After it, IRIs and comments are skipped as units until the first keyword.
static QUERY_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)^(?:\s+|#[^\n]*|BASE\s*<[^>]*>|PREFIX\s+[^\s:]*:\s*<[^>]*>)*",
        r"(?:<[^>]*>|#[^\n]*|[^<#])*?",
        r"\b(CONSTRUCT|SELECT|ASK|DESCRIBE|INSERT|DELETE|MODIFY)\b",
    ))
    .unwrap()
});

/// The [SPARQL query](https://www.w3.org/TR/sparql11-query/) or [update](https://www.w3.org/TR/sparql11-update/) form.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum QueryType {
    #[default]
    Select,
    Construct,
    Ask,
    Describe,
    Insert,
    Delete,
    Modify,
}

impl QueryType {
    /// The keyword introducing this form, uppercased.
    #[inline]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Construct => "CONSTRUCT",
            Self::Ask => "ASK",
            Self::Describe => "DESCRIBE",
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::Modify => "MODIFY",
        }
    }

    /// If the operation is a SPARQL update, sent to the update endpoint with the `update` parameter.
    #[inline]
    pub const fn is_update(self) -> bool {
        matches!(self, Self::Insert | Self::Delete | Self::Modify)
    }

    /// If the operation returns solutions or a boolean (`SELECT` and `ASK`).
    #[inline]
    pub const fn returns_solutions(self) -> bool {
        matches!(self, Self::Select | Self::Ask)
    }

    /// If the operation returns an RDF graph (`CONSTRUCT` and `DESCRIBE`).
    #[inline]
    pub const fn returns_graph(self) -> bool {
        matches!(self, Self::Construct | Self::Describe)
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        [
            Self::Select,
            Self::Construct,
            Self::Ask,
            Self::Describe,
            Self::Insert,
            Self::Delete,
            Self::Modify,
        ]
        .into_iter()
        .find(|t| t.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Finds the operation type of a query text.
    ///
    /// The first form keyword wins. `BASE` and `PREFIX` declarations, comments and IRIs are skipped.
    /// No other validation is done: the endpoint is the one judging the query validity.
    ///
    /// ```
    /// use sparqlwrapper::QueryType;
    ///
    /// assert_eq!(
    ///     QueryType::detect("PREFIX ex: <http://example.com/> ask { ex:s ?p ?o }"),
    ///     Some(QueryType::Ask)
    /// );
    /// assert_eq!(QueryType::detect("FOO"), None);
    /// ```
    pub fn detect(query: &str) -> Option<Self> {
        Self::from_keyword(QUERY_TYPE_PATTERN.captures(query)?.get(1)?.as_str())
    }
}

/// Finds the operation type of a query text, falling back to `SELECT`.
///
/// The fallback raises a [`Warning::UnknownQueryType`] instead of failing.
///
/// ```
/// use sparqlwrapper::{classify, QueryType};
///
/// assert_eq!(classify("DESCRIBE <http://example.com/>"), (QueryType::Describe, None));
/// let (query_type, warning) = classify("LOAD <http://example.com/>");
/// assert_eq!(query_type, QueryType::Select);
/// assert!(warning.is_some());
/// ```
pub fn classify(query: &str) -> (QueryType, Option<Warning>) {
    match QueryType::detect(query) {
        Some(query_type) => (query_type, None),
        None => (
            QueryType::Select,
            Some(
                Warning::UnknownQueryType {
                    query: query.to_owned(),
                }
                .emit(),
            ),
        ),
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
