use std::fmt;

/// Result format asked to the SPARQL endpoint.
///
/// Turtle and N3 are the same format from the endpoints point of view: [`ReturnFormat::N3`] is an alias of [`ReturnFormat::Turtle`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum ReturnFormat {
    /// [SPARQL Query Results JSON Format](https://www.w3.org/TR/sparql11-results-json/)
    Json,
    /// [SPARQL Query Results XML Format](https://www.w3.org/TR/rdf-sparql-XMLres/) or RDF/XML depending on the query type
    #[default]
    Xml,
    /// [Turtle](https://www.w3.org/TR/turtle/) or [N3](https://www.w3.org/TeamSubmission/n3/)
    Turtle,
    /// An RDF graph, serialized as [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/)
    Rdf,
}

impl ReturnFormat {
    /// Alias of [`ReturnFormat::Turtle`].
    pub const N3: Self = Self::Turtle;

    /// The name sent to the endpoint in the format hint parameters.
    ///
    /// ```
    /// use sparqlwrapper::ReturnFormat;
    ///
    /// assert_eq!(ReturnFormat::Turtle.name(), "n3");
    /// assert_eq!(ReturnFormat::N3.name(), "n3");
    /// ```
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Turtle => "n3",
            Self::Rdf => "rdf",
        }
    }

    /// Looks for a format from its name.
    ///
    /// The lookup is ASCII case-insensitive and supports the "turtle" alias.
    ///
    /// ```
    /// use sparqlwrapper::ReturnFormat;
    ///
    /// assert_eq!(ReturnFormat::from_name("JSON"), Some(ReturnFormat::Json));
    /// assert_eq!(ReturnFormat::from_name("turtle"), Some(ReturnFormat::N3));
    /// assert_eq!(ReturnFormat::from_name("foo"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, ReturnFormat); 5] = [
            ("json", ReturnFormat::Json),
            ("n3", ReturnFormat::Turtle),
            ("rdf", ReturnFormat::Rdf),
            ("turtle", ReturnFormat::Turtle),
            ("xml", ReturnFormat::Xml),
        ];
        let name = name.trim();
        NAMES
            .into_iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, format)| format)
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP method used to call the endpoint.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

impl RequestMethod {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Looks for a method from its name (ASCII case-insensitive).
    ///
    /// ```
    /// use sparqlwrapper::RequestMethod;
    ///
    /// assert_eq!(RequestMethod::from_name("post"), Some(RequestMethod::Post));
    /// assert_eq!(RequestMethod::from_name("PUT"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [Self::Get, Self::Post]
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) const SPARQL_XML: &[&str] = &["application/sparql-results+xml"];
pub(crate) const SPARQL_JSON: &[&str] = &[
    "application/sparql-results+json",
    "text/javascript",
    "application/json",
];
pub(crate) const RDF_XML: &[&str] = &["application/rdf+xml"];
pub(crate) const RDF_N3: &[&str] = &[
    "text/rdf+n3",
    "application/n-triples",
    "application/turtle",
    "application/n3",
    "text/n3",
    "text/turtle",
];
pub(crate) const ALL: &[&str] = &["*/*"];

/// Family of media types an endpoint may answer with.
///
/// Endpoints do not agree on the media types they emit, so each family lists every variant seen in the wild.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ContentCategory {
    SparqlXml,
    SparqlJson,
    RdfXml,
    RdfN3,
}

impl ContentCategory {
    /// The categories in matching order.
    ///
    /// SPARQL XML must be tested before RDF/XML.
    pub const ORDERED: [Self; 4] = [Self::SparqlXml, Self::SparqlJson, Self::RdfXml, Self::RdfN3];

    /// The media types belonging to this category, in Accept header order.
    #[inline]
    pub const fn media_types(self) -> &'static [&'static str] {
        match self {
            Self::SparqlXml => SPARQL_XML,
            Self::SparqlJson => SPARQL_JSON,
            Self::RdfXml => RDF_XML,
            Self::RdfN3 => RDF_N3,
        }
    }

    /// The format this category canonically corresponds to.
    #[inline]
    pub const fn format(self) -> ReturnFormat {
        match self {
            Self::SparqlXml => ReturnFormat::Xml,
            Self::SparqlJson => ReturnFormat::Json,
            Self::RdfXml => ReturnFormat::Rdf,
            Self::RdfN3 => ReturnFormat::Turtle,
        }
    }

    /// If a response of this category is what the caller asked for with `requested`.
    ///
    /// RDF/XML is both XML and RDF.
    #[inline]
    pub fn satisfies(self, requested: ReturnFormat) -> bool {
        match self {
            Self::RdfXml => matches!(requested, ReturnFormat::Rdf | ReturnFormat::Xml),
            _ => self.format() == requested,
        }
    }

    /// Finds the first category with a media type contained in the given `Content-Type` header value.
    ///
    /// ```
    /// use sparqlwrapper::ContentCategory;
    ///
    /// assert_eq!(
    ///     ContentCategory::from_content_type("application/sparql-results+json; charset=utf-8"),
    ///     Some(ContentCategory::SparqlJson)
    /// );
    /// assert_eq!(
    ///     ContentCategory::from_content_type("text/turtle"),
    ///     Some(ContentCategory::RdfN3)
    /// );
    /// assert_eq!(ContentCategory::from_content_type("text/html"), None);
    /// ```
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let content_type = content_type.to_ascii_lowercase();
        Self::ORDERED.into_iter().find(|category| {
            category
                .media_types()
                .iter()
                .any(|media_type| content_type.contains(media_type))
        })
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SparqlXml => "XML",
            Self::SparqlJson => "JSON",
            Self::RdfXml => "RDF/XML",
            Self::RdfN3 => "N3",
        })
    }
}
