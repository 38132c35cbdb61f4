//! Decoders used by [`QueryResult::convert`](crate::QueryResult::convert).
//!
//! Each response family has its own decoder trait so that the parsing library can be swapped
//! without touching the content negotiation logic.

use crate::error::ConvertError;
use crate::xml::XmlDocument;
use oxrdf::Graph;
use oxrdfxml::RdfXmlParser;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// Base IRI used for RDF/XML documents when the response URL is not a valid IRI.
pub const PLACEHOLDER_BASE_IRI: &str = "http://localhost/";

/// Decodes [SPARQL JSON results](https://www.w3.org/TR/sparql11-results-json/).
pub trait JsonDecoder: Send + Sync {
    fn decode(&self, body: &mut dyn Read) -> Result<Value, ConvertError>;
}

/// Decodes XML documents (SPARQL XML results or RDF/XML read as plain XML).
pub trait XmlDecoder: Send + Sync {
    fn decode(&self, body: &mut dyn Read) -> Result<XmlDocument, ConvertError>;
}

/// Decodes RDF/XML documents into a graph.
///
/// `base_iri` is always a non-empty IRI so that relative IRIs can be resolved.
pub trait RdfXmlDecoder: Send + Sync {
    fn decode(&self, body: &mut dyn Read, base_iri: &str) -> Result<Graph, ConvertError>;
}

/// [`JsonDecoder`] based on [`serde_json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonDecoder;

impl JsonDecoder for SerdeJsonDecoder {
    fn decode(&self, body: &mut dyn Read) -> Result<Value, ConvertError> {
        let mut buffer = Vec::new();
        body.read_to_end(&mut buffer)?;
        Ok(serde_json::from_str(&String::from_utf8(buffer)?)?)
    }
}

/// [`XmlDecoder`] based on [`quick_xml`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickXmlDecoder;

impl XmlDecoder for QuickXmlDecoder {
    fn decode(&self, body: &mut dyn Read) -> Result<XmlDocument, ConvertError> {
        Ok(XmlDocument::parse(body)?)
    }
}

/// [`RdfXmlDecoder`] based on [`oxrdfxml`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OxRdfXmlDecoder;

impl RdfXmlDecoder for OxRdfXmlDecoder {
    fn decode(&self, body: &mut dyn Read, base_iri: &str) -> Result<Graph, ConvertError> {
        let parser = match RdfXmlParser::new().with_base_iri(base_iri) {
            Ok(parser) => parser,
            Err(error) => {
                tracing::debug!("Invalid base IRI {base_iri} for RDF/XML parsing: {error}");
                RdfXmlParser::new()
                    .with_base_iri(PLACEHOLDER_BASE_IRI)
                    .unwrap_or_else(|_| RdfXmlParser::new())
            }
        };
        let mut graph = Graph::new();
        for triple in parser.for_reader(body) {
            graph.insert(&triple?);
        }
        Ok(graph)
    }
}

/// The set of decoders used to convert responses.
///
/// ```
/// use serde_json::Value;
/// use sparqlwrapper::{ConvertError, Decoders, JsonDecoder};
/// use std::io::Read;
///
/// struct NullDecoder;
///
/// impl JsonDecoder for NullDecoder {
///     fn decode(&self, _: &mut dyn Read) -> Result<Value, ConvertError> {
///         Ok(Value::Null)
///     }
/// }
///
/// let decoders = Decoders::default().with_json_decoder(NullDecoder);
/// assert_eq!(decoders.json().decode(&mut "{}".as_bytes())?, Value::Null);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone)]
pub struct Decoders {
    json: Arc<dyn JsonDecoder>,
    xml: Arc<dyn XmlDecoder>,
    rdf_xml: Arc<dyn RdfXmlDecoder>,
}

impl Decoders {
    #[must_use]
    pub fn with_json_decoder(mut self, decoder: impl JsonDecoder + 'static) -> Self {
        self.json = Arc::new(decoder);
        self
    }

    #[must_use]
    pub fn with_xml_decoder(mut self, decoder: impl XmlDecoder + 'static) -> Self {
        self.xml = Arc::new(decoder);
        self
    }

    #[must_use]
    pub fn with_rdf_xml_decoder(mut self, decoder: impl RdfXmlDecoder + 'static) -> Self {
        self.rdf_xml = Arc::new(decoder);
        self
    }

    #[inline]
    pub fn json(&self) -> &dyn JsonDecoder {
        &*self.json
    }

    #[inline]
    pub fn xml(&self) -> &dyn XmlDecoder {
        &*self.xml
    }

    #[inline]
    pub fn rdf_xml(&self) -> &dyn RdfXmlDecoder {
        &*self.rdf_xml
    }
}

impl Default for Decoders {
    fn default() -> Self {
        Self {
            json: Arc::new(SerdeJsonDecoder),
            xml: Arc::new(QuickXmlDecoder),
            rdf_xml: Arc::new(OxRdfXmlDecoder),
        }
    }
}

impl fmt::Debug for Decoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoders").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{LiteralRef, NamedNodeRef, TripleRef};

    #[test]
    fn json_results() -> Result<(), ConvertError> {
        let value = SerdeJsonDecoder.decode(
            &mut r#"{"head":{"vars":["label"]},"results":{"bindings":[{"label":{"type":"literal","value":"Asturias"}}]}}"#.as_bytes(),
        )?;
        assert_eq!(value["head"]["vars"][0], "label");
        assert_eq!(value["results"]["bindings"][0]["label"]["value"], "Asturias");
        Ok(())
    }

    #[test]
    fn json_requires_utf8() {
        assert!(matches!(
            SerdeJsonDecoder.decode(&mut [b'"', 0xFF, b'"'].as_slice()),
            Err(ConvertError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn rdf_xml_relative_iris_are_resolved() -> Result<(), ConvertError> {
        let graph = OxRdfXmlDecoder.decode(
            &mut r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <rdf:Description rdf:about="Asturias">
    <rdfs:label>Asturias</rdfs:label>
  </rdf:Description>
</rdf:RDF>"#
                .as_bytes(),
            "http://example.com/sparql",
        )?;
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(TripleRef::new(
            NamedNodeRef::new_unchecked("http://example.com/Asturias"),
            NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label"),
            LiteralRef::new_simple_literal("Asturias"),
        )));
        Ok(())
    }

    #[test]
    fn rdf_xml_invalid_base_falls_back() -> Result<(), ConvertError> {
        let graph = OxRdfXmlDecoder.decode(
            &mut r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:about="s"><rdf:value>1</rdf:value></rdf:Description></rdf:RDF>"#
                .as_bytes(),
            "not an IRI",
        )?;
        assert!(graph.iter().any(|t| t.subject.to_string() == "<http://localhost/s>"));
        Ok(())
    }
}
