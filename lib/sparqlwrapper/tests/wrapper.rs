#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use sparqlwrapper::*;
use std::cell::RefCell;
use std::error::Error;
use std::io::{self, Cursor};
use std::rc::Rc;
use url::form_urlencoded;

const ENDPOINT: &str = "http://dbpedia.org/sparql";
const UPDATE_ENDPOINT: &str = "http://dbpedia.org/update";

const ASTURIAS_JSON: &str = r#"{"head":{"vars":["label"]},"results":{"bindings":[{"label":{"type":"literal","xml:lang":"es","value":"Asturias"}}]}}"#;

/// Replays a single response and records the requests it gets.
#[derive(Clone)]
struct RecordingTransport {
    status: u16,
    content_type: Option<&'static str>,
    body: &'static str,
    requests: Rc<RefCell<Vec<SparqlRequest>>>,
}

impl RecordingTransport {
    fn new(status: u16, content_type: Option<&'static str>, body: &'static str) -> Self {
        Self {
            status,
            content_type,
            body,
            requests: Rc::default(),
        }
    }

    fn requests(&self) -> Vec<SparqlRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &SparqlRequest) -> io::Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        Ok(HttpResponse::new(
            self.status,
            request.url(),
            self.content_type
                .map(|ct| vec![("Content-Type".to_owned(), ct.to_owned())])
                .unwrap_or_default(),
            Cursor::new(self.body.as_bytes().to_vec()),
        ))
    }
}

struct FailingTransport;

impl Transport for FailingTransport {
    fn send(&self, _: &SparqlRequest) -> io::Result<HttpResponse> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }
}

fn wrapper(transport: &RecordingTransport) -> SparqlWrapper {
    SparqlWrapper::new(ENDPOINT)
        .with_update_endpoint(UPDATE_ENDPOINT)
        .with_transport(transport.clone())
}

fn form_keys(encoded: &str) -> Vec<String> {
    form_urlencoded::parse(encoded.as_bytes())
        .map(|(k, _)| k.into_owned())
        .collect()
}

#[test]
fn test_select_json_round_trip() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(
        200,
        Some("application/sparql-results+json; charset=utf-8"),
        ASTURIAS_JSON,
    );
    let mut sparql = wrapper(&transport);
    sparql.set_query(
        "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
        SELECT ?label WHERE { <http://dbpedia.org/resource/Asturias> rdfs:label ?label }",
    );
    sparql.set_return_format(ReturnFormat::Json);
    let ConvertedResult::Json(results) = sparql.query_and_convert()? else {
        panic!("JSON results expected")
    };
    assert_eq!(results["results"]["bindings"][0]["label"]["value"], "Asturias");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method(), RequestMethod::Get);
    assert!(request.url().starts_with("http://dbpedia.org/sparql?"));
    let accept = request.header("Accept").unwrap_or_default();
    for media_type in [
        "application/sparql-results+json",
        "text/javascript",
        "application/json",
    ] {
        assert!(accept.contains(media_type));
    }
    assert!(!accept.contains("turtle"));
    Ok(())
}

#[test]
fn test_post_select() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(200, Some("application/json"), ASTURIAS_JSON);
    let mut sparql = wrapper(&transport);
    sparql.set_query("SELECT ?s ?p ?o WHERE {?s ?p ?o}");
    assert_eq!(sparql.query_type(), QueryType::Select);
    sparql.set_method(RequestMethod::Post);
    sparql.set_return_format(ReturnFormat::Json);
    sparql.add_custom_parameter("should-sponge", "soft");
    sparql.query()?;

    let request = &transport.requests()[0];
    assert_eq!(request.method(), RequestMethod::Post);
    assert_eq!(request.url(), ENDPOINT);
    assert_eq!(
        request.body(),
        Some(b"query=SELECT+%3Fs+%3Fp+%3Fo+WHERE+%7B%3Fs+%3Fp+%3Fo%7D".as_slice())
    );
    assert_eq!(request.header("Content-Type"), Some(FORM_CONTENT_TYPE));
    assert!(
        request
            .header("Accept")
            .is_some_and(|a| a.contains("application/sparql-results+json"))
    );
    Ok(())
}

#[test]
fn test_construct_turtle() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(
        200,
        Some("text/turtle"),
        "<http://example.com/s> <http://example.com/p> <http://example.com/o> .\n",
    );
    let mut sparql = wrapper(&transport);
    sparql.set_query("CONSTRUCT WHERE { ?s ?p ?o } LIMIT 1");
    sparql.set_return_format(ReturnFormat::Turtle);
    let ConvertedResult::Text(text) = sparql.query_and_convert()? else {
        panic!("text expected")
    };
    assert!(text.starts_with("<http://example.com/s>"));
    let accept = transport.requests()[0]
        .header("Accept")
        .unwrap_or_default()
        .to_owned();
    assert!(accept.contains("text/turtle"));
    assert!(accept.contains("application/n-triples"));
    assert!(!accept.contains("sparql-results+json"));
    Ok(())
}

#[test]
fn test_commented_construct_negotiates_rdf() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(200, Some("text/turtle"), "");
    let mut sparql = wrapper(&transport);
    sparql.set_query("# fetch the graph\nCONSTRUCT WHERE { ?s ?p ?o }");
    assert_eq!(sparql.query_type(), QueryType::Construct);
    assert!(sparql.warnings().is_empty());
    sparql.set_return_format(ReturnFormat::Turtle);
    sparql.query()?;

    let request = &transport.requests()[0];
    assert!(request.url().starts_with(ENDPOINT));
    assert_eq!(
        request.header("Accept"),
        Some(accept_header(QueryType::Construct, ReturnFormat::Turtle).as_str())
    );
    assert!(request.header("Accept").is_some_and(|a| a.contains("text/turtle")));
    Ok(())
}

#[test]
fn test_updates_use_update_endpoint() -> Result<(), Box<dyn Error>> {
    for (query, method) in [
        ("INSERT DATA { <http://example.com/s> <http://example.com/p> 1 }", RequestMethod::Get),
        ("DELETE WHERE { ?s ?p ?o }", RequestMethod::Post),
        ("modify delete { ?s ?p ?o } where { ?s ?p ?o }", RequestMethod::Post),
        (
            "WITH <http://example.com/g> DELETE { ?s ?p ?o } INSERT { ?s ?p 1 } WHERE { ?s ?p ?o }",
            RequestMethod::Get,
        ),
        (
            "WITH <http://example.com/g> DELETE { ?s ?p ?o } WHERE { ?s ?p ?o }",
            RequestMethod::Post,
        ),
    ] {
        let transport = RecordingTransport::new(204, None, "");
        let mut sparql = wrapper(&transport);
        sparql.set_query(query);
        assert!(sparql.query_type().is_update());
        sparql.set_method(method);
        sparql.query()?;

        let request = &transport.requests()[0];
        assert!(request.url().starts_with(UPDATE_ENDPOINT));
        assert_eq!(request.header("Accept"), Some("*/*"));
        let keys = match method {
            RequestMethod::Get => form_keys(request.url().split_once('?').map_or("", |(_, q)| q)),
            RequestMethod::Post => form_keys(&String::from_utf8(
                request.body().unwrap_or_default().to_vec(),
            )?),
        };
        assert!(keys.contains(&"update".to_owned()));
        assert!(!keys.contains(&"query".to_owned()));
    }
    Ok(())
}

#[test]
fn test_status_errors_carry_body() {
    let cases = [
        (400, "Virtuoso 37000 Error SP030: SPARQL compiler"),
        (404, "No such endpoint"),
        (500, "Internal failure"),
        (503, "Try later"),
    ];
    for (status, body) in cases {
        let transport = RecordingTransport::new(status, Some("text/plain"), body);
        let mut sparql = wrapper(&transport);
        sparql.set_query("SELECT * WHERE { ?s ?p }");
        let error = match sparql.query() {
            Ok(result) => panic!("{status} should fail, got {result:?}"),
            Err(error) => error,
        };
        assert_eq!(error.status(), Some(status));
        match (status, error) {
            (400, QueryError::QueryBadFormed(b))
            | (404, QueryError::EndpointNotFound(b))
            | (500, QueryError::EndpointInternalError(b))
            | (503, QueryError::Http { body: b, .. }) => assert_eq!(b, body),
            (_, error) => panic!("unexpected error for {status}: {error}"),
        }
        assert_eq!(transport.requests().len(), 1);
    }
}

#[test]
fn test_transport_errors_are_propagated() {
    let mut sparql = SparqlWrapper::new(ENDPOINT).with_transport(FailingTransport);
    sparql.set_query("ASK {}");
    match sparql.query() {
        Err(QueryError::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::ConnectionRefused),
        other => panic!("transport error expected, got {other:?}"),
    }
}

#[test]
fn test_format_mismatch_is_a_warning() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(
        200,
        Some("application/rdf+xml"),
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <rdf:Description rdf:about="http://dbpedia.org/resource/Asturias"><rdfs:label>Asturias</rdfs:label></rdf:Description>
</rdf:RDF>"#,
    );
    let mut sparql = wrapper(&transport);
    sparql.set_query("DESCRIBE <http://dbpedia.org/resource/Asturias>");
    sparql.set_return_format(ReturnFormat::Json);
    let (converted, warnings) = sparql.query()?.convert_with_warnings()?;
    let ConvertedResult::Graph(graph) = converted else {
        panic!("graph expected")
    };
    assert_eq!(graph.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0],
        Warning::FormatMismatch {
            requested: ReturnFormat::Json,
            returned: ContentCategory::RdfXml,
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_unknown_content_type_returns_raw_body() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(200, Some("text/csv"), "label\nAsturias\n");
    let mut sparql = wrapper(&transport);
    sparql.set_query("SELECT ?label WHERE { ?s ?p ?label }");
    let (converted, warnings) = sparql.query()?.convert_with_warnings()?;
    assert!(matches!(converted, ConvertedResult::Raw(body) if body == b"label\nAsturias\n"));
    assert!(matches!(
        warnings.as_slice(),
        [Warning::UnknownContentType { content_type: Some(ct) }] if ct == "text/csv"
    ));
    Ok(())
}

#[test]
fn test_unknown_query_type_warns_once() {
    let transport = RecordingTransport::new(200, None, "");
    let mut sparql = wrapper(&transport);
    sparql.set_query("LOAD <http://example.com/data.ttl>");
    assert_eq!(sparql.query_type(), QueryType::Select);
    assert_eq!(sparql.warnings().len(), 1);
    assert!(matches!(
        &sparql.warnings()[0],
        Warning::UnknownQueryType { query } if query.starts_with("LOAD")
    ));
    sparql.set_query("ASK {}");
    assert!(sparql.warnings().is_empty());
}

#[test]
fn test_set_query_resets_state() {
    let transport = RecordingTransport::new(200, None, "");
    let mut sparql = wrapper(&transport).with_return_format(ReturnFormat::Json);
    let defaults = sparql.parameters().clone();
    sparql.set_query("ASK {}");
    sparql.set_method(RequestMethod::Post);
    sparql.set_return_format(ReturnFormat::Xml);
    assert!(sparql.add_custom_parameter("timeout", "10"));
    assert!(!sparql.add_custom_parameter("query", "SELECT * {}"));
    assert_eq!(sparql.parameters().query(), "ASK {}");

    sparql.set_query("DESCRIBE <http://example.com/>");
    assert_eq!(sparql.parameters().method(), RequestMethod::Get);
    assert_eq!(sparql.parameters().return_format(), ReturnFormat::Json);
    assert_eq!(sparql.parameters().custom_parameter("timeout"), None);

    sparql.reset_query();
    assert_eq!(sparql.parameters(), &defaults);
}

#[test]
fn test_get_parameters() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(200, None, "");
    let mut sparql = SparqlWrapper::new("http://example.com/sparql?key=secret")
        .with_default_graph("http://example.com/graph")
        .with_agent("my-agent")
        .with_transport(transport.clone());
    sparql.set_query("SELECT * WHERE { ?s ?p ?o }");
    sparql.add_custom_parameter(NAMED_GRAPH_PARAMETER, "http://example.com/named");
    sparql.add_custom_parameter("format", "csv");
    sparql.query()?;

    let request = &transport.requests()[0];
    assert_eq!(request.header("User-Agent"), Some("my-agent"));
    let (endpoint, query_string) = request.url().split_once("?key=secret&").unwrap_or_default();
    assert_eq!(endpoint, "http://example.com/sparql");
    let pairs = form_urlencoded::parse(query_string.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect::<Vec<_>>();
    let expected = [
        ("default-graph-uri", "http://example.com/graph"),
        ("format", "xml"),
        ("named-graph-uri", "http://example.com/named"),
        ("output", "xml"),
        ("query", "SELECT * WHERE { ?s ?p ?o }"),
        ("results", "xml"),
    ];
    assert_eq!(
        pairs,
        expected.map(|(k, v)| (k.to_owned(), v.to_owned()))
    );
    assert_eq!(sparql.query_uri(), request.url());
    Ok(())
}

#[test]
fn test_custom_decoders_are_used() -> Result<(), Box<dyn Error>> {
    struct CountingDecoder;

    impl JsonDecoder for CountingDecoder {
        fn decode(&self, body: &mut dyn io::Read) -> Result<serde_json::Value, ConvertError> {
            Ok(io::copy(body, &mut io::sink())?.into())
        }
    }

    let transport = RecordingTransport::new(200, Some("application/json"), "{}");
    let mut sparql = wrapper(&transport)
        .with_decoders(Decoders::default().with_json_decoder(CountingDecoder));
    sparql.set_query("SELECT * {}");
    sparql.set_return_format(ReturnFormat::Json);
    let ConvertedResult::Json(value) = sparql.query_and_convert()? else {
        panic!("JSON expected")
    };
    assert_eq!(value, 2);
    Ok(())
}

#[test]
fn test_print_results() -> Result<(), Box<dyn Error>> {
    let transport = RecordingTransport::new(200, Some("application/json"), ASTURIAS_JSON);
    let mut sparql = wrapper(&transport);
    sparql.set_query("SELECT ?label {}");
    sparql.set_return_format(ReturnFormat::Json);
    let mut output = Vec::new();
    sparql.query()?.print_results(None, &mut output)?;
    assert_eq!(
        String::from_utf8(output)?,
        "?label   | \n===========\nAsturias | \n"
    );
    Ok(())
}
