use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparqlwrapper")]
/// SPARQLWrapper command line client for remote SPARQL endpoints
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a query or an update to an endpoint and print the converted result
    ///
    /// SPARQL JSON results are pretty printed, XML documents are serialized back,
    /// RDF/XML graphs are written as N-Triples and Turtle or N3 is written as returned.
    Query {
        #[command(flatten)]
        request: RequestArgs,
        /// Write the response body as returned by the endpoint, without any conversion
        #[arg(long, conflicts_with = "table")]
        raw: bool,
        /// Write SPARQL JSON results as an aligned table
        #[arg(long)]
        table: bool,
        /// Minimal width of the table columns
        #[arg(long, requires = "table")]
        min_width: Option<usize>,
    },
    /// Print the HTTP request that would be sent, without sending it
    Request {
        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(ClapArgs)]
pub struct RequestArgs {
    /// URL of the SPARQL endpoint
    #[arg(short, long, value_hint = ValueHint::Url)]
    pub endpoint: String,
    /// URL of the SPARQL update endpoint if it is not the query endpoint
    #[arg(long, value_hint = ValueHint::Url)]
    pub update_endpoint: Option<String>,
    /// The query or update to send
    ///
    /// If no query or query file is given, stdin is used.
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,
    /// File in which the query or update is stored
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub query_file: Option<PathBuf>,
    /// The result format to ask for: json, xml, turtle, n3 or rdf
    #[arg(short, long)]
    pub format: Option<String>,
    /// The HTTP method: GET or POST
    ///
    /// With POST only the query is sent, the custom parameters are ignored.
    #[arg(short, long, default_value = "GET")]
    pub method: String,
    /// Endpoint specific parameter, can be repeated
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
    /// IRI of the default graph
    #[arg(long, value_hint = ValueHint::Url)]
    pub default_graph: Option<String>,
    /// User for HTTP basic authentication
    #[arg(long, requires = "password")]
    pub user: Option<String>,
    /// Password for HTTP basic authentication
    #[arg(long, requires = "user")]
    pub password: Option<String>,
    /// User-Agent header value
    #[arg(long)]
    pub agent: Option<String>,
    /// Timeout of the HTTP call, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
