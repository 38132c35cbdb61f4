use crate::cli::{Args, Command, RequestArgs};
use anyhow::{Context, ensure};
use clap::Parser;
use sparqlwrapper::{ConvertedResult, HttpTransport, QueryResult, SparqlRequest, SparqlWrapper};
use std::fs;
use std::io::{self, Write, stdin, stdout};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

const REDIRECTION_LIMIT: usize = 5;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match Args::parse().command {
        Command::Query {
            request,
            raw,
            table,
            min_width,
        } => {
            let endpoint = request.endpoint.clone();
            let sparql = build_wrapper(request)?;
            let result = sparql
                .query()
                .with_context(|| format!("The query to {endpoint} failed"))?;
            let mut stdout = stdout().lock();
            let output = if raw {
                Output::Raw
            } else if table {
                Output::Table { min_width }
            } else {
                Output::Converted
            };
            write_result(result, output, &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
        Command::Request { request } => {
            let sparql = build_wrapper(request)?;
            let mut stdout = stdout().lock();
            write_request(&sparql.request(), &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn build_wrapper(args: RequestArgs) -> anyhow::Result<SparqlWrapper> {
    let query = if let Some(query) = args.query {
        query
    } else if let Some(query_file) = args.query_file {
        fs::read_to_string(&query_file).with_context(|| {
            format!("Not able to read query file {}", query_file.display())
        })?
    } else {
        io::read_to_string(stdin().lock())?
    };

    let mut sparql = SparqlWrapper::new(args.endpoint).with_transport(HttpTransport::new(
        args.timeout.map(Duration::from_secs),
        REDIRECTION_LIMIT,
    ));
    if let Some(update_endpoint) = args.update_endpoint {
        sparql = sparql.with_update_endpoint(update_endpoint);
    }
    if let Some(default_graph) = args.default_graph {
        sparql = sparql.with_default_graph(default_graph);
    }
    if let Some(agent) = args.agent {
        sparql = sparql.with_agent(agent);
    }

    sparql.set_query(query);
    if let Some(format) = args.format {
        ensure!(
            sparql.try_set_return_format(&format),
            "The format '{format}' is unknown, expected json, xml, turtle, n3 or rdf"
        );
    }
    ensure!(
        sparql.try_set_method(&args.method),
        "The method '{}' is unknown, expected GET or POST",
        args.method
    );
    for param in args.params {
        let (name, value) = param
            .split_once('=')
            .with_context(|| format!("Invalid parameter '{param}', expected NAME=VALUE"))?;
        ensure!(
            sparql.add_custom_parameter(name, value),
            "The '{name}' parameter is reserved, set the query with --query"
        );
    }
    if let (Some(user), Some(password)) = (args.user, args.password) {
        sparql.set_credentials(user, password);
    }
    Ok(sparql)
}

#[derive(Clone, Copy)]
enum Output {
    Raw,
    Table { min_width: Option<usize> },
    Converted,
}

fn write_result(
    result: QueryResult,
    output: Output,
    write: &mut impl Write,
) -> anyhow::Result<()> {
    match output {
        Output::Raw => {
            io::copy(&mut result.into_reader(), write)?;
        }
        Output::Table { min_width } => result.print_results(min_width, write)?,
        Output::Converted => write_converted(
            result
                .convert()
                .context("Not able to convert the endpoint response")?,
            write,
        )?,
    }
    Ok(())
}

fn write_converted(result: ConvertedResult, output: &mut impl Write) -> anyhow::Result<()> {
    match result {
        ConvertedResult::Json(json) => {
            serde_json::to_writer_pretty(&mut *output, &json)?;
            writeln!(output)?;
        }
        ConvertedResult::Xml(document) => writeln!(output, "{document}")?,
        ConvertedResult::Graph(graph) => {
            for triple in &graph {
                writeln!(output, "{triple} .")?;
            }
        }
        ConvertedResult::Text(text) => output.write_all(text.as_bytes())?,
        ConvertedResult::Raw(body) => output.write_all(&body)?,
    }
    Ok(())
}

fn write_request(request: &SparqlRequest, output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "{} {}", request.method(), request.url())?;
    for (name, value) in request.headers() {
        writeln!(output, "{name}: {value}")?;
    }
    if let Some(body) = request.body() {
        writeln!(output)?;
        output.write_all(body)?;
        writeln!(output)?;
    }
    Ok(())
}
