use crate::format::RequestMethod;
use crate::request::SparqlRequest;
use crate::transport::{HttpResponse, Transport};
use oxhttp::model::{Method, Request};
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;
use std::time::Duration;

/// [`Transport`] based on the [`oxhttp`] client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<oxhttp::Client>,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Self {
        let mut client = oxhttp::Client::new().with_redirection_limit(redirection_limit);
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None, 5)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &SparqlRequest) -> Result<HttpResponse> {
        let mut builder = Request::builder()
            .method(match request.method() {
                RequestMethod::Get => Method::GET,
                RequestMethod::Post => Method::POST,
            })
            .uri(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(*name, value.as_str());
        }
        let response = match request.body() {
            Some(body) => self.client.request(
                builder
                    .body(body.to_vec())
                    .map_err(invalid_input_error)?,
            )?,
            None => self
                .client
                .request(builder.body(()).map_err(invalid_input_error)?)?,
        };
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();
        Ok(HttpResponse::new(
            response.status().as_u16(),
            request.url(),
            headers,
            response.into_body(),
        ))
    }
}

fn invalid_input_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidInput, error)
}
