//! Transport used when no HTTP client is compiled in

use crate::request::SparqlRequest;
use crate::transport::{HttpResponse, Transport};
use std::io::{Error, ErrorKind, Result};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new(_timeout: Option<Duration>, _redirection_limit: usize) -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn send(&self, _request: &SparqlRequest) -> Result<HttpResponse> {
        Err(Error::new(
            ErrorKind::Unsupported,
            "HTTP client is not available. Enable the feature 'http-client'",
        ))
    }
}
