#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod decoder;
mod error;
mod format;
mod parameters;
mod query_type;
mod request;
mod result;
mod table;
pub mod transport;
mod warning;
mod wrapper;
mod xml;

pub use crate::decoder::{
    Decoders, JsonDecoder, OxRdfXmlDecoder, PLACEHOLDER_BASE_IRI, QuickXmlDecoder, RdfXmlDecoder,
    SerdeJsonDecoder, XmlDecoder,
};
pub use crate::error::{ConvertError, QueryError};
pub use crate::format::{ContentCategory, RequestMethod, ReturnFormat};
pub use crate::parameters::{
    Credentials, DEFAULT_GRAPH_PARAMETER, FORMAT_HINT_PARAMETERS, NAMED_GRAPH_PARAMETER,
    PLACEHOLDER_QUERY, ParameterSet, QueryDefaults, RESERVED_PARAMETERS,
};
pub use crate::query_type::{QueryType, classify};
pub use crate::request::{FORM_CONTENT_TYPE, RequestBuilder, SparqlRequest, accept_header};
pub use crate::result::{ConvertedResult, QueryResult};
pub use crate::table::{DEFAULT_MIN_WIDTH, write_results_table};
pub use crate::transport::{HttpResponse, HttpTransport, Transport};
pub use crate::warning::Warning;
pub use crate::wrapper::{DEFAULT_AGENT, SparqlWrapper};
pub use crate::xml::{XmlDocument, XmlElement, XmlNode, XmlParseError};
