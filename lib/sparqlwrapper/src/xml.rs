use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

/// A parsed XML document.
///
/// ```
/// use sparqlwrapper::XmlDocument;
///
/// let document = XmlDocument::parse(
///     r#"<sparql xmlns="http://www.w3.org/2005/sparql-results#"><head><variable name="s"/></head><boolean>true</boolean></sparql>"#.as_bytes(),
/// )?;
/// assert_eq!(document.root().name(), "sparql");
/// assert_eq!(document.root().find("variable").and_then(|v| v.attribute("name")), Some("s"));
/// assert_eq!(document.root().find("boolean").map(|b| b.text()).as_deref(), Some("true"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn parse(read: impl Read) -> Result<Self, XmlParseError> {
        parse_document(&mut Reader::from_reader(BufReader::new(read)))
    }

    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn into_root(self) -> XmlElement {
        self.root
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?xml version=\"1.0\"?>\n{}", self.root)
    }
}

/// An XML element with its attributes and content.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// Content of an [`XmlElement`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// The qualified name, including the prefix if any.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// The child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// The first descendant element with the given local name, in document order.
    pub fn find(&self, local_name: &str) -> Option<&XmlElement> {
        self.elements().find_map(|element| {
            if element.local_name() == local_name {
                Some(element)
            } else {
                element.find(local_name)
            }
        })
    }

    /// All the descendant elements with the given local name, in document order.
    pub fn find_all<'a>(&'a self, local_name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(local_name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, local_name: &str, found: &mut Vec<&'a XmlElement>) {
        for element in self.elements() {
            if element.local_name() == local_name {
                found.push(element);
            }
            element.collect_descendants(local_name, found);
        }
    }

    /// The concatenation of all the descendant text nodes.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.collect_text(text),
                XmlNode::Text(t) => text.push_str(t),
            }
        }
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", escape(value.as_str()))?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => write!(f, "{element}")?,
                XmlNode::Text(text) => f.write_str(&escape(text.as_str()))?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

fn parse_document<R: BufRead>(reader: &mut Reader<R>) -> Result<XmlDocument, XmlParseError> {
    let mut buffer = Vec::new();
    let mut stack = Vec::<XmlElement>::new();
    let mut root = None;
    loop {
        match reader.read_event_into(&mut buffer)? {
            Event::Start(event) => stack.push(open_element(reader, &event)?),
            Event::Empty(event) => {
                let element = open_element(reader, &event)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlParseError::msg("Unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(event) => {
                let text = event.unescape()?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(event) => {
                let text = reader
                    .decoder()
                    .decode(&event)
                    .map_err(quick_xml::Error::from)?
                    .into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buffer.clear();
    }
    if let Some(element) = stack.last() {
        return Err(XmlParseError::msg(format!(
            "Unexpected end of file, the <{}> element is not closed",
            element.name
        )));
    }
    Ok(XmlDocument {
        root: root.ok_or_else(|| XmlParseError::msg("The document has no root element"))?,
    })
}

fn open_element<R>(
    reader: &Reader<R>,
    event: &BytesStart<'_>,
) -> Result<XmlElement, XmlParseError> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(event.name().as_ref())
        .map_err(quick_xml::Error::from)?
        .into_owned();
    let mut attributes = Vec::new();
    for attribute in event.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = decoder
            .decode(attribute.key.as_ref())
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, attribute.unescape_value()?.into_owned()));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(XmlParseError::msg("The document has multiple root elements"));
    }
    Ok(())
}

/// Error returned while parsing an XML document.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct XmlParseError(#[from] XmlParseErrorKind);

#[derive(Debug, thiserror::Error)]
enum XmlParseErrorKind {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("{0}")]
    Msg(String),
}

impl XmlParseError {
    fn msg(msg: impl Into<String>) -> Self {
        Self(XmlParseErrorKind::Msg(msg.into()))
    }
}

#[doc(hidden)]
impl From<quick_xml::Error> for XmlParseError {
    #[inline]
    fn from(error: quick_xml::Error) -> Self {
        Self(XmlParseErrorKind::Xml(error))
    }
}

impl From<XmlParseError> for io::Error {
    #[inline]
    fn from(error: XmlParseError) -> Self {
        match error.0 {
            XmlParseErrorKind::Xml(quick_xml::Error::Io(error)) => {
                Arc::try_unwrap(error).unwrap_or_else(|e| Self::new(e.kind(), e))
            }
            XmlParseErrorKind::Xml(error) => Self::new(io::ErrorKind::InvalidData, error),
            XmlParseErrorKind::Msg(msg) => Self::new(io::ErrorKind::InvalidData, msg),
        }
    }
}
