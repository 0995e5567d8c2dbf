//! Minimal XML element tree
//!
//! OICP messages only use elements, text and a handful of namespace
//! attributes, so the tree keeps exactly that. Element names are stored
//! without their namespace prefix; prefixes are irrelevant for decoding.

use std::fmt::Display;
use std::str::FromStr;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: Option<String>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A leaf element carrying `value` as text
    pub fn leaf(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            text: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child only when one is given
    pub fn opt_child(mut self, child: Option<XmlNode>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text_child(self, name: &str, value: impl Display) -> Self {
        self.child(XmlNode::leaf(name, value))
    }

    /// Append a leaf for `value`; an absent value emits nothing at all
    pub fn opt_text_child<T: Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.text_child(name, value),
            None => self,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Text content, empty when the element has none
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&XmlNode, CodecError> {
        self.find(name).ok_or_else(|| CodecError::missing(name))
    }

    pub fn opt_text(&self, name: &str) -> Option<&str> {
        self.find(name).map(XmlNode::text)
    }

    pub fn require_text(&self, name: &str) -> Result<&str, CodecError> {
        self.require(name).map(XmlNode::text)
    }

    /// Parse an optional leaf with `FromStr`
    pub fn opt_parse<T>(&self, name: &str) -> Result<Option<T>, CodecError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.opt_text(name)
            .map(|text| text.parse().map_err(|e| CodecError::invalid(name, text, e)))
            .transpose()
    }

    /// Parse a required leaf with `FromStr`
    pub fn require_parse<T>(&self, name: &str) -> Result<T, CodecError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let text = self.require_text(name)?;
        text.parse().map_err(|e| CodecError::invalid(name, text, e))
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if self.children.is_empty() && text.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse a document holding exactly one root element
    pub fn parse(input: &str) -> Result<XmlNode, CodecError> {
        let mut reader = Reader::from_str(input);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(start_node(&start)?),
                Event::Empty(start) => {
                    let node = start_node(&start)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| CodecError::Xml("unbalanced end tag".into()))?;
                    // Text beside child elements is layout, leaf text is data
                    if !node.children.is_empty() {
                        node.text = None;
                    }
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut stack, &text);
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&data));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CodecError::Xml(format!("unclosed element '{}'", open.name)));
        }
        root.ok_or(CodecError::NoRoot)
    }
}

fn local_name(qualified: &[u8]) -> String {
    let local = match qualified.iter().rposition(|b| *b == b':') {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    };
    String::from_utf8_lossy(local).into_owned()
}

fn start_node(start: &BytesStart<'_>) -> Result<XmlNode, CodecError> {
    let mut node = XmlNode::new(local_name(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => return Err(CodecError::MultipleRoots),
        None => *root = Some(node),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlNode], text: &str) {
    if let Some(node) = stack.last_mut() {
        node.text.get_or_insert_with(String::new).push_str(text);
    }
}
