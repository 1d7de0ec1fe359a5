use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

use crate::tree::{QName, XmlNode};
use crate::writer::XML_NAMESPACE;

/// Errors that can occur while parsing XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// A name used a prefix with no `xmlns:` declaration in scope.
    #[error("unbound namespace prefix '{0}'")]
    UnboundPrefix(String),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Parse XML bytes into an [`XmlNode`] tree with resolved namespaces.
///
/// Whitespace-only text is dropped; comments, processing instructions and the
/// declaration are skipped.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut tree = TreeBuilder::default();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => tree.open(build_node_start(&e, &reader)?),
            Event::Empty(e) => tree.leaf(build_node_start(&e, &reader)?)?,
            Event::End(_) => tree.close()?,
            Event::Text(e) => tree.text(&e.unescape()?),
            Event::CData(e) => tree.text(std::str::from_utf8(e.as_ref())?),
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }
    tree.finish()
}

/// Parse an XML file into an [`XmlNode`] tree.
pub fn parse_file(path: &Path) -> Result<XmlNode, ParseError> {
    parse(&fs::read(path)?)
}

/// Open elements plus the finished root.
#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlNode>,
    root: Option<XmlNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: XmlNode) {
        self.open.push(node);
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let node = self
            .open
            .pop()
            .ok_or_else(|| ParseError::Malformed("closing tag without open tag".to_string()))?;
        self.leaf(node)
    }

    fn leaf(&mut self, node: XmlNode) -> Result<(), ParseError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
        } else if self.root.is_none() {
            self.root = Some(node);
        } else {
            return Err(ParseError::Malformed(
                "multiple top-level elements".to_string(),
            ));
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let Some(current) = self.open.last_mut() else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        current.text.get_or_insert_with(String::new).push_str(text);
    }

    fn finish(self) -> Result<XmlNode, ParseError> {
        if !self.open.is_empty() {
            return Err(ParseError::Malformed(
                "unclosed element at end of document".to_string(),
            ));
        }
        self.root
            .ok_or_else(|| ParseError::Malformed("no root element".to_string()))
    }
}

fn build_node_start(e: &BytesStart<'_>, reader: &NsReader<&[u8]>) -> Result<XmlNode, ParseError> {
    let (resolved, local) = reader.resolve_element(e.name());
    let name = QName {
        namespace: namespace_of(resolved)?,
        local: std::str::from_utf8(local.as_ref())?.to_string(),
    };
    let mut node = XmlNode::new(name);
    node.prefix = match e.name().prefix() {
        Some(prefix) => Some(std::str::from_utf8(prefix.as_ref())?.to_string()),
        None => None,
    };

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();

        if let Some(binding) = attr.key.as_namespace_binding() {
            let prefix = match binding {
                PrefixDeclaration::Default => String::new(),
                PrefixDeclaration::Named(prefix) => std::str::from_utf8(prefix)?.to_string(),
            };
            node.namespaces.insert(prefix, value);
            continue;
        }

        // Unprefixed attributes are in no namespace, whatever the default is.
        let key = match attr.key.prefix() {
            None => QName::local(std::str::from_utf8(attr.key.as_ref())?),
            Some(_) => {
                let (resolved, local) = reader.resolve_attribute(attr.key);
                QName {
                    namespace: namespace_of(resolved)?,
                    local: std::str::from_utf8(local.as_ref())?.to_string(),
                }
            }
        };
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn namespace_of(resolved: ResolveResult<'_>) -> Result<Option<String>, ParseError> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(std::str::from_utf8(ns.as_ref())?.to_string())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) if prefix == b"xml" => Ok(Some(XML_NAMESPACE.to_string())),
        ResolveResult::Unknown(prefix) => Err(ParseError::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};
    use crate::tree::QName;

    #[test]
    fn resolves_default_and_prefixed_namespaces() {
        let root = parse(
            br#"<rspec xmlns="urn:a" xmlns:x="urn:x"><x:config k="v" x:flag="1"/></rspec>"#,
        )
        .expect("parse");

        assert_eq!(root.name, QName::new("urn:a", "rspec"));
        assert_eq!(root.default_namespace(), Some("urn:a"));

        let config = root.child("urn:x", "config").expect("config");
        assert_eq!(config.prefix.as_deref(), Some("x"));
        assert_eq!(config.attr("k"), Some("v"));
        assert_eq!(
            config.attributes.get(&QName::new("urn:x", "flag")),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn rejects_unbound_prefix() {
        let err = parse(br#"<root><y:child/></root>"#).expect_err("unbound prefix");
        assert!(matches!(err, ParseError::UnboundPrefix(p) if p == "y"));
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = parse(br#"<a/><b/>"#).expect_err("two roots");
        assert!(matches!(err, ParseError::Malformed(_)));
    }
}
