use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::tree::{QName, XmlNode};

/// Namespace permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors that can occur while writing XML from an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize an [`XmlNode`] tree into XML bytes.
///
/// Prefixes are chosen from the declarations in scope. A namespace with no
/// usable binding is declared on the element that first needs it.
pub fn write(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let mut scopes = Scopes::default();
    write_node(&mut writer, node, &mut scopes)?;
    Ok(writer.into_inner())
}

/// Serialize an [`XmlNode`] tree and write it to `path`.
pub fn write_file(node: &XmlNode, path: &Path) -> Result<(), WriteError> {
    let bytes = write(node)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Stack of prefix declarations, innermost last.
#[derive(Default)]
struct Scopes {
    frames: Vec<BTreeMap<String, String>>,
}

impl Scopes {
    /// URI currently bound to `prefix`.
    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(prefix))
            .map(String::as_str)
    }

    /// Declare `prefix` on the innermost element.
    fn declare(&mut self, prefix: &str, uri: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(prefix.to_string(), uri.to_string());
        }
    }

    /// A visible, non-empty prefix bound to `uri`, preferring `hint`.
    fn prefix_for(&self, uri: &str, hint: Option<&str>) -> Option<String> {
        if let Some(hint) = hint.filter(|h| !h.is_empty()) {
            if self.lookup(hint) == Some(uri) {
                return Some(hint.to_string());
            }
        }
        let mut candidates: Vec<&String> = self
            .frames
            .iter()
            .flat_map(|frame| frame.iter())
            .filter(|(prefix, bound)| !prefix.is_empty() && bound.as_str() == uri)
            .map(|(prefix, _)| prefix)
            .collect();
        candidates.sort();
        candidates
            .into_iter()
            .find(|prefix| self.lookup(prefix) == Some(uri))
            .cloned()
    }

    /// Prefix for `uri`, declaring one on the innermost element if needed.
    fn ensure_prefix(&mut self, uri: &str, hint: Option<&str>) -> String {
        if let Some(prefix) = self.prefix_for(uri, hint) {
            return prefix;
        }
        let prefix = match hint.filter(|h| !h.is_empty() && self.lookup(h).is_none()) {
            Some(hint) => hint.to_string(),
            None => self.fresh_prefix(),
        };
        self.declare(&prefix, uri);
        prefix
    }

    fn fresh_prefix(&self) -> String {
        (0..)
            .map(|n| format!("ns{n}"))
            .find(|candidate| self.lookup(candidate).is_none())
            .unwrap_or_default()
    }
}

fn element_name(node: &XmlNode, scopes: &mut Scopes) -> String {
    let local = node.name.local.as_str();
    match node.name.namespace.as_deref() {
        None => {
            // An unqualified element must not inherit a non-empty default.
            if scopes.lookup("").is_some_and(|uri| !uri.is_empty()) {
                scopes.declare("", "");
            }
            local.to_string()
        }
        Some(XML_NAMESPACE) => format!("xml:{local}"),
        Some(uri) => {
            if scopes.lookup("") == Some(uri) && node.prefix.is_none() {
                return local.to_string();
            }
            if let Some(prefix) = scopes.prefix_for(uri, node.prefix.as_deref()) {
                return format!("{prefix}:{local}");
            }
            if scopes.lookup("") == Some(uri) {
                return local.to_string();
            }
            let prefix = scopes.ensure_prefix(uri, node.prefix.as_deref());
            format!("{prefix}:{local}")
        }
    }
}

fn attribute_name(name: &QName, scopes: &mut Scopes) -> String {
    match name.namespace.as_deref() {
        None => name.local.clone(),
        Some(XML_NAMESPACE) => format!("xml:{}", name.local),
        Some(uri) => format!("{}:{}", scopes.ensure_prefix(uri, None), name.local),
    }
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    node: &XmlNode,
    scopes: &mut Scopes,
) -> Result<(), quick_xml::Error> {
    scopes.frames.push(node.namespaces.clone());

    let tag = element_name(node, scopes);
    let attributes: Vec<(String, &str)> = node
        .attributes
        .iter()
        .map(|(name, value)| (attribute_name(name, scopes), value.as_str()))
        .collect();

    let mut start = BytesStart::new(tag.as_str());
    if let Some(frame) = scopes.frames.last() {
        for (prefix, uri) in frame {
            if prefix.is_empty() {
                start.push_attribute(("xmlns", uri.as_str()));
            } else {
                start.push_attribute((format!("xmlns:{prefix}").as_str(), uri.as_str()));
            }
        }
    }
    for (key, value) in &attributes {
        start.push_attribute((key.as_str(), *value));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        scopes.frames.pop();
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }

    for child in &node.children {
        write_node(writer, child, scopes)?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    scopes.frames.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write;
    use crate::parser::parse;
    use crate::tree::{QName, XmlNode};

    fn written(node: &XmlNode) -> String {
        String::from_utf8(write(node).expect("write")).expect("utf-8")
    }

    #[test]
    fn uses_default_namespace_declared_on_root() {
        let mut root = XmlNode::element("urn:a", "topology");
        root.namespaces.insert(String::new(), "urn:a".to_string());
        root.children.push(XmlNode::element("urn:a", "domain"));

        let xml = written(&root);
        assert!(xml.contains(r#"<topology xmlns="urn:a">"#));
        assert!(xml.contains("<domain/>"));
    }

    #[test]
    fn prefers_prefix_hint_when_bound() {
        let mut root = XmlNode::element("urn:a", "root");
        root.namespaces.insert(String::new(), "urn:a".to_string());
        root.namespaces.insert("p".to_string(), "urn:p".to_string());
        root.namespaces.insert("q".to_string(), "urn:p".to_string());
        let mut child = XmlNode::element("urn:p", "props");
        child.prefix = Some("q".to_string());
        root.children.push(child);

        assert!(written(&root).contains("<q:props/>"));
    }

    #[test]
    fn declares_unbound_namespace_locally() {
        let mut root = XmlNode::element("urn:a", "root");
        root.namespaces.insert(String::new(), "urn:a".to_string());
        root.children.push(XmlNode::element("urn:ext", "thing"));
        let mut plain = XmlNode::new(QName::local("plain"));
        plain.set_attr("k", "v");
        root.children.push(plain);

        let xml = written(&root);
        assert!(xml.contains(r#"<ns0:thing xmlns:ns0="urn:ext"/>"#));
        assert!(xml.contains(r#"<plain xmlns="" k="v"/>"#));

        let reparsed = parse(xml.as_bytes()).expect("reparse");
        assert_eq!(reparsed.children[0].name, QName::new("urn:ext", "thing"));
        assert_eq!(reparsed.children[1].name, QName::local("plain"));
    }

    #[test]
    fn namespaced_attributes_get_a_prefix() {
        let mut root = XmlNode::element("urn:a", "root");
        root.namespaces.insert(String::new(), "urn:a".to_string());
        root.attributes
            .insert(QName::new("urn:a", "flag"), "1".to_string());

        let reparsed = parse(&write(&root).expect("write")).expect("reparse");
        assert_eq!(
            reparsed.attributes.get(&QName::new("urn:a", "flag")),
            Some(&"1".to_string())
        );
    }
}
