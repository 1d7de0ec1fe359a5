use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// An expanded XML name: namespace URI plus local name.
///
/// Prefixes are a serialization detail and are deliberately not part of the
/// name. Two elements written as `<a:x>` and `<b:x>` are the same name when
/// `a` and `b` are bound to the same URI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QName {
    /// Namespace URI, or `None` for names in no namespace.
    pub namespace: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl QName {
    /// Name in the given namespace.
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Name in no namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// True when this name has the given namespace and local part.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A generic, namespace-aware XML element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlNode {
    /// Expanded element name.
    pub name: QName,
    /// Preferred prefix when serializing. Ignored when the namespace is
    /// already bound to another prefix in scope.
    pub prefix: Option<String>,
    /// Namespace declarations made on this element, keyed by prefix.
    /// The empty string key is the default namespace.
    pub namespaces: BTreeMap<String, String>,
    /// Attributes keyed by expanded name. `xmlns` declarations are kept in
    /// [`XmlNode::namespaces`], never here.
    pub attributes: BTreeMap<QName, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Optional text content.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an element with no attributes, children, or text.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            prefix: None,
            namespaces: BTreeMap::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create an element in `namespace`.
    pub fn element(namespace: &str, local: &str) -> Self {
        Self::new(QName::new(namespace, local))
    }

    /// Create an element in `namespace` holding `text`.
    pub fn text_element(namespace: &str, local: &str, text: impl Into<String>) -> Self {
        let mut node = Self::element(namespace, local);
        node.text = Some(text.into());
        node
    }

    /// Builder-style variant of [`XmlNode::set_attr`].
    pub fn with_attr(mut self, local: &str, value: impl Into<String>) -> Self {
        self.set_attr(local, value);
        self
    }

    /// Value of the un-namespaced attribute `local`.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(local))
            .map(String::as_str)
    }

    /// Value of the un-namespaced attribute `local`, or `""` when absent.
    pub fn attr_or_empty(&self, local: &str) -> &str {
        self.attr(local).unwrap_or_default()
    }

    /// Set the un-namespaced attribute `local`.
    pub fn set_attr(&mut self, local: &str, value: impl Into<String>) {
        self.attributes.insert(QName::local(local), value.into());
    }

    /// Return the first child with the provided name.
    pub fn child(&self, namespace: &str, local: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name.is(namespace, local))
    }

    /// Return the first child in no namespace with the provided local name.
    pub fn child_local(&self, local: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find(|c| c.name.namespace.is_none() && c.name.local == local)
    }

    /// Return all direct children with the provided name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children
            .iter()
            .filter(move |c| c.name.is(namespace, local))
    }

    /// Default namespace declared on this element, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.namespaces.get("").map(String::as_str)
    }

    /// Visit this element and every descendant, depth first, parents before
    /// children.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut XmlNode)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Visit this element and every descendant, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a XmlNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

impl Display for XmlNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{QName, XmlNode};

    const NS: &str = "urn:test";

    #[test]
    fn child_matches_namespace_and_local_name() {
        let mut root = XmlNode::element(NS, "root");
        root.children.push(XmlNode::new(QName::local("item")));
        root.children.push(XmlNode::text_element(NS, "item", "value"));

        let item = root.child(NS, "item").expect("namespaced item");
        assert_eq!(item.text.as_deref(), Some("value"));
        assert_eq!(root.children_named(NS, "item").count(), 1);
    }

    #[test]
    fn attr_ignores_namespaced_attributes() {
        let mut node = XmlNode::element(NS, "node");
        node.attributes
            .insert(QName::new("urn:other", "id"), "other".to_string());
        node.set_attr("id", "plain");

        assert_eq!(node.attr("id"), Some("plain"));
        assert_eq!(node.attr_or_empty("missing"), "");
    }

    #[test]
    fn display_uses_clark_notation() {
        let node = XmlNode::element(NS, "a").with_attr("k", "v");
        assert_eq!(node.to_string(), "<{urn:test}a k=\"v\"/>");
    }
}
