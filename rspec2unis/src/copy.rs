//! Generic passthrough of attributes and child elements.
//!
//! Whatever the converter does not map explicitly is carried over verbatim,
//! so extensions the converter has never heard of survive the conversion.

use xml_ns_core::XmlNode;

/// Copy every attribute of `from` onto `to` except those whose local name is
/// in `ignored`. Existing attributes on `to` with the same name are replaced.
pub fn copy_attributes(from: &XmlNode, to: &mut XmlNode, ignored: &[&str]) {
    for (name, value) in &from.attributes {
        if ignored.contains(&name.local.as_str()) {
            continue;
        }
        to.attributes.insert(name.clone(), value.clone());
    }
}

/// Deep-clone every child of `from` into `to`, in order, skipping children
/// whose `(namespace, local name)` is in `ignored`.
///
/// Non-whitespace text of `from` is carried as well when `to` has none.
pub fn clone_children(from: &XmlNode, to: &mut XmlNode, ignored: &[(&str, &str)]) {
    to.children.extend(
        from.children
            .iter()
            .filter(|child| !ignored.iter().any(|(ns, local)| child.name.is(ns, local)))
            .cloned(),
    );
    if to.text.is_none() {
        to.text.clone_from(&from.text);
    }
}
