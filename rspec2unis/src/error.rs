use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::urn::UrnError;

/// Source element kinds that produce identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Interface,
    Link,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Node => "node",
            ElementKind::Interface => "interface",
            ElementKind::Link => "link",
        };
        f.write_str(name)
    }
}

/// Structural problems that abort a manifest conversion.
///
/// None of these are recovered internally; a conversion either produces a
/// complete topology or one of these errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("two {kind} elements found with same id ({id}) producing {urn}")]
    DuplicateIdentifier {
        kind: ElementKind,
        id: String,
        urn: String,
    },
    #[error("unsupported number of interface_refs in link {link}: found {found}, expected 2")]
    InvalidLinkArity { link: String, found: usize },
    #[error("link {link} references nonexistent interface {interface}")]
    DanglingInterfaceReference { link: String, interface: String },
    #[error("node {node} has more than one config element")]
    MultipleConfigBlocks { node: String },
    #[error("link {link} has more than one link_type element")]
    MultipleLinkTypes { link: String },
    #[error(transparent)]
    InvalidIdentifierCombination(#[from] UrnError),
    #[error("manifest has unexpected default namespace {found:?}; RSpec {version} expects {expected}")]
    UnrecognizedSchemaNamespace {
        version: String,
        expected: String,
        found: Option<String>,
    },
}
