//! Namespace-aware XML parsing and writing primitives used by higher-level tools.
//!
//! Element and attribute names are resolved to [`QName`] values (namespace URI
//! plus local name) at parse time, so callers match and rewrite names without
//! caring which prefix a document happened to use. The writer picks prefixes
//! back from the declarations carried on the tree.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, ParseError};
pub use tree::{QName, XmlNode};
pub use writer::{write, write_file, WriteError, XML_NAMESPACE};
