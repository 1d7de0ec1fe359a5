//! GENI RSpec manifest to UNIS topology conversion.
//!
//! A manifest describes the nodes, interfaces and links allocated to a slice.
//! This library turns one parsed manifest into a UNIS topology document that a
//! perfSONAR topology service can store, and optionally wraps it in the NMWG
//! request message the service expects.
//!
//! # Architecture
//!
//! ## Conversion
//!
//! - [`manifest`]: the two-phase node/link conversion
//! - [`schema`]: per-version field names and reference resolution, loaded
//!   from an embedded TOML table
//! - [`urn`]: hierarchical `urn:ogf:network:` identifiers
//! - [`copy`]: passthrough of unmapped attributes and children
//! - [`namespaces`]: output namespaces and the final relabeling pass
//!
//! ## Delivery
//!
//! - [`envelope`]: NMWG `TSReplaceRequest`/`TSAddRequest` messages and the
//!   SOAP wrapper
//! - [`conversion_summary`]: counts of produced elements
//!
//! # Examples
//!
//! ```ignore
//! use rspec2unis::manifest::convert_manifest;
//! use rspec2unis::schema::{default_schema_table, SchemaVersion};
//! use xml_ns_core::{parse_file, write};
//!
//! let manifest = parse_file("manifest.xml".as_ref())?;
//! let table = default_schema_table();
//! let adapter = table.adapter(SchemaVersion::V2).expect("embedded table is complete");
//! let topology = convert_manifest(&manifest, adapter.as_ref(), "urn:publicid:IDN+emulab.net+slice+lamp")?;
//! println!("{}", String::from_utf8(write(&topology)?)?);
//! ```
//!
//! # Built on xml-ns-core
//!
//! Parsing, namespace resolution and serialization live in `xml-ns-core`.
//! Everything RSpec- or UNIS-specific is in this crate.

pub mod conversion_summary;
pub mod copy;
pub mod envelope;
pub mod error;
pub mod manifest;
pub mod namespaces;
pub mod schema;
pub mod urn;

pub use error::{ConvertError, ElementKind};
pub use manifest::convert_manifest;
