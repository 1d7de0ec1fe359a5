//! Per-version field access for RSpec manifests.
//!
//! The three supported manifest versions name the same things differently.
//! Field names live in a table (`schemas/rspec.toml`, embedded at build time
//! and overridable at runtime); the two ways of resolving a link's
//! `interface_ref` live in code as [`SchemaAdapter`] implementations.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use xml_ns_core::XmlNode;

/// Node attribute carried as a DNS address rather than a property.
pub const HOSTNAME_ATTR: &str = "hostname";
/// Interface attribute carried as the port name.
pub const COMPONENT_ID_ATTR: &str = "component_id";
/// `interface_ref` attribute carried as a MAC address.
pub const MAC_ATTR: &str = "MAC";
/// `interface_ref` attribute carried as an IPv4 address.
pub const IP_ATTR: &str = "IP";

/// Supported RSpec manifest versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "0.1")]
    V0_1,
    #[serde(rename = "0.2")]
    V0_2,
    #[serde(rename = "2")]
    V2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 3] = [
        SchemaVersion::V0_1,
        SchemaVersion::V0_2,
        SchemaVersion::V2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V0_1 => "0.1",
            SchemaVersion::V0_2 => "0.2",
            SchemaVersion::V2 => "2",
        }
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an `interface_ref` names the interface it attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum ReferenceFields {
    /// The reference carries both the owning node and the interface id.
    Explicit { node: String, interface: String },
    /// The reference carries only the interface id; the owning node is
    /// looked up from the interfaces seen while converting nodes.
    ClientScoped { interface: String },
}

impl ReferenceFields {
    fn attribute_names(&self) -> Vec<&str> {
        match self {
            ReferenceFields::Explicit { node, interface } => vec![node.as_str(), interface.as_str()],
            ReferenceFields::ClientScoped { interface } => vec![interface.as_str()],
        }
    }
}

/// Field names of one manifest version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaProfile {
    pub version: SchemaVersion,
    /// Default namespace a manifest of this version declares.
    pub namespace: String,
    pub node_id: String,
    pub interface_id: String,
    pub link_id: String,
    /// Node attributes dropped besides the node id and hostname.
    #[serde(default)]
    pub node_ignored: Vec<String>,
    pub reference: ReferenceFields,
}

impl SchemaProfile {
    /// Adapter matching this profile's reference strategy.
    pub fn adapter(&self) -> Box<dyn SchemaAdapter + '_> {
        match &self.reference {
            ReferenceFields::Explicit { node, interface } => Box::new(ExplicitRefAdapter {
                profile: self,
                node_attr: node.as_str(),
                interface_attr: interface.as_str(),
            }),
            ReferenceFields::ClientScoped { interface } => Box::new(ClientScopedAdapter {
                profile: self,
                interface_attr: interface.as_str(),
            }),
        }
    }
}

/// Interface id -> owning node id, recorded during the node phase.
///
/// Keys are interface ids alone, so a later interface with the same id
/// replaces the earlier owner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InterfaceTable {
    owners: HashMap<String, String>,
}

impl InterfaceTable {
    pub fn record(&mut self, interface_id: &str, node_id: &str) {
        self.owners
            .insert(interface_id.to_string(), node_id.to_string());
    }

    pub fn owner(&self, interface_id: &str) -> Option<&str> {
        self.owners.get(interface_id).map(String::as_str)
    }
}

/// A link endpoint as named by an `interface_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRef {
    /// Owning node id; `None` when the reference could not be attributed.
    pub node: Option<String>,
    pub interface: String,
}

/// Version-specific field access used by the manifest converter.
pub trait SchemaAdapter {
    fn profile(&self) -> &SchemaProfile;

    /// Resolve an `interface_ref` to its (node id, interface id) pair.
    fn resolve_reference(&self, iface_ref: &XmlNode, interfaces: &InterfaceTable) -> EndpointRef;

    fn version(&self) -> SchemaVersion {
        self.profile().version
    }

    fn namespace(&self) -> &str {
        &self.profile().namespace
    }

    fn node_id_attr(&self) -> &str {
        &self.profile().node_id
    }

    fn interface_id_attr(&self) -> &str {
        &self.profile().interface_id
    }

    fn link_id_attr(&self) -> &str {
        &self.profile().link_id
    }

    fn ignored_node_attrs(&self) -> Vec<&str> {
        let profile = self.profile();
        let mut ignored = vec![profile.node_id.as_str(), HOSTNAME_ATTR];
        ignored.extend(profile.node_ignored.iter().map(String::as_str));
        ignored
    }

    fn ignored_interface_attrs(&self) -> Vec<&str> {
        vec![self.interface_id_attr()]
    }

    fn ignored_link_attrs(&self) -> Vec<&str> {
        vec![self.link_id_attr()]
    }

    fn ignored_reference_attrs(&self) -> Vec<&str> {
        let mut ignored = self.profile().reference.attribute_names();
        ignored.extend([MAC_ATTR, IP_ATTR]);
        ignored
    }
}

/// Legacy manifests (0.1, 0.2): references name node and interface directly.
struct ExplicitRefAdapter<'t> {
    profile: &'t SchemaProfile,
    node_attr: &'t str,
    interface_attr: &'t str,
}

impl SchemaAdapter for ExplicitRefAdapter<'_> {
    fn profile(&self) -> &SchemaProfile {
        self.profile
    }

    fn resolve_reference(&self, iface_ref: &XmlNode, _interfaces: &InterfaceTable) -> EndpointRef {
        EndpointRef {
            node: Some(iface_ref.attr_or_empty(self.node_attr).to_string()),
            interface: iface_ref.attr_or_empty(self.interface_attr).to_string(),
        }
    }
}

/// Current manifests (2): references carry only the interface's client id.
struct ClientScopedAdapter<'t> {
    profile: &'t SchemaProfile,
    interface_attr: &'t str,
}

impl SchemaAdapter for ClientScopedAdapter<'_> {
    fn profile(&self) -> &SchemaProfile {
        self.profile
    }

    fn resolve_reference(&self, iface_ref: &XmlNode, interfaces: &InterfaceTable) -> EndpointRef {
        let interface = iface_ref.attr_or_empty(self.interface_attr);
        EndpointRef {
            node: interfaces.owner(interface).map(str::to_string),
            interface: interface.to_string(),
        }
    }
}

/// The full set of known manifest versions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaTable {
    #[serde(rename = "schema")]
    pub schemas: Vec<SchemaProfile>,
}

impl SchemaTable {
    pub fn profile(&self, version: SchemaVersion) -> Option<&SchemaProfile> {
        self.schemas.iter().find(|p| p.version == version)
    }

    /// Adapter for `version`, if the table describes it.
    pub fn adapter(&self, version: SchemaVersion) -> Option<Box<dyn SchemaAdapter + '_>> {
        self.profile(version).map(SchemaProfile::adapter)
    }

    fn is_complete(&self) -> bool {
        SchemaVersion::ALL
            .into_iter()
            .all(|v| self.profile(v).is_some())
    }
}

/// Errors returned when loading schema table files.
#[derive(Debug, Error)]
pub enum SchemaTableError {
    #[error("failed to read schema table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse schema table {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("schema table {path} lists RSpec {version} more than once")]
    DuplicateVersion {
        path: String,
        version: SchemaVersion,
    },
}

/// Load a schema table from a TOML file.
pub fn load_schema_table(path: &Path) -> Result<SchemaTable, SchemaTableError> {
    let raw = fs::read_to_string(path).map_err(|source| SchemaTableError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_table(&raw, path.display().to_string())
}

/// Built-in schema table.
pub fn default_schema_table() -> SchemaTable {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/schemas/rspec.toml"));
    match parse_table(embedded, "embedded schema table".to_string()) {
        Ok(table) if table.is_complete() => table,
        _ => fallback_schema_table(),
    }
}

fn parse_table(raw: &str, path: String) -> Result<SchemaTable, SchemaTableError> {
    let table: SchemaTable = toml::from_str(raw).map_err(|source| SchemaTableError::Parse {
        path: path.clone(),
        source,
    })?;

    for (idx, profile) in table.schemas.iter().enumerate() {
        if table.schemas[..idx]
            .iter()
            .any(|p| p.version == profile.version)
        {
            return Err(SchemaTableError::DuplicateVersion {
                path,
                version: profile.version,
            });
        }
    }
    Ok(table)
}

fn fallback_schema_table() -> SchemaTable {
    let legacy = |version: SchemaVersion, namespace: &str| SchemaProfile {
        version,
        namespace: namespace.to_string(),
        node_id: "virtual_id".to_string(),
        interface_id: "virtual_id".to_string(),
        link_id: "virtual_id".to_string(),
        node_ignored: vec!["sshdport".to_string()],
        reference: ReferenceFields::Explicit {
            node: "virtual_node_id".to_string(),
            interface: "virtual_interface_id".to_string(),
        },
    };

    SchemaTable {
        schemas: vec![
            legacy(SchemaVersion::V0_1, "http://protogeni.net/resources/rspec/0.1"),
            legacy(SchemaVersion::V0_2, "http://protogeni.net/resources/rspec/0.2"),
            SchemaProfile {
                version: SchemaVersion::V2,
                namespace: "http://www.protogeni.net/resources/rspec/2".to_string(),
                node_id: "client_id".to_string(),
                interface_id: "client_id".to_string(),
                link_id: "client_id".to_string(),
                node_ignored: Vec::new(),
                reference: ReferenceFields::ClientScoped {
                    interface: "client_id".to_string(),
                },
            },
        ],
    }
}
