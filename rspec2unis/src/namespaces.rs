//! Namespaces of the UNIS output and the final relabeling pass.

use xml_ns_core::XmlNode;

/// UNIS topology schema; the default namespace of the output.
pub const UNIS: &str = "http://ogf.org/schema/network/topology/unis/20100528/";
/// perfSONAR configuration extension.
pub const PSCONFIG: &str = "http://ogf.org/schema/network/topology/psconfig/20100716/";
/// ProtoGENI extension holding passthrough RSpec content.
pub const PROTOGENI: &str = "http://ogf.org/schema/network/topology/protogeni/20100716/";
/// LAMP configuration extension found in RSpec manifests.
pub const LAMP: &str = "http://protogeni.net/resources/rspec/0.2/ext/lamp/1";

pub const PGENI_PREFIX: &str = "pgeni";
pub const PSCONFIG_PREFIX: &str = "psconfig";

/// Relabel every element of a finished topology into the output namespaces.
///
/// - ProtoGENI extension elements get the `pgeni` prefix.
/// - Elements in the manifest's own namespace move into ProtoGENI.
/// - LAMP elements move into psconfig; psconfig elements get the `psconfig`
///   prefix.
///
/// Only element names change. Nothing else touches the tree during this pass.
pub fn rewrite_namespaces(root: &mut XmlNode, source_namespace: &str) {
    root.walk_mut(&mut |element| {
        let (namespace, prefix) = match element.name.namespace.as_deref() {
            Some(ns) if ns == PROTOGENI || ns == source_namespace => (PROTOGENI, PGENI_PREFIX),
            Some(ns) if ns == PSCONFIG || ns == LAMP => (PSCONFIG, PSCONFIG_PREFIX),
            _ => return,
        };
        element.name.namespace = Some(namespace.to_string());
        element.prefix = Some(prefix.to_string());
    });
}

/// Declare the output namespaces on the topology root. UNIS is the default.
pub fn declare_output_namespaces(topology: &mut XmlNode) {
    topology
        .namespaces
        .insert(String::new(), UNIS.to_string());
    topology
        .namespaces
        .insert(PGENI_PREFIX.to_string(), PROTOGENI.to_string());
    topology
        .namespaces
        .insert(PSCONFIG_PREFIX.to_string(), PSCONFIG.to_string());
}
