//! RSpec manifest to UNIS topology conversion.
//!
//! The conversion runs in two phases over one manifest:
//!
//! 1. **Node phase**: every `<node>` becomes a UNIS node, every
//!    `<interface>` under it a UNIS port. Each produced identifier is claimed
//!    in a per-run registry.
//! 2. **Link phase**: every `<link>` becomes a non-directed UNIS link with
//!    two endpoint relations. Each `<interface_ref>` must name a port claimed
//!    in the node phase, and this phase is allowed to add addresses and
//!    properties to that port (RSpec puts MAC/IP on the reference, not on the
//!    interface).
//!
//! Ports stay as [`PortDraft`]s until both phases are done, so the link phase
//! reaches them through [`NodeSet::port_mut`] rather than through references
//! into a half-built tree. The finished tree is relabeled into the output
//! namespaces before it is returned.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info};
use xml_ns_core::XmlNode;

use crate::copy::{clone_children, copy_attributes};
use crate::error::{ConvertError, ElementKind};
use crate::namespaces::{
    declare_output_namespaces, rewrite_namespaces, LAMP, PROTOGENI, PSCONFIG, UNIS,
};
use crate::schema::{
    InterfaceTable, SchemaAdapter, COMPONENT_ID_ATTR, HOSTNAME_ATTR, IP_ATTR, MAC_ATTR,
};
use crate::urn::Urn;

/// Scheme marker in front of slice URNs handed out by the clearinghouse.
pub const SLICE_URN_PREFIX: &str = "urn:publicid:IDN+";
/// `id` of the produced topology root.
pub const TOPOLOGY_ID: &str = "genitopo";

/// Domain segment for a slice: the slice URN without its scheme marker.
pub fn slice_domain(slice_urn: &str) -> &str {
    slice_urn.strip_prefix(SLICE_URN_PREFIX).unwrap_or(slice_urn)
}

/// Convert a parsed manifest into a UNIS topology for `slice_urn`.
///
/// The manifest root must declare the adapter's namespace as its default
/// namespace. Links may only reference interfaces declared on nodes.
pub fn convert_manifest(
    manifest: &XmlNode,
    adapter: &dyn SchemaAdapter,
    slice_urn: &str,
) -> Result<XmlNode, ConvertError> {
    check_namespace(manifest, adapter)?;

    let domain_id = slice_domain(slice_urn);
    let mut topology = XmlNode::element(UNIS, "topology").with_attr("id", TOPOLOGY_ID);
    let domain_urn = Urn::domain(domain_id).build()?;
    let mut domain = XmlNode::element(UNIS, "domain").with_attr("id", domain_urn);

    let mut converter = Converter::new(adapter, domain_id);
    let mut nodes = converter.convert_nodes(manifest)?;
    let links = converter.convert_links(manifest, &mut nodes)?;

    info!(
        version = %adapter.version(),
        nodes = nodes.len(),
        links = links.len(),
        "converted manifest"
    );

    domain.children.extend(nodes.into_elements());
    domain.children.extend(links);
    topology.children.push(domain);

    rewrite_namespaces(&mut topology, adapter.namespace());
    declare_output_namespaces(&mut topology);
    Ok(topology)
}

fn check_namespace(manifest: &XmlNode, adapter: &dyn SchemaAdapter) -> Result<(), ConvertError> {
    let declared = manifest.default_namespace();
    if declared == Some(adapter.namespace()) {
        return Ok(());
    }
    Err(ConvertError::UnrecognizedSchemaNamespace {
        version: adapter.version().to_string(),
        expected: adapter.namespace().to_string(),
        found: declared.map(str::to_string),
    })
}

/// What a registered identifier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Produced {
    Node,
    Port { node: usize, port: usize },
    Link,
}

/// Identifiers produced during one conversion run.
#[derive(Debug, Default)]
struct Registry {
    entries: HashMap<String, Produced>,
}

impl Registry {
    fn claim(
        &mut self,
        urn: &str,
        produced: Produced,
        kind: ElementKind,
        id: &str,
    ) -> Result<(), ConvertError> {
        match self.entries.entry(urn.to_string()) {
            Entry::Occupied(_) => Err(ConvertError::DuplicateIdentifier {
                kind,
                id: id.to_string(),
                urn: urn.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(produced);
                Ok(())
            }
        }
    }

    fn port(&self, urn: &str) -> Option<(usize, usize)> {
        match self.entries.get(urn) {
            Some(Produced::Port { node, port }) => Some((*node, *port)),
            _ => None,
        }
    }
}

/// A UNIS port whose addresses and properties may still grow.
#[derive(Debug)]
struct PortDraft {
    urn: String,
    name: String,
    properties: XmlNode,
    addresses: Vec<XmlNode>,
}

impl PortDraft {
    fn into_element(self) -> XmlNode {
        let mut port = XmlNode::element(UNIS, "port").with_attr("id", self.urn);
        port.children.push(XmlNode::text_element(UNIS, "name", self.name));
        let mut bag = XmlNode::element(UNIS, "portPropertiesBag");
        bag.children.push(self.properties);
        port.children.push(bag);
        port.children.extend(self.addresses);
        port
    }
}

/// A UNIS node with its ports still open for the link phase.
#[derive(Debug)]
struct NodeDraft {
    element: XmlNode,
    ports: Vec<PortDraft>,
}

/// Result of the node phase.
#[derive(Debug, Default)]
struct NodeSet {
    nodes: Vec<NodeDraft>,
}

impl NodeSet {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The one sanctioned way to change a node-phase port after the node
    /// phase: used by the link phase to attach reference data.
    fn port_mut(&mut self, registry: &Registry, urn: &str) -> Option<&mut PortDraft> {
        let (node, port) = registry.port(urn)?;
        self.nodes.get_mut(node)?.ports.get_mut(port)
    }

    fn into_elements(self) -> impl Iterator<Item = XmlNode> {
        self.nodes.into_iter().map(|draft| {
            let mut element = draft.element;
            element
                .children
                .extend(draft.ports.into_iter().map(PortDraft::into_element));
            element
        })
    }
}

struct Converter<'a> {
    adapter: &'a dyn SchemaAdapter,
    domain: &'a str,
    registry: Registry,
    interfaces: InterfaceTable,
}

impl<'a> Converter<'a> {
    fn new(adapter: &'a dyn SchemaAdapter, domain: &'a str) -> Self {
        Self {
            adapter,
            domain,
            registry: Registry::default(),
            interfaces: InterfaceTable::default(),
        }
    }

    fn convert_nodes(&mut self, rspec: &XmlNode) -> Result<NodeSet, ConvertError> {
        let adapter = self.adapter;
        let mut set = NodeSet::default();
        for rsnode in rspec.children_named(adapter.namespace(), "node") {
            let draft = self.convert_node(rsnode, set.len())?;
            set.nodes.push(draft);
        }
        Ok(set)
    }

    fn convert_node(&mut self, rsnode: &XmlNode, index: usize) -> Result<NodeDraft, ConvertError> {
        let adapter = self.adapter;
        let ns = adapter.namespace();

        let node_id = rsnode.attr_or_empty(adapter.node_id_attr());
        let urn = Urn::domain(self.domain).node(node_id).build()?;
        self.registry
            .claim(&urn, Produced::Node, ElementKind::Node, node_id)?;
        debug!(%urn, "node");

        let mut element = XmlNode::element(UNIS, "node").with_attr("id", urn.as_str());
        element.children.push(
            XmlNode::text_element(UNIS, "address", rsnode.attr_or_empty(HOSTNAME_ATTR))
                .with_attr("type", "dns"),
        );

        let mut properties = XmlNode::element(PROTOGENI, "nodeProperties");
        copy_attributes(rsnode, &mut properties, &adapter.ignored_node_attrs());

        let mut ports = Vec::new();
        for rsiface in rsnode.children_named(ns, "interface") {
            let iface_id = rsiface.attr_or_empty(adapter.interface_id_attr());
            let port_urn = Urn::domain(self.domain)
                .node(node_id)
                .port(iface_id)
                .build()?;
            let produced = Produced::Port {
                node: index,
                port: ports.len(),
            };
            self.registry
                .claim(&port_urn, produced, ElementKind::Interface, iface_id)?;
            self.interfaces.record(iface_id, node_id);
            debug!(urn = %port_urn, "port");

            let mut port_properties = XmlNode::element(PROTOGENI, "portProperties");
            copy_attributes(
                rsiface,
                &mut port_properties,
                &adapter.ignored_interface_attrs(),
            );
            ports.push(PortDraft {
                urn: port_urn,
                name: rsiface.attr_or_empty(COMPONENT_ID_ATTR).to_string(),
                properties: port_properties,
                addresses: Vec::new(),
            });
        }

        let config = unique_child(rsnode, LAMP, "config").ok_or_else(|| {
            ConvertError::MultipleConfigBlocks {
                node: node_id.to_string(),
            }
        })?;

        clone_children(rsnode, &mut properties, &[(LAMP, "config"), (ns, "interface")]);
        let mut bag = XmlNode::element(UNIS, "nodePropertiesBag");
        bag.children.push(properties);
        if let Some(config) = config {
            let mut config_properties = XmlNode::element(PSCONFIG, "nodeProperties");
            clone_children(config, &mut config_properties, &[]);
            bag.children.push(config_properties);
        }
        element.children.push(bag);

        Ok(NodeDraft { element, ports })
    }

    fn convert_links(
        &mut self,
        rspec: &XmlNode,
        nodes: &mut NodeSet,
    ) -> Result<Vec<XmlNode>, ConvertError> {
        let adapter = self.adapter;
        rspec
            .children_named(adapter.namespace(), "link")
            .map(|rslink| self.convert_link(rslink, nodes))
            .collect()
    }

    fn convert_link(
        &mut self,
        rslink: &XmlNode,
        nodes: &mut NodeSet,
    ) -> Result<XmlNode, ConvertError> {
        let adapter = self.adapter;
        let ns = adapter.namespace();

        let link_id = rslink.attr_or_empty(adapter.link_id_attr());
        let urn = Urn::domain(self.domain).link(link_id).build()?;
        self.registry
            .claim(&urn, Produced::Link, ElementKind::Link, link_id)?;
        debug!(%urn, "link");

        // Not NML proper: a bidirectional link is marked directed="false" and
        // carries one endPoint relation per side.
        let mut link = XmlNode::element(UNIS, "link")
            .with_attr("id", urn.as_str())
            .with_attr("directed", "false");

        let link_type = unique_child(rslink, ns, "link_type").ok_or_else(|| {
            ConvertError::MultipleLinkTypes {
                link: link_id.to_string(),
            }
        })?;
        if let Some(link_type) = link_type {
            link.children.push(XmlNode::text_element(
                UNIS,
                "type",
                link_type.attr_or_empty("type_name"),
            ));
        }

        let mut properties = XmlNode::element(PROTOGENI, "linkProperties");
        copy_attributes(rslink, &mut properties, &adapter.ignored_link_attrs());

        // More than two references would make this a network element, which
        // UNIS models differently.
        let references: Vec<&XmlNode> = rslink.children_named(ns, "interface_ref").collect();
        if references.len() != 2 {
            return Err(ConvertError::InvalidLinkArity {
                link: link_id.to_string(),
                found: references.len(),
            });
        }

        let mut relations = Vec::with_capacity(references.len());
        for iface_ref in references {
            let port_urn = self.attach_reference(link_id, iface_ref, nodes)?;
            let mut relation = XmlNode::element(UNIS, "relation").with_attr("type", "endPoint");
            relation
                .children
                .push(XmlNode::text_element(UNIS, "portIdRef", port_urn));
            relations.push(relation);
        }

        clone_children(
            rslink,
            &mut properties,
            &[(ns, "interface_ref"), (ns, "link_type")],
        );
        let mut bag = XmlNode::element(UNIS, "linkPropertiesBag");
        bag.children.push(properties);
        link.children.push(bag);
        link.children.extend(relations);

        Ok(link)
    }

    /// Resolve one `interface_ref` to its port and move the reference's
    /// addresses and leftover attributes onto that port.
    ///
    /// Addresses are appended as found; a reference listed twice adds them
    /// twice.
    fn attach_reference(
        &self,
        link_id: &str,
        iface_ref: &XmlNode,
        nodes: &mut NodeSet,
    ) -> Result<String, ConvertError> {
        let adapter = self.adapter;
        let endpoint = adapter.resolve_reference(iface_ref, &self.interfaces);
        let dangling = || ConvertError::DanglingInterfaceReference {
            link: link_id.to_string(),
            interface: endpoint.interface.clone(),
        };

        let node_id = endpoint.node.as_deref().ok_or_else(dangling)?;
        let port_urn = Urn::domain(self.domain)
            .node(node_id)
            .port(&endpoint.interface)
            .build()?;
        let port = nodes
            .port_mut(&self.registry, &port_urn)
            .ok_or_else(dangling)?;

        if let Some(mac) = iface_ref.attr(MAC_ATTR).filter(|v| !v.is_empty()) {
            port.addresses.push(address(mac, "mac"));
        }
        if let Some(ip) = iface_ref.attr(IP_ATTR).filter(|v| !v.is_empty()) {
            port.addresses.push(address(ip, "ipv4"));
        }
        copy_attributes(
            iface_ref,
            &mut port.properties,
            &adapter.ignored_reference_attrs(),
        );

        Ok(port_urn)
    }
}

fn address(value: &str, kind: &str) -> XmlNode {
    XmlNode::text_element(UNIS, "address", value).with_attr("type", kind)
}

/// The single child named `(namespace, local)`, `Some(None)` when there is
/// none, and `None` when there are several.
fn unique_child<'n>(
    parent: &'n XmlNode,
    namespace: &str,
    local: &str,
) -> Option<Option<&'n XmlNode>> {
    let mut matches = parent
        .children
        .iter()
        .filter(|child| child.name.is(namespace, local));
    let first = matches.next();
    if matches.next().is_some() {
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xml_ns_core::{parse, QName, XmlNode};

    use super::{convert_manifest, slice_domain};
    use crate::error::{ConvertError, ElementKind};
    use crate::namespaces::{PROTOGENI, PSCONFIG, UNIS};
    use crate::schema::{default_schema_table, SchemaVersion};

    const SLICE: &str = "urn:publicid:IDN+emulab.net+slice+lamp";
    const V2: &str = "http://www.protogeni.net/resources/rspec/2";

    fn convert_v2(xml: &str) -> Result<XmlNode, ConvertError> {
        let manifest = parse(xml.as_bytes()).expect("parse");
        let table = default_schema_table();
        let adapter = table.adapter(SchemaVersion::V2).expect("v2 profile");
        convert_manifest(&manifest, adapter.as_ref(), SLICE)
    }

    fn domain(topology: &XmlNode) -> &XmlNode {
        topology.child(UNIS, "domain").expect("domain")
    }

    fn two_node_manifest(link_body: &str) -> String {
        format!(
            r#"<rspec xmlns="{V2}">
                 <node client_id="n1" hostname="h1"><interface client_id="i1" component_id="eth1"/></node>
                 <node client_id="n2" hostname="h2"><interface client_id="i2" component_id="eth2"/></node>
                 <link client_id="l1">{link_body}</link>
               </rspec>"#
        )
    }

    #[test]
    fn strips_slice_scheme_marker() {
        assert_eq!(slice_domain(SLICE), "emulab.net+slice+lamp");
        assert_eq!(slice_domain("plain"), "plain");
    }

    #[test]
    fn converts_two_nodes_and_a_link() {
        let topology = convert_v2(&two_node_manifest(
            r#"<interface_ref client_id="i1"/><interface_ref client_id="i2"/>"#,
        ))
        .expect("convert");

        assert_eq!(topology.attr("id"), Some("genitopo"));
        let domain = domain(&topology);
        assert_eq!(
            domain.attr("id"),
            Some("urn:ogf:network:domain=emulab.net+slice+lamp")
        );

        let nodes: Vec<_> = domain.children_named(UNIS, "node").collect();
        assert_eq!(nodes.len(), 2);
        let ports: Vec<_> = nodes[0].children_named(UNIS, "port").collect();
        assert_eq!(ports.len(), 1);
        assert_eq!(
            ports[0].attr("id"),
            Some("urn:ogf:network:domain=emulab.net+slice+lamp:node=n1:port=i1")
        );
        assert_eq!(
            ports[0].child(UNIS, "name").and_then(|n| n.text.as_deref()),
            Some("eth1")
        );
        let address = nodes[1].child(UNIS, "address").expect("dns address");
        assert_eq!(address.attr("type"), Some("dns"));
        assert_eq!(address.text.as_deref(), Some("h2"));

        let link = domain.child(UNIS, "link").expect("link");
        assert_eq!(link.attr("directed"), Some("false"));
        let endpoints: Vec<_> = link
            .children_named(UNIS, "relation")
            .map(|r| {
                assert_eq!(r.attr("type"), Some("endPoint"));
                r.child(UNIS, "portIdRef")
                    .and_then(|p| p.text.clone())
                    .expect("portIdRef")
            })
            .collect();
        assert_eq!(
            endpoints,
            vec![
                "urn:ogf:network:domain=emulab.net+slice+lamp:node=n1:port=i1".to_string(),
                "urn:ogf:network:domain=emulab.net+slice+lamp:node=n2:port=i2".to_string(),
            ]
        );
    }

    #[test]
    fn rejects_links_without_exactly_two_references() {
        let one = r#"<interface_ref client_id="i1"/>"#;
        let three = r#"<interface_ref client_id="i1"/><interface_ref client_id="i2"/><interface_ref client_id="i1"/>"#;

        for (body, found) in [("", 0), (one, 1), (three, 3)] {
            let err = convert_v2(&two_node_manifest(body)).expect_err("arity");
            assert_eq!(
                err,
                ConvertError::InvalidLinkArity {
                    link: "l1".to_string(),
                    found
                }
            );
        }
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let err = convert_v2(&format!(
            r#"<rspec xmlns="{V2}"><node client_id="n1" hostname="a"/><node client_id="n1" hostname="b"/></rspec>"#
        ))
        .expect_err("duplicate");

        assert!(matches!(
            err,
            ConvertError::DuplicateIdentifier { kind: ElementKind::Node, ref id, .. } if id == "n1"
        ));
    }

    #[test]
    fn rejects_duplicate_interfaces_within_a_node() {
        let err = convert_v2(&format!(
            r#"<rspec xmlns="{V2}"><node client_id="n1"><interface client_id="i1"/><interface client_id="i1"/></node></rspec>"#
        ))
        .expect_err("duplicate");

        assert!(matches!(
            err,
            ConvertError::DuplicateIdentifier {
                kind: ElementKind::Interface,
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_links() {
        let err = convert_v2(&format!(
            r#"<rspec xmlns="{V2}">
                 <node client_id="n1"><interface client_id="i1"/><interface client_id="i2"/></node>
                 <link client_id="l1"><interface_ref client_id="i1"/><interface_ref client_id="i2"/></link>
                 <link client_id="l1"><interface_ref client_id="i1"/><interface_ref client_id="i2"/></link>
               </rspec>"#
        ))
        .expect_err("duplicate");

        assert!(matches!(
            err,
            ConvertError::DuplicateIdentifier {
                kind: ElementKind::Link,
                ..
            }
        ));
    }

    #[test]
    fn rejects_reference_to_undeclared_interface() {
        let err = convert_v2(&two_node_manifest(
            r#"<interface_ref client_id="i1"/><interface_ref client_id="i7"/>"#,
        ))
        .expect_err("dangling");

        assert_eq!(
            err,
            ConvertError::DanglingInterfaceReference {
                link: "l1".to_string(),
                interface: "i7".to_string(),
            }
        );
    }

    #[test]
    fn rejects_multiple_config_blocks() {
        let err = convert_v2(&format!(
            r#"<rspec xmlns="{V2}" xmlns:lamp="http://protogeni.net/resources/rspec/0.2/ext/lamp/1">
                 <node client_id="n1"><lamp:config/><lamp:config/></node>
               </rspec>"#
        ))
        .expect_err("two configs");

        assert_eq!(
            err,
            ConvertError::MultipleConfigBlocks {
                node: "n1".to_string()
            }
        );
    }

    #[test]
    fn rejects_multiple_link_types() {
        let err = convert_v2(&two_node_manifest(
            r#"<link_type type_name="lan"/><link_type type_name="vlan"/><interface_ref client_id="i1"/><interface_ref client_id="i2"/>"#,
        ))
        .expect_err("two link types");

        assert_eq!(
            err,
            ConvertError::MultipleLinkTypes {
                link: "l1".to_string()
            }
        );
    }

    #[test]
    fn rejects_mismatched_default_namespace() {
        let err = convert_v2(r#"<rspec xmlns="http://protogeni.net/resources/rspec/0.2"/>"#)
            .expect_err("namespace");

        assert_eq!(
            err,
            ConvertError::UnrecognizedSchemaNamespace {
                version: "2".to_string(),
                expected: V2.to_string(),
                found: Some("http://protogeni.net/resources/rspec/0.2".to_string()),
            }
        );
    }

    #[test]
    fn reference_data_lands_on_the_port() {
        let topology = convert_v2(&two_node_manifest(
            r#"<interface_ref client_id="i1" MAC="aa" IP="10.0.0.1" sliver_id="s1"/>
               <interface_ref client_id="i2"/>"#,
        ))
        .expect("convert");

        let node = domain(&topology).child(UNIS, "node").expect("node");
        let port = node.child(UNIS, "port").expect("port");
        let addresses: Vec<_> = port
            .children_named(UNIS, "address")
            .map(|a| (a.attr_or_empty("type"), a.text.as_deref().unwrap_or_default()))
            .collect();
        assert_eq!(addresses, vec![("mac", "aa"), ("ipv4", "10.0.0.1")]);

        let properties = port
            .child(UNIS, "portPropertiesBag")
            .and_then(|bag| bag.child(PROTOGENI, "portProperties"))
            .expect("portProperties");
        assert_eq!(properties.attr("sliver_id"), Some("s1"));
        assert_eq!(properties.attr("component_id"), Some("eth1"));
        assert_eq!(properties.attr("MAC"), None);
        assert_eq!(properties.attr("client_id"), None);
    }

    #[test]
    fn repeated_reference_accumulates_addresses() {
        // Addresses are not deduplicated when a link lists the same
        // interface twice.
        let topology = convert_v2(&two_node_manifest(
            r#"<interface_ref client_id="i1" MAC="aa"/><interface_ref client_id="i1" MAC="aa"/>"#,
        ))
        .expect("convert");

        let port = domain(&topology)
            .child(UNIS, "node")
            .and_then(|n| n.child(UNIS, "port"))
            .expect("port");
        assert_eq!(port.children_named(UNIS, "address").count(), 2);
    }

    #[test]
    fn passes_through_unmapped_attributes_and_children() {
        let topology = convert_v2(&format!(
            r#"<rspec xmlns="{V2}" xmlns:lamp="http://protogeni.net/resources/rspec/0.2/ext/lamp/1">
                 <node client_id="n1" hostname="h1" exclusive="true">
                   <sliver_type name="raw-pc"/>
                   <lamp:config><lamp:service type="owamp"/></lamp:config>
                 </node>
               </rspec>"#
        ))
        .expect("convert");

        let bag = domain(&topology)
            .child(UNIS, "node")
            .and_then(|n| n.child(UNIS, "nodePropertiesBag"))
            .expect("bag");
        let pgeni = bag.child(PROTOGENI, "nodeProperties").expect("pgeni");
        assert_eq!(pgeni.attr("exclusive"), Some("true"));
        assert_eq!(pgeni.attr("client_id"), None);
        assert_eq!(pgeni.attr("hostname"), None);
        assert_eq!(pgeni.children.len(), 1);
        assert_eq!(pgeni.children[0].name, QName::new(PROTOGENI, "sliver_type"));

        let psconfig = bag.child(PSCONFIG, "nodeProperties").expect("psconfig");
        assert_eq!(psconfig.children[0].name, QName::new(PSCONFIG, "service"));
        assert_eq!(psconfig.children[0].attr("type"), Some("owamp"));
    }

    #[test]
    fn link_type_becomes_unis_type() {
        let topology = convert_v2(&two_node_manifest(
            r#"<link_type type_name="lan"/><interface_ref client_id="i1"/><interface_ref client_id="i2"/><property capacity="100"/>"#,
        ))
        .expect("convert");

        let link = domain(&topology).child(UNIS, "link").expect("link");
        assert_eq!(
            link.child(UNIS, "type").and_then(|t| t.text.as_deref()),
            Some("lan")
        );
        let properties = link
            .child(UNIS, "linkPropertiesBag")
            .and_then(|bag| bag.child(PROTOGENI, "linkProperties"))
            .expect("linkProperties");
        let cloned: Vec<&str> = properties.children.iter().map(|c| c.name.local.as_str()).collect();
        assert_eq!(cloned, vec!["property"]);
    }

    #[test]
    fn link_attributes_pass_through_except_identifier() {
        let manifest = two_node_manifest(
            r#"<interface_ref client_id="i1"/><interface_ref client_id="i2"/>"#,
        )
        .replace(r#"<link client_id="l1">"#, r#"<link client_id="l1" sliver_id="s9">"#);
        let topology = convert_v2(&manifest).expect("convert");

        let properties = domain(&topology)
            .child(UNIS, "link")
            .and_then(|link| link.child(UNIS, "linkPropertiesBag"))
            .and_then(|bag| bag.child(PROTOGENI, "linkProperties"))
            .expect("linkProperties");
        assert_eq!(properties.attr("sliver_id"), Some("s9"));
        assert_eq!(properties.attr("client_id"), None);
    }
}
