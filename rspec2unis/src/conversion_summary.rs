use serde::Serialize;
use xml_ns_core::XmlNode;

use crate::namespaces::UNIS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub nodes: usize,
    pub ports: usize,
    pub links: usize,
    pub addresses: usize,
}

/// Count what a conversion produced. Works on a bare topology as well as on
/// one wrapped in a message or SOAP envelope.
pub fn summarize(root: &XmlNode) -> ConversionSummary {
    let mut summary = ConversionSummary::default();
    root.walk(&mut |element| {
        if !element.name.in_namespace(UNIS) {
            return;
        }
        match element.name.local.as_str() {
            "node" => summary.nodes += 1,
            "port" => summary.ports += 1,
            "link" => summary.links += 1,
            "address" => summary.addresses += 1,
            _ => {}
        }
    });
    summary
}

pub fn render(summary: ConversionSummary) -> String {
    format!(
        "convert_summary nodes={} ports={} links={} addresses={}",
        summary.nodes, summary.ports, summary.links, summary.addresses
    )
}
