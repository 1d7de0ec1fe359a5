//! NMWG request messages carrying a converted topology to a UNIS service.

use std::fmt::{self, Display, Formatter};

use xml_ns_core::XmlNode;

pub const NMWG: &str = "http://ggf.org/ns/nmwg/base/2.0/";
pub const TOPOLOGY_EVENT_TYPE: &str = "http://ggf.org/ns/nmwg/topology/20070809";
pub const CREDENTIAL_EVENT_TYPE: &str = "http://perfsonar.net/ns/protogeni/auth/credential/1";

pub const SOAP_ENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENC: &str = "http://schemas.xmlsoap.org/soap/encoding/";
const XSD: &str = "http://www.w3.org/2001/XMLSchema";
const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

const TOPOLOGY_METADATA_ID: &str = "meta0";
const CREDENTIAL_METADATA_ID: &str = "cred0";
const DATA_ID: &str = "data0";

/// Topology store operation requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnisRequest {
    /// Replace the stored topology for the slice.
    TsReplace,
    /// Merge into the stored topology.
    TsAdd,
}

impl UnisRequest {
    pub fn message_type(self) -> &'static str {
        match self {
            UnisRequest::TsReplace => "TSReplaceRequest",
            UnisRequest::TsAdd => "TSAddRequest",
        }
    }
}

impl Display for UnisRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_type())
    }
}

/// Wrap `topology` in an NMWG message of the requested type.
///
/// With a credential, a second metadata block carries it and the data block
/// points at that block instead of the topology metadata.
pub fn build_message(
    request: UnisRequest,
    topology: XmlNode,
    credential: Option<XmlNode>,
) -> XmlNode {
    let mut message = nmwg("message").with_attr("type", request.message_type());
    message
        .namespaces
        .insert("nmwg".to_string(), NMWG.to_string());

    let mut metadata = nmwg("metadata").with_attr("id", TOPOLOGY_METADATA_ID);
    metadata.children.push(event_type(TOPOLOGY_EVENT_TYPE));
    message.children.push(metadata);

    let mut data_ref = TOPOLOGY_METADATA_ID;
    if let Some(credential) = credential {
        let mut subject = nmwg("subject").with_attr("metadataIdRef", TOPOLOGY_METADATA_ID);
        subject.children.push(credential);

        let mut cred_metadata = nmwg("metadata").with_attr("id", CREDENTIAL_METADATA_ID);
        cred_metadata.children.push(subject);
        cred_metadata.children.push(event_type(CREDENTIAL_EVENT_TYPE));
        message.children.push(cred_metadata);
        data_ref = CREDENTIAL_METADATA_ID;
    }

    let mut data = nmwg("data")
        .with_attr("id", DATA_ID)
        .with_attr("metadataIdRef", data_ref);
    data.children.push(topology);
    message.children.push(data);
    message
}

/// SOAP 1.1 envelope around `message`, with an empty header.
pub fn soapify(message: XmlNode) -> XmlNode {
    let mut envelope = soap("Envelope");
    for (prefix, uri) in [
        ("SOAP-ENV", SOAP_ENV),
        ("SOAP-ENC", SOAP_ENC),
        ("xsd", XSD),
        ("xsi", XSI),
    ] {
        envelope
            .namespaces
            .insert(prefix.to_string(), uri.to_string());
    }

    let mut body = soap("Body");
    body.children.push(message);
    envelope.children.push(soap("Header"));
    envelope.children.push(body);
    envelope
}

fn nmwg(local: &str) -> XmlNode {
    let mut node = XmlNode::element(NMWG, local);
    node.prefix = Some("nmwg".to_string());
    node
}

fn event_type(uri: &str) -> XmlNode {
    let mut node = nmwg("eventType");
    node.text = Some(uri.to_string());
    node
}

fn soap(local: &str) -> XmlNode {
    let mut node = XmlNode::element(SOAP_ENV, local);
    node.prefix = Some("SOAP-ENV".to_string());
    node
}
