//! Hierarchical UNIS identifiers.
//!
//! A URN always starts with a domain segment and may continue with either a
//! node (optionally followed by a port or a service) or a link:
//!
//! ```text
//! urn:ogf:network:domain=udel.edu
//! urn:ogf:network:domain=udel.edu:node=stout
//! urn:ogf:network:domain=udel.edu:node=stout:port=eth0
//! urn:ogf:network:domain=udel.edu:node=stout:service=bwctl
//! urn:ogf:network:domain=udel.edu:link=l1
//! ```

use thiserror::Error;

const URN_PREFIX: &str = "urn:ogf:network:";

/// Segment combinations the builder refuses to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrnError {
    #[error("URN must be fully qualified; no domain provided")]
    MissingDomain,
    #[error("URN must be fully qualified; no node given for port")]
    PortWithoutNode,
    #[error("URN must be fully qualified; invalid link urn (link under a node)")]
    LinkWithNode,
    #[error("URN must be fully qualified; invalid link urn (link combined with port or service)")]
    LinkWithPortOrService,
    #[error("URN must be fully qualified; invalid service urn (no node)")]
    ServiceWithoutNode,
    #[error("URN must be fully qualified; invalid service urn (service under a port)")]
    ServiceWithPort,
}

/// Builder for a single URN. Segments are validated in [`Urn::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Urn<'a> {
    domain: &'a str,
    node: Option<&'a str>,
    port: Option<&'a str>,
    link: Option<&'a str>,
    service: Option<&'a str>,
}

impl<'a> Urn<'a> {
    pub fn domain(domain: &'a str) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    pub fn node(mut self, node: &'a str) -> Self {
        self.node = Some(node);
        self
    }

    pub fn port(mut self, port: &'a str) -> Self {
        self.port = Some(port);
        self
    }

    pub fn link(mut self, link: &'a str) -> Self {
        self.link = Some(link);
        self
    }

    pub fn service(mut self, service: &'a str) -> Self {
        self.service = Some(service);
        self
    }

    /// Concatenate the segments, enforcing the combination rules.
    pub fn build(&self) -> Result<String, UrnError> {
        if self.domain.is_empty() {
            return Err(UrnError::MissingDomain);
        }
        if self.port.is_some() && self.node.is_none() {
            return Err(UrnError::PortWithoutNode);
        }
        if self.link.is_some() {
            if self.node.is_some() {
                return Err(UrnError::LinkWithNode);
            }
            if self.port.is_some() || self.service.is_some() {
                return Err(UrnError::LinkWithPortOrService);
            }
        }
        if self.service.is_some() {
            if self.node.is_none() {
                return Err(UrnError::ServiceWithoutNode);
            }
            if self.port.is_some() {
                return Err(UrnError::ServiceWithPort);
            }
        }

        let mut urn = format!("{URN_PREFIX}domain={}", self.domain);
        if let Some(node) = self.node {
            urn.push_str(&format!(":node={node}"));
        }
        if let Some(port) = self.port {
            urn.push_str(&format!(":port={port}"));
        }
        if let Some(link) = self.link {
            urn.push_str(&format!(":link={link}"));
        }
        if let Some(service) = self.service {
            urn.push_str(&format!(":service={service}"));
        }
        Ok(urn)
    }
}
