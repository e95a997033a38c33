//! Network enumeration port interfaces

use std::net::Ipv4Addr;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::network::AdapterRecord;

/// Enumeration errors
#[derive(Debug, Clone, Error)]
pub enum EnumerationError {
    #[error("{tool} not found")]
    ToolMissing { tool: &'static str },

    #[error("{tool} did not finish within {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("{tool} failed: {message}")]
    CommandFailed { tool: &'static str, message: String },

    #[error("Failed to list interface addresses: {0}")]
    Listing(String),
}

/// Port for listing local IPv4 adapters
#[async_trait]
pub trait InterfaceEnumerator: Send + Sync {
    /// List every IPv4 address the OS reports, in OS order.
    ///
    /// Records are unfiltered; loopback and link-local entries are dropped
    /// by the selector.
    async fn enumerate(&self) -> Result<Vec<AdapterRecord>, EnumerationError>;
}

/// Blanket implementation for boxed enumerator types
#[async_trait]
impl InterfaceEnumerator for Box<dyn InterfaceEnumerator> {
    async fn enumerate(&self) -> Result<Vec<AdapterRecord>, EnumerationError> {
        self.as_ref().enumerate().await
    }
}

/// Port for asking the routing table which local address faces outward
pub trait RouteProbe: Send + Sync {
    /// Local address the OS would use toward a public host, if any
    fn probe(&self) -> Option<Ipv4Addr>;
}

impl RouteProbe for Box<dyn RouteProbe> {
    fn probe(&self) -> Option<Ipv4Addr> {
        self.as_ref().probe()
    }
}
