//! Network interface value objects

use std::net::Ipv4Addr;

use serde::Serialize;

/// One IPv4 address as reported by a platform enumerator, before any
/// keyword classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRecord {
    /// OS interface name (`wlan0`, `en0`, `Wireless LAN adapter Wi-Fi`)
    pub name: String,
    /// Secondary label such as a macOS hardware port name
    pub description: Option<String>,
    pub ipv4: Ipv4Addr,
    pub has_gateway: bool,
    /// Set when the platform itself reports the adapter as wireless
    pub wireless_hint: bool,
}

impl AdapterRecord {
    pub fn new(name: impl Into<String>, ipv4: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            description: None,
            ipv4,
            has_gateway: false,
            wireless_hint: false,
        }
    }

    pub fn with_gateway(mut self, has_gateway: bool) -> Self {
        self.has_gateway = has_gateway;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_wireless_hint(mut self, wireless: bool) -> Self {
        self.wireless_hint = wireless;
        self
    }
}

/// A classified local network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ip: Ipv4Addr,
    pub has_gateway: bool,
    pub is_wireless: bool,
    pub is_virtual: bool,
}

impl NetworkInterface {
    /// Human-readable label combining name and description
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) if description != &self.name => {
                format!("{} ({})", self.name, description)
            }
            _ => self.name.clone(),
        }
    }
}

/// Whether an address could ever be reached by a phone on the LAN.
///
/// Loopback (127.0.0.0/8), link-local auto-configuration (169.254.0.0/16)
/// and the unspecified address never qualify.
pub fn is_reachable_candidate(ip: Ipv4Addr) -> bool {
    !(ip.is_loopback() || ip.is_link_local() || ip.is_unspecified())
}
