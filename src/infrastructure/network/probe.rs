//! Route probe: which local address faces the internet

use std::net::{IpAddr, Ipv4Addr};

use crate::application::ports::RouteProbe;

/// Asks the OS for its outward-facing local address
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIpProbe;

impl LocalIpProbe {
    pub fn new() -> Self {
        Self
    }
}

impl RouteProbe for LocalIpProbe {
    fn probe(&self) -> Option<Ipv4Addr> {
        match local_ip_address::local_ip() {
            Ok(IpAddr::V4(ip)) if !ip.is_unspecified() => Some(ip),
            Ok(other) => {
                log::debug!("Route probe answered unusable address {}", other);
                None
            }
            Err(e) => {
                log::debug!("Route probe failed: {}", e);
                None
            }
        }
    }
}
