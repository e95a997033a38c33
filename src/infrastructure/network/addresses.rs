//! IPv4 addresses per interface, straight from the OS

use std::net::{IpAddr, Ipv4Addr};

use crate::application::ports::EnumerationError;

/// Every IPv4 address the OS reports as `(interface, address)`, in OS order
pub fn list_ipv4_addresses() -> Result<Vec<(String, Ipv4Addr)>, EnumerationError> {
    let addresses = local_ip_address::list_afinet_netifas()
        .map_err(|e| EnumerationError::Listing(e.to_string()))?;
    Ok(only_ipv4(addresses))
}

fn only_ipv4(addresses: Vec<(String, IpAddr)>) -> Vec<(String, Ipv4Addr)> {
    addresses
        .into_iter()
        .filter_map(|(name, ip)| match ip {
            IpAddr::V4(v4) => Some((name, v4)),
            IpAddr::V6(_) => None,
        })
        .collect()
}
