//! macOS interface metadata: default route and hardware port names

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{EnumerationError, InterfaceEnumerator};
use crate::domain::network::AdapterRecord;

use super::addresses::list_ipv4_addresses;
use super::command::run_command;

/// Hardware port names macOS uses for wireless adapters
const WIRELESS_PORTS: &[&str] = &["Wi-Fi", "AirPort"];

/// Enumerates adapters on macOS
pub struct MacosEnumerator {
    timeout: Duration,
}

impl MacosEnumerator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl InterfaceEnumerator for MacosEnumerator {
    async fn enumerate(&self) -> Result<Vec<AdapterRecord>, EnumerationError> {
        let addresses = list_ipv4_addresses()?;

        let route = run_command("route", &["-n", "get", "default"], self.timeout);
        let gateway = match route.await {
            Ok(out) => parse_route_get_interface(&out),
            Err(e) => {
                log::debug!("Default route lookup failed: {}", e);
                None
            }
        };

        let listing = run_command("networksetup", &["-listallhardwareports"], self.timeout);
        let ports = match listing.await {
            Ok(out) => parse_hardware_ports(&out),
            Err(e) => {
                log::debug!("Hardware port listing failed: {}", e);
                HashMap::new()
            }
        };

        Ok(records(addresses, gateway.as_deref(), &ports))
    }
}

/// Attach gateway and hardware-port metadata to listed addresses
fn records(
    addresses: Vec<(String, Ipv4Addr)>,
    gateway: Option<&str>,
    ports: &HashMap<String, String>,
) -> Vec<AdapterRecord> {
    addresses
        .into_iter()
        .map(|(name, ip)| {
            let has_gateway = gateway == Some(name.as_str());
            let port = ports.get(&name).cloned();
            let wireless = port
                .as_deref()
                .is_some_and(|p| WIRELESS_PORTS.contains(&p));

            let record = AdapterRecord::new(name, ip)
                .with_gateway(has_gateway)
                .with_wireless_hint(wireless);
            match port {
                Some(port) => record.with_description(port),
                None => record,
            }
        })
        .collect()
}

/// Interface named by `route -n get default`
pub fn parse_route_get_interface(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("interface:")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

/// Map device name to hardware port from `networksetup -listallhardwareports`
pub fn parse_hardware_ports(output: &str) -> HashMap<String, String> {
    let mut ports = HashMap::new();
    let mut port: Option<String> = None;

    for line in output.lines() {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("Hardware Port:") {
            port = Some(name.trim().to_string());
        } else if let Some(device) = line.strip_prefix("Device:") {
            if let Some(port) = port.take() {
                ports.insert(device.trim().to_string(), port);
            }
        }
    }

    ports
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_GET: &str = "\
   route to: default
destination: default
       mask: default
    gateway: 192.168.1.1
  interface: en0
      flags: <UP,GATEWAY,DONE,STATIC,PRCLONING>
";

    const HARDWARE_PORTS: &str = "\

Hardware Port: Ethernet
Device: en1
Ethernet Address: 3c:22:fb:00:00:02

Hardware Port: Wi-Fi
Device: en0
Ethernet Address: 3c:22:fb:00:00:01

Hardware Port: Thunderbolt Bridge
Device: bridge0
Ethernet Address: 82:00:00:00:00:00

VLAN Configurations
===================
";

    #[test]
    fn default_route_interface() {
        assert_eq!(parse_route_get_interface(ROUTE_GET), Some("en0".to_string()));
        let missing = "route: writing to routing socket: not in table";
        assert_eq!(parse_route_get_interface(missing), None);
    }

    #[test]
    fn hardware_ports() {
        let ports = parse_hardware_ports(HARDWARE_PORTS);
        assert_eq!(ports.get("en0").map(String::as_str), Some("Wi-Fi"));
        assert_eq!(
            ports.get("bridge0").map(String::as_str),
            Some("Thunderbolt Bridge")
        );
        assert_eq!(ports.len(), 3);
    }

    #[test]
    fn records_carry_port_and_gateway() {
        let addresses = vec![
            ("utun3".to_string(), Ipv4Addr::new(100, 64, 0, 7)),
            ("en0".to_string(), Ipv4Addr::new(192, 168, 1, 10)),
        ];
        let ports = parse_hardware_ports(HARDWARE_PORTS);
        let records = records(addresses, parse_route_get_interface(ROUTE_GET).as_deref(), &ports);

        assert!(records[0].description.is_none());
        assert!(!records[0].has_gateway);
        assert_eq!(records[1].description.as_deref(), Some("Wi-Fi"));
        assert!(records[1].has_gateway && records[1].wireless_hint);
    }
}
