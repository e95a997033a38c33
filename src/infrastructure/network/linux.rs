//! Linux interface metadata: default routes and the sysfs wireless flag

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{EnumerationError, InterfaceEnumerator};
use crate::domain::network::AdapterRecord;

use super::addresses::list_ipv4_addresses;
use super::command::run_command;

/// Lists addresses, then marks gateways with `ip route` (or `route -n`)
pub struct LinuxEnumerator {
    timeout: Duration,
    sysfs_net: PathBuf,
}

impl LinuxEnumerator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            sysfs_net: PathBuf::from("/sys/class/net"),
        }
    }

    /// Interfaces carrying a default route; empty when neither tool answers
    async fn gateway_devices(&self) -> HashSet<String> {
        let iproute2 = run_command("ip", &["-4", "route", "show", "default"], self.timeout);
        match iproute2.await {
            Ok(routes) => return parse_default_route_devices(&routes),
            Err(EnumerationError::ToolMissing { .. }) => {
                log::debug!("ip not found, trying route -n");
            }
            Err(e) => {
                log::debug!("Default route lookup failed: {}", e);
                return HashSet::new();
            }
        }

        match run_command("route", &["-n"], self.timeout).await {
            Ok(table) => parse_route_table(&table),
            Err(e) => {
                log::debug!("Default route lookup failed: {}", e);
                HashSet::new()
            }
        }
    }

    fn is_wireless(&self, name: &str) -> bool {
        self.sysfs_net.join(name).join("wireless").exists()
    }

    fn records(
        &self,
        addresses: Vec<(String, Ipv4Addr)>,
        gateways: &HashSet<String>,
    ) -> Vec<AdapterRecord> {
        addresses
            .into_iter()
            .map(|(name, ip)| {
                let wireless = self.is_wireless(&name);
                let has_gateway = gateways.contains(&name);
                AdapterRecord::new(name, ip)
                    .with_gateway(has_gateway)
                    .with_wireless_hint(wireless)
            })
            .collect()
    }
}

#[async_trait]
impl InterfaceEnumerator for LinuxEnumerator {
    async fn enumerate(&self) -> Result<Vec<AdapterRecord>, EnumerationError> {
        let addresses = list_ipv4_addresses()?;
        let gateways = self.gateway_devices().await;
        Ok(self.records(addresses, &gateways))
    }
}

/// Interfaces carrying a default route in `ip -4 route show default`
pub fn parse_default_route_devices(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with("default"))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            tokens.by_ref().find(|t| *t == "dev")?;
            tokens.next().map(str::to_string)
        })
        .collect()
}

/// Interfaces carrying a default route in `route -n`
pub fn parse_route_table(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let is_default = tokens.first() == Some(&"0.0.0.0")
                && tokens.get(3).is_some_and(|flags| flags.contains('G'));
            if is_default {
                tokens.last().map(|s| s.to_string())
            } else {
                None
            }
        })
        .collect()
}
