//! Windows interface metadata via `ipconfig`
//!
//! Addresses come from the OS listing; `ipconfig` adds the adapter header
//! (`Wireless LAN adapter Wi-Fi`) and gateway presence, matched by address.
//! The output is localized; headers and keys are recognised in English and
//! Chinese.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{EnumerationError, InterfaceEnumerator};
use crate::domain::network::AdapterRecord;

use super::addresses::list_ipv4_addresses;
use super::command::run_command;

const IPV4_KEYS: &[&str] = &["IPv4", "IP Address", "IP 地址"];
const GATEWAY_KEYS: &[&str] = &["Gateway", "网关"];

/// Lists addresses and decorates them from `ipconfig`
pub struct IpconfigEnumerator {
    timeout: Duration,
}

impl IpconfigEnumerator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl InterfaceEnumerator for IpconfigEnumerator {
    async fn enumerate(&self) -> Result<Vec<AdapterRecord>, EnumerationError> {
        let addresses = list_ipv4_addresses()?;

        // Switch the console to UTF-8 so localized output decodes cleanly
        let listing = run_command("cmd", &["/C", "chcp 65001 >NUL & ipconfig"], self.timeout);
        let adapters = match listing.await {
            Ok(output) => parse_ipconfig(&output),
            Err(e) => {
                log::debug!("ipconfig failed: {}", e);
                Vec::new()
            }
        };

        Ok(decorate(addresses, &adapters))
    }
}

/// Attach the `ipconfig` header and gateway flag of the adapter holding
/// each address
fn decorate(
    addresses: Vec<(String, Ipv4Addr)>,
    adapters: &[AdapterRecord],
) -> Vec<AdapterRecord> {
    addresses
        .into_iter()
        .map(|(name, ip)| match adapters.iter().find(|a| a.ipv4 == ip) {
            Some(adapter) => AdapterRecord::new(name, ip)
                .with_gateway(adapter.has_gateway)
                .with_description(adapter.name.clone()),
            None => AdapterRecord::new(name, ip),
        })
        .collect()
}

#[derive(Default)]
struct AdapterBlock {
    name: String,
    addresses: Vec<Ipv4Addr>,
    has_gateway: bool,
}

impl AdapterBlock {
    fn into_records(self) -> impl Iterator<Item = AdapterRecord> {
        let Self {
            name,
            addresses,
            has_gateway,
        } = self;
        addresses
            .into_iter()
            .map(move |ip| AdapterRecord::new(name.clone(), ip).with_gateway(has_gateway))
    }
}

/// Parse `ipconfig` output into adapter records, in listing order
pub fn parse_ipconfig(output: &str) -> Vec<AdapterRecord> {
    let mut records = Vec::new();
    let mut block: Option<AdapterBlock> = None;
    let mut in_gateway = false;

    for raw in output.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            if let Some(done) = block.take() {
                records.extend(done.into_records());
            }
            in_gateway = false;
            if let Some(name) = line.strip_suffix(':') {
                block = Some(AdapterBlock {
                    name: name.trim().to_string(),
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(current) = block.as_mut() else {
            continue;
        };
        let trimmed = line.trim();

        match trimmed.split_once(" :") {
            Some((key, value)) => {
                let key = key.trim_end_matches(['.', ' ']);
                let value = value.trim();
                in_gateway = GATEWAY_KEYS.iter().any(|k| key.contains(k));

                if in_gateway {
                    current.has_gateway |= is_gateway(value);
                } else if IPV4_KEYS.iter().any(|k| key.contains(k)) {
                    if let Some(ip) = leading_ipv4(value) {
                        current.addresses.push(ip);
                    }
                }
            }
            // Continuation of a multi-valued key, e.g. a second gateway
            None if in_gateway => {
                current.has_gateway |= is_gateway(trimmed);
            }
            None => {}
        }
    }

    if let Some(done) = block.take() {
        records.extend(done.into_records());
    }
    records
}

fn is_gateway(value: &str) -> bool {
    leading_ipv4(value).is_some_and(|ip| !ip.is_unspecified())
}

/// Parse an address such as `192.168.0.40(Preferred)` or `192.168.1.5(首选)`
fn leading_ipv4(value: &str) -> Option<Ipv4Addr> {
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
