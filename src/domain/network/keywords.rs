//! Keyword lists used to classify interfaces by name

use super::interface::{AdapterRecord, NetworkInterface};

/// Default substrings identifying wireless adapters
pub const DEFAULT_WIRELESS_KEYWORDS: &[&str] = &["wlan", "wi-fi", "wifi", "wireless", "无线"];

/// Default substrings identifying hypervisor, container and tunnel adapters
pub const DEFAULT_VIRTUAL_KEYWORDS: &[&str] = &[
    "virtual",
    "vmware",
    "vmnet",
    "virtualbox",
    "vbox",
    "hyper-v",
    "vethernet",
    "veth",
    "docker",
    "br-",
    "virbr",
    "bridge",
    "podman",
    "cni",
    "flannel",
    "vpn",
    "tun",
    "tap",
    "wsl",
    "zerotier",
    "tailscale",
    "wireguard",
    "hamachi",
    "parallels",
    "awdl",
    "llw",
    "loopback",
    "虚拟",
];

/// Case-insensitive substring classifier.
///
/// The lists are configuration data; see `NetworkConfig` for overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceKeywords {
    wireless: Vec<String>,
    virtual_adapters: Vec<String>,
}

impl InterfaceKeywords {
    pub fn new<W, V>(wireless: W, virtual_adapters: V) -> Self
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        Self {
            wireless: normalize(wireless),
            virtual_adapters: normalize(virtual_adapters),
        }
    }

    pub fn wireless(&self) -> &[String] {
        &self.wireless
    }

    pub fn virtual_adapters(&self) -> &[String] {
        &self.virtual_adapters
    }

    pub fn is_wireless_name(&self, name: &str) -> bool {
        contains_any(name, &self.wireless)
    }

    pub fn is_virtual_name(&self, name: &str) -> bool {
        contains_any(name, &self.virtual_adapters)
    }

    /// Derive the wireless/virtual flags for an enumerated adapter.
    ///
    /// Both the name and the description are matched.
    pub fn classify(&self, record: AdapterRecord) -> NetworkInterface {
        let description = record.description.as_deref();
        let is_wireless = record.wireless_hint
            || self.is_wireless_name(&record.name)
            || description.is_some_and(|d| self.is_wireless_name(d));
        let is_virtual = self.is_virtual_name(&record.name)
            || description.is_some_and(|d| self.is_virtual_name(d));

        NetworkInterface {
            name: record.name,
            description: record.description,
            ip: record.ipv4,
            has_gateway: record.has_gateway,
            is_wireless,
            is_virtual,
        }
    }
}

impl Default for InterfaceKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_WIRELESS_KEYWORDS, DEFAULT_VIRTUAL_KEYWORDS)
    }
}

fn normalize<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
