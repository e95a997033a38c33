//! Application configuration value object

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::domain::duration::Duration;
use crate::domain::network::{
    InterfaceKeywords, DEFAULT_VIRTUAL_KEYWORDS, DEFAULT_WIRELESS_KEYWORDS,
};

/// Port the upload endpoint listens on by default
pub const DEFAULT_PORT: u16 = 8080;

/// Address the upload endpoint binds to by default
pub const DEFAULT_BIND: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default request body cap in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

/// Interface classification overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub wireless_keywords: Option<Vec<String>>,
    pub virtual_keywords: Option<Vec<String>>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub advertise_ip: Option<String>,
    pub helper_timeout: Option<String>,
    pub max_upload_mb: Option<u64>,
    pub notify: Option<bool>,
    pub qr: Option<bool>,
    pub network: Option<NetworkConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND.to_string()),
            advertise_ip: None,
            helper_timeout: Some(Duration::default_helper_timeout().to_string()),
            max_upload_mb: Some(DEFAULT_MAX_UPLOAD_MB),
            notify: Some(false),
            qr: Some(true),
            network: Some(NetworkConfig {
                wireless_keywords: Some(to_owned_list(DEFAULT_WIRELESS_KEYWORDS)),
                virtual_keywords: Some(to_owned_list(DEFAULT_VIRTUAL_KEYWORDS)),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            port: other.port.or(self.port),
            bind: other.bind.or(self.bind),
            advertise_ip: other.advertise_ip.or(self.advertise_ip),
            helper_timeout: other.helper_timeout.or(self.helper_timeout),
            max_upload_mb: other.max_upload_mb.or(self.max_upload_mb),
            notify: other.notify.or(self.notify),
            qr: other.qr.or(self.qr),
            network: Self::merge_network_config(self.network, other.network),
        }
    }

    /// Merge network config sections
    fn merge_network_config(
        base: Option<NetworkConfig>,
        other: Option<NetworkConfig>,
    ) -> Option<NetworkConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(NetworkConfig {
                wireless_keywords: o.wireless_keywords.or(b.wireless_keywords),
                virtual_keywords: o.virtual_keywords.or(b.virtual_keywords),
            }),
        }
    }

    /// Get port, or 8080 if not set
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Get bind address, or 0.0.0.0 if not set/invalid
    pub fn bind_or_default(&self) -> IpAddr {
        self.bind
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_BIND)
    }

    /// Get the advertised address override, if set and valid
    pub fn advertise_ip(&self) -> Option<Ipv4Addr> {
        self.advertise_ip
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Get helper timeout as parsed Duration, or default if not set/invalid
    pub fn helper_timeout_or_default(&self) -> Duration {
        self.helper_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_helper_timeout)
    }

    /// Get upload cap in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb
            .filter(|mb| *mb > 0)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB)
            .saturating_mul(1024 * 1024)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get QR banner setting, or true if not set
    pub fn qr_or_default(&self) -> bool {
        self.qr.unwrap_or(true)
    }

    /// Build the interface classifier, falling back to the built-in lists
    /// for whichever list is not configured.
    pub fn interface_keywords(&self) -> InterfaceKeywords {
        let network = self.network.as_ref();
        let wireless = network.and_then(|n| n.wireless_keywords.clone());
        let virtual_adapters = network.and_then(|n| n.virtual_keywords.clone());

        InterfaceKeywords::new(
            wireless.unwrap_or_else(|| to_owned_list(DEFAULT_WIRELESS_KEYWORDS)),
            virtual_adapters.unwrap_or_else(|| to_owned_list(DEFAULT_VIRTUAL_KEYWORDS)),
        )
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
