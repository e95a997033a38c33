//! Network interface selector use case

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::domain::network::{
    is_reachable_candidate, select_interface, InterfaceKeywords, NetworkInterface, Selection,
    SelectionRule,
};

use super::ports::{InterfaceEnumerator, RouteProbe};

/// Everything the selector saw, plus what it picked
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceReport {
    /// Qualifying interfaces in enumeration order
    pub interfaces: Vec<NetworkInterface>,
    pub selection: Selection,
    /// Why enumeration came back empty, when it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration_error: Option<String>,
}

/// Chooses the address a phone on the LAN should be told to use.
///
/// Stateless: every call enumerates afresh.
pub struct InterfaceSelector<E, P>
where
    E: InterfaceEnumerator,
    P: RouteProbe,
{
    enumerator: E,
    probe: P,
    keywords: InterfaceKeywords,
    advertise_override: Option<Ipv4Addr>,
}

impl<E, P> InterfaceSelector<E, P>
where
    E: InterfaceEnumerator,
    P: RouteProbe,
{
    /// Create a new selector
    pub fn new(enumerator: E, probe: P, keywords: InterfaceKeywords) -> Self {
        Self {
            enumerator,
            probe,
            keywords,
            advertise_override: None,
        }
    }

    /// Skip selection and always answer with this address
    pub fn with_override(mut self, ip: Option<Ipv4Addr>) -> Self {
        self.advertise_override = ip;
        self
    }

    /// Enumerate, classify and run the cascade
    pub async fn list_interfaces(&self) -> InterfaceReport {
        let (interfaces, enumeration_error) = match self.enumerator.enumerate().await {
            Ok(records) => {
                let interfaces: Vec<NetworkInterface> = records
                    .into_iter()
                    .filter(|r| is_reachable_candidate(r.ipv4))
                    .map(|r| self.keywords.classify(r))
                    .collect();
                (interfaces, None)
            }
            Err(e) => {
                log::warn!("Interface enumeration failed: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        for iface in &interfaces {
            log::debug!(
                "Interface {} {} gateway={} wireless={} virtual={}",
                iface.label(),
                iface.ip,
                iface.has_gateway,
                iface.is_wireless,
                iface.is_virtual
            );
        }

        let selection = match self.advertise_override {
            Some(ip) => Selection::with_rule(ip, SelectionRule::Configured),
            None => self.choose(&interfaces),
        };

        log::info!("Advertising {} ({})", selection.ip, selection.rule);

        InterfaceReport {
            interfaces,
            selection,
            enumeration_error,
        }
    }

    /// Run selection and return only the outcome
    pub async fn select(&self) -> Selection {
        if let Some(ip) = self.advertise_override {
            return Selection::with_rule(ip, SelectionRule::Configured);
        }
        self.list_interfaces().await.selection
    }

    /// The single address to advertise.
    ///
    /// When enumeration fails or nothing qualifies, the route probe is
    /// asked next; `127.0.0.1` is returned only if the probe has no usable
    /// answer either. The cascade alone (`select_interface`) goes straight
    /// to `127.0.0.1`.
    pub async fn best_ip(&self) -> Ipv4Addr {
        self.select().await.ip
    }

    fn choose(&self, interfaces: &[NetworkInterface]) -> Selection {
        let selection = select_interface(interfaces);
        if !selection.is_fallback() {
            return selection;
        }

        match self.probe.probe() {
            Some(ip) if is_reachable_candidate(ip) => {
                log::debug!("Route probe answered {}", ip);
                Selection::with_rule(ip, SelectionRule::RouteProbe)
            }
            _ => selection,
        }
    }
}
