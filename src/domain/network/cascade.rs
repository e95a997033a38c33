//! Interface selection cascade
//!
//! Picks the address a phone on the same Wi-Fi is most likely able to reach.
//! The rules are an ordered sequence of filters, not a score: the first rule
//! that matches any interface wins, and the first matching interface in
//! enumeration order is chosen.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::interface::{is_reachable_candidate, NetworkInterface};

/// Address returned when nothing qualifies
pub const FALLBACK_IP: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Which cascade step produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Wireless and not virtual
    Wireless,
    /// Has a default gateway and is not virtual
    PhysicalGateway,
    /// Has a default gateway, virtual adapters admitted
    AnyGateway,
    /// Not virtual, gateway ignored
    Physical,
    /// First enumerated interface
    FirstEnumerated,
    /// Route probe answered when enumeration found nothing
    RouteProbe,
    /// Configured address, no enumeration involved
    Configured,
    /// Nothing qualified
    LoopbackFallback,
}

impl SelectionRule {
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Wireless => "wireless adapter",
            Self::PhysicalGateway => "physical adapter with default gateway",
            Self::AnyGateway => "adapter with default gateway",
            Self::Physical => "physical adapter",
            Self::FirstEnumerated => "first enumerated adapter",
            Self::RouteProbe => "default route probe",
            Self::Configured => "configured address",
            Self::LoopbackFallback => "loopback fallback",
        }
    }
}

impl fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

type Rule = fn(&NetworkInterface) -> bool;

const CASCADE: [(SelectionRule, Rule); 5] = [
    (SelectionRule::Wireless, |i| i.is_wireless && !i.is_virtual),
    (SelectionRule::PhysicalGateway, |i| i.has_gateway && !i.is_virtual),
    (SelectionRule::AnyGateway, |i| i.has_gateway),
    (SelectionRule::Physical, |i| !i.is_virtual),
    (SelectionRule::FirstEnumerated, |_| true),
];

/// Outcome of interface selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub ip: Ipv4Addr,
    pub rule: SelectionRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<NetworkInterface>,
}

impl Selection {
    pub fn fallback() -> Self {
        Self {
            ip: FALLBACK_IP,
            rule: SelectionRule::LoopbackFallback,
            interface: None,
        }
    }

    pub fn with_rule(ip: Ipv4Addr, rule: SelectionRule) -> Self {
        Self {
            ip,
            rule,
            interface: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule == SelectionRule::LoopbackFallback
    }
}

/// Run the cascade over interfaces in enumeration order.
///
/// Loopback and link-local addresses are discarded before any rule runs.
/// Never fails: an empty or fully excluded set yields [`FALLBACK_IP`].
pub fn select_interface(interfaces: &[NetworkInterface]) -> Selection {
    let candidates: Vec<&NetworkInterface> = interfaces
        .iter()
        .filter(|i| is_reachable_candidate(i.ip))
        .collect();

    for (rule, accepts) in CASCADE {
        if let Some(chosen) = candidates.iter().find(|i| accepts(i)) {
            return Selection {
                ip: chosen.ip,
                rule,
                interface: Some((*chosen).clone()),
            };
        }
    }

    Selection::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(
        name: &str,
        ip: [u8; 4],
        gateway: bool,
        wireless: bool,
        virt: bool,
    ) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: None,
            ip: Ipv4Addr::from(ip),
            has_gateway: gateway,
            is_wireless: wireless,
            is_virtual: virt,
        }
    }

    #[test]
    fn wireless_beats_gateway_and_wired() {
        let set = [
            iface("veth0", [172, 17, 0, 1], true, false, true),
            iface("eth0", [10, 0, 0, 7], false, false, false),
            iface("wifi0", [192, 168, 1, 23], true, true, false),
        ];
        let selection = select_interface(&set);
        assert_eq!(selection.ip, Ipv4Addr::new(192, 168, 1, 23));
        assert_eq!(selection.rule, SelectionRule::Wireless);
        assert_eq!(selection.interface.unwrap().name, "wifi0");
    }

    #[test]
    fn lone_virtual_gateway_is_step_three() {
        let set = [iface("veth0", [172, 17, 0, 1], true, false, true)];
        let selection = select_interface(&set);
        assert_eq!(selection.ip, Ipv4Addr::new(172, 17, 0, 1));
        assert_eq!(selection.rule, SelectionRule::AnyGateway);
    }

    #[test]
    fn empty_set_falls_back_to_loopback() {
        let selection = select_interface(&[]);
        assert_eq!(selection.ip, FALLBACK_IP);
        assert_eq!(selection.ip.to_string(), "127.0.0.1");
        assert!(selection.is_fallback());
    }

    #[test]
    fn physical_gateway_beats_virtual_gateway() {
        let set = [
            iface("vEthernet (WSL)", [172, 20, 96, 1], true, false, true),
            iface("Ethernet", [192, 168, 0, 40], true, false, false),
        ];
        let selection = select_interface(&set);
        assert_eq!(selection.ip, Ipv4Addr::new(192, 168, 0, 40));
        assert_eq!(selection.rule, SelectionRule::PhysicalGateway);
    }

    #[test]
    fn virtual_wireless_does_not_win_step_one() {
        let set = [
            iface("Wi-Fi Direct Virtual", [192, 168, 137, 1], false, true, true),
            iface("eth0", [192, 168, 0, 9], false, false, false),
        ];
        let selection = select_interface(&set);
        assert_eq!(selection.ip, Ipv4Addr::new(192, 168, 0, 9));
        assert_eq!(selection.rule, SelectionRule::Physical);
    }

    #[test]
    fn all_virtual_without_gateway_takes_first() {
        let set = [
            iface("docker0", [172, 17, 0, 1], false, false, true),
            iface("virbr0", [192, 168, 122, 1], false, false, true),
        ];
        let selection = select_interface(&set);
        assert_eq!(selection.ip, Ipv4Addr::new(172, 17, 0, 1));
        assert_eq!(selection.rule, SelectionRule::FirstEnumerated);
    }

    #[test]
    fn loopback_and_link_local_never_selected() {
        let set = [
            iface("lo", [127, 0, 0, 1], true, false, false),
            iface("wlan0", [169, 254, 3, 4], true, true, false),
        ];
        let selection = select_interface(&set);
        assert!(selection.is_fallback());
    }

    #[test]
    fn enumeration_order_breaks_ties() {
        let set = [
            iface("wlan1", [192, 168, 50, 2], false, true, false),
            iface("wlan0", [192, 168, 1, 2], true, true, false),
        ];
        assert_eq!(select_interface(&set).ip, Ipv4Addr::new(192, 168, 50, 2));
    }
}
