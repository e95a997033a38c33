//! Local network interfaces and the reachability cascade

mod cascade;
mod interface;
mod keywords;

pub use cascade::{select_interface, Selection, SelectionRule, FALLBACK_IP};
pub use interface::{is_reachable_candidate, AdapterRecord, NetworkInterface};
pub use keywords::{InterfaceKeywords, DEFAULT_VIRTUAL_KEYWORDS, DEFAULT_WIRELESS_KEYWORDS};
