//! Network infrastructure module
//!
//! Addresses come from the OS interface listing; per-OS enumerators add
//! the metadata it lacks (default routes, adapter labels, wireless flags).
//! Every parser is compiled on all platforms; only the factory picks by
//! target.

mod addresses;
mod command;
mod linux;
mod macos;
mod probe;
mod windows;

pub use addresses::list_ipv4_addresses;
pub use command::run_command;
pub use linux::{parse_default_route_devices, parse_route_table, LinuxEnumerator};
pub use macos::{parse_hardware_ports, parse_route_get_interface, MacosEnumerator};
pub use probe::LocalIpProbe;
pub use windows::{parse_ipconfig, IpconfigEnumerator};

use crate::application::ports::InterfaceEnumerator;
use crate::domain::duration::Duration;

/// Create the interface enumerator for the current platform
///
/// `timeout` bounds each enumeration command separately.
pub fn create_enumerator(timeout: Duration) -> Box<dyn InterfaceEnumerator> {
    let timeout = timeout.as_std();

    #[cfg(windows)]
    return Box::new(IpconfigEnumerator::new(timeout));

    #[cfg(target_os = "macos")]
    return Box::new(MacosEnumerator::new(timeout));

    #[cfg(not(any(windows, target_os = "macos")))]
    Box::new(LinuxEnumerator::new(timeout))
}
