//! Main app runner: wiring adapters together and serving uploads

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{ConfigStore, InterfaceEnumerator};
use crate::application::{ClipboardCommitter, InterfaceSelector, PasteImageUseCase};
use crate::domain::config::AppConfig;
use crate::domain::error::UnsupportedPlatformError;
use crate::domain::Duration;
use crate::infrastructure::{
    create_enumerator, create_notifier, create_strategy_chain, LocalIpProbe, XdgConfigStore,
};
use crate::server::{listen_addr, serve, server_url, SharedPaste};

use super::presenter::Presenter;
use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the port
pub const ENV_PORT: &str = "SNAPPASTE_PORT";

/// Environment variable overriding the advertised address
pub const ENV_ADVERTISE_IP: &str = "SNAPPASTE_ADVERTISE_IP";

/// Selector wired to the platform enumerator
pub type PlatformSelector = InterfaceSelector<Box<dyn InterfaceEnumerator>, LocalIpProbe>;

/// Run the upload server until Ctrl+C
pub async fn run_server(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let paste = match build_paste(&config) {
        Ok(paste) => paste,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let bind = config.bind_or_default();
    let selection = build_selector(&config).select().await;

    let (bound, server) = match serve(
        Arc::clone(&paste),
        config.max_upload_bytes(),
        listen_addr(bind, config.port_or_default()),
        shutdown_signal(),
    ) {
        Ok(server) => server,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    log::info!("Listening on {}", bound);

    let url = server_url(selection.ip, bound.port());
    presenter.banner(&url, &selection, &paste.strategy_names());
    if config.qr_or_default() {
        presenter.qr(&url);
    }
    presenter.info("Press Ctrl+C to stop");

    server.await;

    presenter.success("Server stopped");
    ExitCode::from(EXIT_SUCCESS)
}

/// Build the paste use case around this platform's clipboard chain
pub fn build_paste(config: &AppConfig) -> Result<SharedPaste, UnsupportedPlatformError> {
    let chain = create_strategy_chain(config.helper_timeout_or_default())?;
    log::debug!("Clipboard strategies: {:?}", chain);

    let notify = config.notify_or_default();
    let use_case = PasteImageUseCase::new(
        ClipboardCommitter::new(chain),
        create_notifier(notify),
        notify,
    );
    Ok(Arc::new(use_case))
}

/// Build the interface selector from config
pub fn build_selector(config: &AppConfig) -> PlatformSelector {
    let advertise = config
        .advertise_ip()
        .or_else(|| specific_ipv4(config.bind_or_default()));

    InterfaceSelector::new(
        create_enumerator(Duration::default_enumeration_timeout()),
        LocalIpProbe::new(),
        config.interface_keywords(),
    )
    .with_override(advertise)
}

/// A bind address naming one IPv4 interface is also the one to advertise
fn specific_ipv4(bind: IpAddr) -> Option<Ipv4Addr> {
    match bind {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file {}: {}", store.path().display(), e);
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config(|key| env::var(key).ok()))
        .merge(cli_config)
}

/// Config layer from environment variables; unparsable values are skipped
fn env_config(lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    let port = lookup(ENV_PORT).and_then(|raw| match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Some(port),
        _ => {
            log::warn!("Ignoring {}={:?}: not a port number", ENV_PORT, raw);
            None
        }
    });

    let advertise_ip = lookup(ENV_ADVERTISE_IP).and_then(|raw| {
        match raw.trim().parse::<Ipv4Addr>() {
            Ok(ip) => Some(ip.to_string()),
            Err(_) => {
                log::warn!("Ignoring {}={:?}: not an IPv4 address", ENV_ADVERTISE_IP, raw);
                None
            }
        }
    });

    AppConfig {
        port,
        advertise_ip,
        ..Default::default()
    }
}
