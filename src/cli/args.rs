//! CLI argument definitions using Clap

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// SnapPaste - phone photos straight into the desktop clipboard
#[derive(Parser, Debug)]
#[command(name = "snappaste")]
#[command(version)]
#[command(about = "Receive photos from a phone on the LAN and put them on the clipboard")]
#[command(long_about = None)]
pub struct Cli {
    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind the server to
    #[arg(short = 'b', long, value_name = "ADDR")]
    pub bind: Option<IpAddr>,

    /// Address to show in the URL and QR code instead of auto-detecting one
    #[arg(long, value_name = "IP")]
    pub advertise_ip: Option<Ipv4Addr>,

    /// Do not print a QR code
    #[arg(long)]
    pub no_qr: bool,

    /// Show a desktop notification after each paste
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Config layer holding only what was given on the command line
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            port: self.port,
            bind: self.bind.map(|ip| ip.to_string()),
            advertise_ip: self.advertise_ip.map(|ip| ip.to_string()),
            notify: self.notify.then_some(true),
            qr: self.no_qr.then_some(false),
            ..Default::default()
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List network interfaces and the address that would be advertised
    Interfaces {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put an image file on the clipboard through the same pipeline as uploads
    Paste {
        /// Image file to paste
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "port",
    "bind",
    "advertise_ip",
    "helper_timeout",
    "max_upload_mb",
    "notify",
    "qr",
    "network.wireless_keywords",
    "network.virtual_keywords",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["snappaste"]);
        assert!(cli.port.is_none());
        assert!(cli.bind.is_none());
        assert!(cli.advertise_ip.is_none());
        assert!(!cli.no_qr);
        assert!(!cli.notify);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_server_options() {
        let cli = Cli::parse_from([
            "snappaste",
            "-p",
            "9000",
            "--bind",
            "127.0.0.1",
            "--advertise-ip",
            "192.168.1.50",
            "--no-qr",
            "-n",
        ]);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.bind, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(cli.advertise_ip, Some(Ipv4Addr::new(192, 168, 1, 50)));
        assert!(cli.no_qr);
        assert!(cli.notify);
    }

    #[test]
    fn unset_flags_leave_config_empty() {
        let cli = Cli::parse_from(["snappaste"]);
        assert_eq!(cli.to_config(), AppConfig::empty());
    }

    #[test]
    fn flags_become_config_layer() {
        let cli = Cli::parse_from(["snappaste", "--no-qr", "--port", "8081"]);
        let config = cli.to_config();
        assert_eq!(config.port, Some(8081));
        assert_eq!(config.qr, Some(false));
        assert!(config.notify.is_none());
    }

    #[test]
    fn rejects_bad_advertise_ip() {
        assert!(Cli::try_parse_from(["snappaste", "--advertise-ip", "not-an-ip"]).is_err());
    }

    #[test]
    fn cli_parses_interfaces() {
        let cli = Cli::parse_from(["snappaste", "interfaces", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Interfaces { json: true })));
    }

    #[test]
    fn cli_parses_paste() {
        let cli = Cli::parse_from(["snappaste", "paste", "photo.jpg"]);
        match cli.command {
            Some(Commands::Paste { file }) => assert_eq!(file, PathBuf::from("photo.jpg")),
            other => panic!("Expected paste command, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["snappaste", "config", "set", "port", "9000"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "port");
            assert_eq!(value, "9000");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("port"));
        assert!(is_valid_config_key("helper_timeout"));
        assert!(is_valid_config_key("network.virtual_keywords"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
