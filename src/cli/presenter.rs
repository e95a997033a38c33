//! CLI presenter for output formatting

use colored::*;
use qrcode::render::unicode::Dense1x2;
use qrcode::types::QrError;
use qrcode::QrCode;

use crate::application::InterfaceReport;
use crate::domain::network::Selection;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Startup banner: where to point the phone and what will take the image
    pub fn banner(&self, url: &str, selection: &Selection, strategies: &[&str]) {
        println!();
        println!("{}", "SnapPaste".bold().cyan());
        println!("  {} {}", "Open on your phone:".bold(), url.green().underline());
        println!(
            "  {} {}",
            "Address:".dimmed(),
            describe_selection(selection).dimmed()
        );
        println!(
            "  {} {}",
            "Clipboard:".dimmed(),
            strategies.join(" → ").dimmed()
        );
        if selection.is_fallback() {
            self.warn("No LAN address found; the phone will not be able to reach 127.0.0.1");
        }
        println!();
    }

    /// Print the URL as a terminal QR code
    pub fn qr(&self, url: &str) {
        match render_qr(url) {
            Ok(code) => println!("{}", code),
            Err(e) => self.warn(&format!("Could not render QR code: {}", e)),
        }
    }

    /// Table of interfaces with the selected one marked
    pub fn interface_table(&self, report: &InterfaceReport) {
        if let Some(error) = &report.enumeration_error {
            self.warn(&format!("Interface enumeration failed: {}", error));
        }

        if report.interfaces.is_empty() {
            self.info("No qualifying interfaces");
        } else {
            println!(
                "  {:<32} {:<16} {:<8} {:<9} {}",
                "INTERFACE".bold(),
                "ADDRESS".bold(),
                "GATEWAY".bold(),
                "WIRELESS".bold(),
                "VIRTUAL".bold()
            );
        }

        let chosen = report.selection.interface.as_ref();
        for iface in &report.interfaces {
            let marker = if Some(iface) == chosen { "*".green() } else { " ".normal() };
            println!(
                "{} {:<32} {:<16} {:<8} {:<9} {}",
                marker,
                iface.label(),
                iface.ip.to_string(),
                yes_no(iface.has_gateway),
                yes_no(iface.is_wireless),
                yes_no(iface.is_virtual)
            );
        }

        println!();
        println!(
            "{} {}",
            "Selected:".bold(),
            describe_selection(&report.selection).green()
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `data` as a compact unicode QR code, light modules on dark
pub fn render_qr(data: &str) -> Result<String, QrError> {
    let code = QrCode::new(data.as_bytes())?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// One-line summary of a selection
pub fn describe_selection(selection: &Selection) -> String {
    match &selection.interface {
        Some(iface) => format!("{} via {} ({})", selection.ip, iface.label(), selection.rule),
        None => format!("{} ({})", selection.ip, selection.rule),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
