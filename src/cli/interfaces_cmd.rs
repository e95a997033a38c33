//! Interfaces command handler

use crate::application::InterfaceReport;
use crate::domain::config::AppConfig;

use super::app::build_selector;
use super::presenter::Presenter;

/// Enumerate interfaces and show which address would be advertised
pub async fn handle_interfaces_command(
    config: &AppConfig,
    json: bool,
    presenter: &Presenter,
) -> Result<InterfaceReport, serde_json::Error> {
    let report = build_selector(config).list_interfaces().await;

    if json {
        presenter.output(&serde_json::to_string_pretty(&report)?);
    } else {
        presenter.interface_table(&report);
    }

    Ok(report)
}
