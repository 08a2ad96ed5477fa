use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use comply_client::{ComplianceClient, EndpointConfig};
use comply_ui::{ComplianceApp, Controller};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client =
        ComplianceClient::new(EndpointConfig::default()).context("build compliance client")?;
    let app = ComplianceApp::new(Controller::new(Arc::new(client)));

    eframe::run_native(
        "Model Compliance Checker",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start UI: {err}"))?;

    Ok(())
}
