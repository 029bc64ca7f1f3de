//! Runs both stages in order, or the one named by the first argument
//! (`generate`, `compose`, `all`, `resolve <WISE_ID>`).

use std::process::ExitCode;

use qr_labels_lib::{AppConfig, Stage};

fn main() -> anyhow::Result<ExitCode> {
    qr_labels_lib::init_tracing();

    let stage = Stage::from_args(std::env::args().skip(1))?;

    let config = AppConfig::from_env();
    tracing::debug!(?stage, ?config, "Starting");
    Ok(qr_labels_lib::run_stage(&stage, &config))
}
