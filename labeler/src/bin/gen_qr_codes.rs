//! Generate QR code images for every unprinted asset.

use std::process::ExitCode;

use qr_labels_lib::{AppConfig, Stage};

fn main() -> ExitCode {
    qr_labels_lib::init_tracing();
    let config = AppConfig::from_env();
    qr_labels_lib::run_stage(&Stage::Generate, &config)
}
