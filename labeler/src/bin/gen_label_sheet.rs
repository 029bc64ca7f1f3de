//! Compose the generated QR code images into one printable label sheet.

use std::process::ExitCode;

use qr_labels_lib::{AppConfig, Stage};

fn main() -> ExitCode {
    qr_labels_lib::init_tracing();
    let config = AppConfig::from_env();
    qr_labels_lib::run_stage(&Stage::Compose, &config)
}
