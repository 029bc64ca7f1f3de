//! Code generator: asset table rows to QR code images.

use std::path::{Path, PathBuf};

use asset_registry::{AssetRecord, RegistryError};
use image::ImageFormat;
use qr_engine::{CaptionFont, QrError, append_caption, encode_payload, load_caption_font, render_qr};
use tracing::{error, info, warn};

use crate::config::{AppConfig, CaptionMode};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0} not found")]
    MissingInput(PathBuf),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Rows whose printed flag was false.
    pub selected: usize,
    /// Images written, in input order.
    pub generated: Vec<PathBuf>,
    /// Asset ids whose image could not be produced.
    pub failed: Vec<String>,
}

impl GenerateReport {
    pub fn nothing_to_do(&self) -> bool {
        self.selected == 0
    }
}

/// Lookup URL encoded for an asset. The id is appended without escaping.
pub fn lookup_url(base_url: &str, asset_id: &str) -> String {
    format!("{base_url}{asset_id}")
}

/// Generate one QR image per unprinted row of the configured asset table.
///
/// Existing images with the same name are overwritten.
pub fn run(config: &AppConfig) -> Result<GenerateReport, GenerateError> {
    let records = match asset_registry::load_records(&config.csv_path) {
        Ok(records) => records,
        Err(RegistryError::NotFound(path)) => {
            error!("{} not found.", path.display());
            return Err(GenerateError::MissingInput(path));
        }
        Err(e) => {
            error!("could not read {}: {e}", config.csv_path.display());
            return Err(e.into());
        }
    };

    let pending = asset_registry::unprinted(&records);
    let mut report = GenerateReport {
        selected: pending.len(),
        ..GenerateReport::default()
    };
    if pending.is_empty() {
        info!("No QR codes to generate. All items are already marked as printed.");
        return Ok(report);
    }

    std::fs::create_dir_all(&config.image_dir).map_err(|source| GenerateError::OutputDir {
        path: config.image_dir.clone(),
        source,
    })?;

    let font = match config.caption_mode {
        CaptionMode::Banner => Some(load_caption_font(&config.font_candidates)),
        CaptionMode::Plain => None,
    };

    for record in pending {
        if let Some(caption) = truncated_caption(record) {
            warn!(
                asset_id = %record.asset_id,
                "{} contains '_'; its label sheet caption will read '{caption}'",
                record.asset_id
            );
        }
        match generate_one(config, record, font.as_ref()) {
            Ok(path) => {
                info!("Generated QR code: {}", record.image_file_name());
                report.generated.push(path);
            }
            Err(e) => {
                warn!(asset_id = %record.asset_id, "Failed to generate QR code: {e}");
                report.failed.push(record.asset_id.clone());
            }
        }
    }

    info!(
        "Generated {} QR codes in the '{}' directory.",
        report.generated.len(),
        config.image_dir.display()
    );
    Ok(report)
}

fn generate_one(
    config: &AppConfig,
    record: &AssetRecord,
    font: Option<&CaptionFont>,
) -> Result<PathBuf, QrError> {
    let url = lookup_url(&config.base_url, &record.asset_id);
    let code = encode_payload(&url, &config.qr_style)?;
    let mut img = render_qr(&code, &config.qr_style);

    if let Some(font) = font {
        img = append_caption(
            &img,
            &record.asset_id,
            font,
            config.caption_font_px,
            config.caption_padding_px,
        );
    }

    let path = image_path(&config.image_dir, record);
    img.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

/// Caption the sheet composer will recover from this record's image name,
/// when it differs from the asset id.
pub fn truncated_caption(record: &AssetRecord) -> Option<String> {
    let file_name = record.image_file_name();
    let caption = label_sheet::asset_id_from_file_name(&file_name);
    (caption != record.asset_id).then(|| caption.to_string())
}

/// `<image_dir>/<asset_id>_<shelf_code>.png`
pub fn image_path(image_dir: &Path, record: &AssetRecord) -> PathBuf {
    image_dir.join(record.image_file_name())
}
