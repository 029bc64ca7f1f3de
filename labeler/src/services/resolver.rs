//! Shelf URL resolver: the lookup a scanned label lands on.

use std::path::PathBuf;

use asset_registry::RegistryError;
use tracing::{error, info, warn};

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{0} not found")]
    MissingInput(PathBuf),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no asset id in '{0}'")]
    NoAssetId(String),

    #[error("no row with WISE_ID '{0}'")]
    UnknownAsset(String),

    #[error("asset '{0}' has no shelf code")]
    NoShelfCode(String),
}

/// Resolve `query` (a bare asset id or a scanned lookup URL) to the shelf
/// URL of its row in the configured asset table.
pub fn run(config: &AppConfig, query: &str) -> Result<String, ResolveError> {
    let Some(asset_id) = asset_registry::asset_id_from_query(query) else {
        error!("No asset id in '{query}'.");
        return Err(ResolveError::NoAssetId(query.to_string()));
    };

    let records = match asset_registry::load_records(&config.csv_path) {
        Ok(records) => records,
        Err(RegistryError::NotFound(path)) => {
            error!("{} not found.", path.display());
            return Err(ResolveError::MissingInput(path));
        }
        Err(e) => {
            error!("could not read {}: {e}", config.csv_path.display());
            return Err(e.into());
        }
    };

    info!("Searching for WISE_ID = {asset_id}");
    let Some(record) = asset_registry::find_by_asset_id(&records, asset_id) else {
        warn!("No row with WISE_ID = {asset_id}");
        return Err(ResolveError::UnknownAsset(asset_id.to_string()));
    };
    info!("Found Shelf_QR_ID: {}", record.shelf_code);

    let Some(url) = asset_registry::target_url(&config.shelf_url_prefix, record) else {
        warn!("{asset_id} has no Shelf_QR_ID");
        return Err(ResolveError::NoShelfCode(record.asset_id.clone()));
    };
    info!("Final URL: {url}");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(csv: &str) -> (tempfile::TempDir, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path());
        std::fs::write(&config.csv_path, csv).unwrap();
        (dir, config)
    }

    const TABLE: &str = "WISE_ID,Shelf_QR_ID,QR Code Printed\n\
                         WISE-01,abc123,TRUE\n\
                         WISE-02,,FALSE\n";

    #[test]
    fn scanned_url_resolves_to_shelf() {
        let (_dir, config) = config_with(TABLE);
        let scanned = format!("{}WISE-01", config.base_url);
        assert_eq!(run(&config, &scanned).unwrap(), "https://eam.sh/abc123");
        assert_eq!(run(&config, "WISE-01").unwrap(), "https://eam.sh/abc123");
    }

    #[test]
    fn unknown_asset_is_an_error() {
        let (_dir, config) = config_with(TABLE);
        assert!(matches!(
            run(&config, "WISE-99"),
            Err(ResolveError::UnknownAsset(id)) if id == "WISE-99"
        ));
    }

    #[test]
    fn blank_shelf_code_is_an_error() {
        let (_dir, config) = config_with(TABLE);
        assert!(matches!(run(&config, "WISE-02"), Err(ResolveError::NoShelfCode(_))));
    }

    #[test]
    fn missing_table_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path());
        assert!(matches!(run(&config, "WISE-01"), Err(ResolveError::MissingInput(_))));
    }
}
