//! Shelf URL resolution.
//!
//! A printed QR code points at a lookup page with the asset id in a query
//! parameter. The page finds that asset's row and forwards to the shelf
//! system's own URL for its shelf code.

use crate::AssetRecord;

/// Query parameter that carries the asset id in a lookup URL.
pub const LOOKUP_PARAM: &str = "wise_id";

/// First record whose asset id equals `asset_id` (surrounding whitespace
/// in the query is ignored).
pub fn find_by_asset_id<'a>(
    records: &'a [AssetRecord],
    asset_id: &str,
) -> Option<&'a AssetRecord> {
    let wanted = asset_id.trim();
    records.iter().find(|r| r.asset_id == wanted)
}

/// `<prefix><shelf_code>`, or `None` when the record has no shelf code.
pub fn target_url(prefix: &str, record: &AssetRecord) -> Option<String> {
    if record.shelf_code.is_empty() {
        return None;
    }
    Some(format!("{prefix}{}", record.shelf_code))
}

/// Asset id named by `query`.
///
/// Accepts either a bare id or a full lookup URL, in which case the value of
/// [`LOOKUP_PARAM`] is taken from its query string.
pub fn asset_id_from_query(query: &str) -> Option<&str> {
    let query = query.trim();
    let Some((_, params)) = query.split_once('?') else {
        return (!query.is_empty()).then_some(query);
    };
    params
        .split(['&', '#'])
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == LOOKUP_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
