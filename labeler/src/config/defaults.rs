//! Default values and environment variable names for every setting.

/// Asset table exported from the inventory spreadsheet.
pub const CSV_FILE: &str = "WISE Asset Matrix - Sheet1.csv";
/// Directory the generated QR images are written to and read from.
pub const IMAGE_DIR: &str = "qr_codes";
pub const OUTPUT_PDF: &str = "qr_codes.pdf";
pub const LOGO_FILE: &str = "logo.JPG";
/// Lookup URL prefix; the asset id is appended verbatim.
pub const BASE_URL: &str = "https://wisecircuitslab.github.io/shelf_url_translator?wise_id=";
/// Shelf system URL prefix; a resolved shelf code is appended verbatim.
pub const SHELF_URL_PREFIX: &str = "https://eam.sh/";

// 2-5/8" x 1" labels on an 8.5" x 11" sheet
pub const PAGE_WIDTH_MM: f64 = 215.9;
pub const PAGE_HEIGHT_MM: f64 = 279.4;
pub const LABEL_WIDTH_MM: f64 = 66.675;
pub const LABEL_HEIGHT_MM: f64 = 25.4;
pub const PAGE_MARGIN_MM: f64 = 5.0;
pub const CORNER_RADIUS_MM: f64 = 1.0;

pub const LABEL_PADDING: f64 = 0.10;
pub const QR_WIDTH: f64 = 0.70;
pub const LOGO_HEIGHT: f64 = 0.80;

/// Logo thumbnail bound in pixels (both axes).
pub const LOGO_MAX_PX: u32 = 200;

pub const CAPTION_FONT_PX: f32 = 24.0;
pub const CAPTION_PADDING_PX: u32 = 20;

/// Environment variable names (all optional).
pub mod env {
    pub const WORK_DIR: &str = "QR_LABELS_WORK_DIR";
    pub const CSV_FILE: &str = "QR_LABELS_CSV";
    pub const IMAGE_DIR: &str = "QR_LABELS_IMAGE_DIR";
    pub const OUTPUT_PDF: &str = "QR_LABELS_OUTPUT_PDF";
    pub const LOGO_FILE: &str = "QR_LABELS_LOGO";
    pub const BASE_URL: &str = "QR_LABELS_BASE_URL";
    pub const SHELF_URL_PREFIX: &str = "QR_LABELS_SHELF_URL_PREFIX";
    pub const CAPTION_MODE: &str = "QR_LABELS_CAPTION_MODE";
    pub const PAGE_WIDTH_MM: &str = "QR_LABELS_PAGE_WIDTH_MM";
    pub const PAGE_HEIGHT_MM: &str = "QR_LABELS_PAGE_HEIGHT_MM";
    pub const LABEL_WIDTH_MM: &str = "QR_LABELS_LABEL_WIDTH_MM";
    pub const LABEL_HEIGHT_MM: &str = "QR_LABELS_LABEL_HEIGHT_MM";
    pub const PAGE_MARGIN_MM: &str = "QR_LABELS_PAGE_MARGIN_MM";
    pub const CORNER_RADIUS_MM: &str = "QR_LABELS_CORNER_RADIUS_MM";
    pub const LABEL_PADDING: &str = "QR_LABELS_PADDING";
    pub const QR_WIDTH: &str = "QR_LABELS_QR_WIDTH";
    pub const LOGO_HEIGHT: &str = "QR_LABELS_LOGO_HEIGHT";
    pub const BORDERS: &str = "QR_LABELS_BORDERS";
}
