//! Runtime configuration with defaults and environment overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use label_sheet::{LayoutFractions, SheetOptions, SheetSpec};
use qr_engine::{DEFAULT_FONT_CANDIDATES, QrStyle};

use super::defaults::{self, env};

/// Which image variant the code generator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionMode {
    /// QR symbol only; the label sheet draws its own caption.
    #[default]
    Plain,
    /// QR symbol with the asset id in a band below it.
    Banner,
}

impl FromStr for CaptionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "banner" | "caption" => Ok(Self::Banner),
            other => Err(format!("must be 'plain' or 'banner', got '{other}'")),
        }
    }
}

/// Settings shared by the code generator and the sheet composer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub image_dir: PathBuf,
    pub output_pdf: PathBuf,
    pub logo_path: PathBuf,
    pub base_url: String,
    /// Prefix the resolver puts in front of a shelf code.
    pub shelf_url_prefix: String,
    pub caption_mode: CaptionMode,
    pub caption_font_px: f32,
    pub caption_padding_px: u32,
    /// TrueType fonts tried in order for banner captions.
    pub font_candidates: Vec<PathBuf>,
    pub qr_style: QrStyle,
    pub sheet: SheetSpec,
    pub fractions: LayoutFractions,
    pub borders: bool,
    pub logo_max_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: defaults::CSV_FILE.into(),
            image_dir: defaults::IMAGE_DIR.into(),
            output_pdf: defaults::OUTPUT_PDF.into(),
            logo_path: defaults::LOGO_FILE.into(),
            base_url: defaults::BASE_URL.into(),
            shelf_url_prefix: defaults::SHELF_URL_PREFIX.into(),
            caption_mode: CaptionMode::Plain,
            caption_font_px: defaults::CAPTION_FONT_PX,
            caption_padding_px: defaults::CAPTION_PADDING_PX,
            font_candidates: DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
            qr_style: QrStyle::default(),
            sheet: SheetSpec {
                page_width_mm: defaults::PAGE_WIDTH_MM,
                page_height_mm: defaults::PAGE_HEIGHT_MM,
                label_width_mm: defaults::LABEL_WIDTH_MM,
                label_height_mm: defaults::LABEL_HEIGHT_MM,
                margin_left_mm: defaults::PAGE_MARGIN_MM,
                margin_right_mm: defaults::PAGE_MARGIN_MM,
                margin_top_mm: defaults::PAGE_MARGIN_MM,
                margin_bottom_mm: defaults::PAGE_MARGIN_MM,
                corner_radius_mm: defaults::CORNER_RADIUS_MM,
            },
            fractions: LayoutFractions {
                padding: defaults::LABEL_PADDING,
                qr_width: defaults::QR_WIDTH,
                logo_height: defaults::LOGO_HEIGHT,
            },
            borders: true,
            logo_max_px: defaults::LOGO_MAX_PX,
        }
    }
}

impl AppConfig {
    /// Default configuration with every file path placed under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let mut config = Self::default();
        config.rebase(dir);
        config
    }

    /// Load `.env` and apply `QR_LABELS_*` environment overrides.
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of the defaults.
    ///
    /// Unparsable values are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut c = Self::default();

        if let Some(dir) = g(env::WORK_DIR) {
            c.rebase(Path::new(&dir));
        }
        if let Some(v) = g(env::CSV_FILE) {
            c.csv_path = v.into();
        }
        if let Some(v) = g(env::IMAGE_DIR) {
            c.image_dir = v.into();
        }
        if let Some(v) = g(env::OUTPUT_PDF) {
            c.output_pdf = v.into();
        }
        if let Some(v) = g(env::LOGO_FILE) {
            c.logo_path = v.into();
        }
        if let Some(v) = g(env::BASE_URL) {
            c.base_url = v;
        }
        if let Some(v) = g(env::SHELF_URL_PREFIX) {
            c.shelf_url_prefix = v;
        }

        override_parsed(&mut c.caption_mode, g(env::CAPTION_MODE), env::CAPTION_MODE);
        override_parsed(&mut c.sheet.page_width_mm, g(env::PAGE_WIDTH_MM), env::PAGE_WIDTH_MM);
        override_parsed(&mut c.sheet.page_height_mm, g(env::PAGE_HEIGHT_MM), env::PAGE_HEIGHT_MM);
        override_parsed(&mut c.sheet.label_width_mm, g(env::LABEL_WIDTH_MM), env::LABEL_WIDTH_MM);
        override_parsed(&mut c.sheet.label_height_mm, g(env::LABEL_HEIGHT_MM), env::LABEL_HEIGHT_MM);
        override_parsed(&mut c.sheet.corner_radius_mm, g(env::CORNER_RADIUS_MM), env::CORNER_RADIUS_MM);

        let mut margin = defaults::PAGE_MARGIN_MM;
        override_parsed(&mut margin, g(env::PAGE_MARGIN_MM), env::PAGE_MARGIN_MM);
        c.sheet.margin_left_mm = margin;
        c.sheet.margin_right_mm = margin;
        c.sheet.margin_top_mm = margin;
        c.sheet.margin_bottom_mm = margin;

        override_parsed(&mut c.fractions.padding, g(env::LABEL_PADDING), env::LABEL_PADDING);
        override_parsed(&mut c.fractions.qr_width, g(env::QR_WIDTH), env::QR_WIDTH);
        override_parsed(&mut c.fractions.logo_height, g(env::LOGO_HEIGHT), env::LOGO_HEIGHT);
        override_parsed(&mut c.borders, g(env::BORDERS), env::BORDERS);

        c
    }

    /// Options for the label sheet renderer.
    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            spec: self.sheet,
            fractions: self.fractions,
            borders: self.borders,
            title: self
                .output_pdf
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("QR code labels")
                .to_string(),
        }
    }

    /// Directory that holds the output document and its temporary files.
    pub fn work_dir(&self) -> &Path {
        self.output_pdf
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    fn rebase(&mut self, dir: &Path) {
        self.csv_path = dir.join(&self.csv_path);
        self.image_dir = dir.join(&self.image_dir);
        self.output_pdf = dir.join(&self.output_pdf);
        self.logo_path = dir.join(&self.logo_path);
    }
}

fn override_parsed<T>(target: &mut T, value: Option<String>, key: &str)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = value else { return };
    match raw.trim().parse::<T>() {
        Ok(v) => *target = v,
        Err(e) => tracing::warn!("Ignoring invalid {key}='{raw}': {e}"),
    }
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
