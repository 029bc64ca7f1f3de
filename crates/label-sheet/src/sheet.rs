//! Label collection, pagination and rendering.

use std::path::{Path, PathBuf};

use pdf_writer::{Content, Name, Str};
use tracing::{debug, info, warn};

use crate::SheetError;
use crate::document::{DocumentWriter, ImageData, font_resource};
use crate::geometry::{Grid, LabelLayout, LayoutFractions, MM_TO_PT, SheetSpec, Square};
use crate::metrics::{StandardFont, encode_win_ansi, encodes_exactly};

/// Caption font and size under the QR code.
const CAPTION_FONT: StandardFont = StandardFont::HelveticaBold;
const CAPTION_SIZE: f64 = 8.0;

/// Font and size used when only the caption can be drawn.
const FALLBACK_FONT: StandardFont = StandardFont::Helvetica;
const FALLBACK_SIZE: f64 = 12.0;

const BORDER_WIDTH: f32 = 0.5;

/// Page resource name of the shared logo image.
const LOGO_RESOURCE: &str = "Logo";

/// Bezier control offset for approximating a quarter circle.
const KAPPA: f64 = 0.552_284_75;

/// Recover the asset id from a `<asset_id>_<shelf_code>.png` file name.
///
/// The id is everything before the first `_`; a name without `_` yields
/// its whole stem.
pub fn asset_id_from_file_name(file_name: &str) -> &str {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.split_once('_').map_or(stem, |(id, _)| id)
}

/// One label to place on the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelContent {
    pub asset_id: String,
    pub image_path: PathBuf,
}

impl LabelContent {
    pub fn new(asset_id: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            asset_id: asset_id.into(),
            image_path: image_path.into(),
        }
    }

    /// Build a label from a generated QR image, reading the id from its name.
    pub fn from_image_path(image_path: impl Into<PathBuf>) -> Self {
        let image_path = image_path.into();
        let asset_id = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(asset_id_from_file_name)
            .unwrap_or_default()
            .to_string();
        Self {
            asset_id,
            image_path,
        }
    }
}

/// Rendering options for a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOptions {
    pub spec: SheetSpec,
    pub fractions: LayoutFractions,
    /// Draw a rounded border around every cell.
    pub borders: bool,
    /// Document title stored in the PDF metadata.
    pub title: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            spec: SheetSpec::default(),
            fractions: LayoutFractions::default(),
            borders: true,
            title: "QR code labels".into(),
        }
    }
}

/// A rendered document held in memory.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub data: Vec<u8>,
    pub labels: usize,
    pub pages: usize,
    /// Labels drawn as caption-only because their image could not be used.
    pub degraded: usize,
    /// Labels whose caption had characters printed as `?`.
    pub substituted: usize,
    pub logo_drawn: bool,
}

/// Outcome of a successful [`LabelSheet::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub path: PathBuf,
    pub labels: usize,
    pub pages: usize,
    pub per_page: u32,
    pub degraded: usize,
    pub logo_drawn: bool,
    pub bytes: u64,
}

/// A set of labels laid out on a fixed grid.
#[derive(Debug, Clone)]
pub struct LabelSheet {
    options: SheetOptions,
    grid: Grid,
    labels: Vec<LabelContent>,
    logo: Option<PathBuf>,
}

impl LabelSheet {
    /// Create an empty sheet; fails when the page holds no label cells.
    pub fn new(options: SheetOptions) -> Result<Self, SheetError> {
        let grid = options.spec.validate()?;
        debug!(
            columns = grid.columns,
            rows = grid.rows,
            "Computed label grid"
        );
        Ok(Self {
            options,
            grid,
            labels: Vec::new(),
            logo: None,
        })
    }

    /// Draw the image at `path` beside every QR code, space permitting.
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo = Some(path.into());
        self
    }

    pub fn add_label(&mut self, label: LabelContent) {
        self.labels.push(label);
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn page_count(&self) -> usize {
        self.grid.page_count(self.labels.len())
    }

    /// Render every label into a PDF document in memory.
    ///
    /// Per-label problems never abort rendering: an unusable QR image is
    /// replaced by a caption-only label and an unusable logo is left out.
    pub fn render(&self) -> RenderedSheet {
        let spec = &self.options.spec;
        let (page_w, page_h) = spec.page_size_pt();
        let (label_w, label_h) = spec.label_size_pt();
        let radius = spec.corner_radius_mm * MM_TO_PT;

        let mut doc = DocumentWriter::new(&self.options.title);

        let logo_ref = self.logo.as_deref().and_then(|path| match ImageData::load(path) {
            Ok(data) => Some(doc.add_image(&data)),
            Err(e) => {
                warn!("Could not add logo - {e}");
                None
            }
        });

        let layout = LabelLayout::compute(label_w, label_h, &self.options.fractions, logo_ref.is_some());
        if logo_ref.is_some() && layout.logo.is_none() {
            warn!("No room for a logo beside the QR code, leaving it out");
        }
        let logo = logo_ref.zip(layout.logo);

        let per_page = self.grid.per_page() as usize;
        let mut degraded = 0usize;
        let mut substituted = 0usize;

        for chunk in self.labels.chunks(per_page.max(1)) {
            let mut content = Content::new();
            let mut images = Vec::with_capacity(chunk.len() + 1);
            if let Some((id, _)) = logo {
                images.push((LOGO_RESOURCE.to_string(), id));
            }

            for (slot, label) in chunk.iter().enumerate() {
                if !encodes_exactly(&label.asset_id) {
                    warn!(
                        "Caption '{}' has characters the label font cannot show; they print as '?'",
                        label.asset_id
                    );
                    substituted += 1;
                }
                let (x, y) = spec.cell_origin(&self.grid, slot as u32);
                content.save_state();
                content.transform([1.0, 0.0, 0.0, 1.0, x as f32, y as f32]);

                if self.options.borders {
                    draw_rounded_rect(&mut content, label_w, label_h, radius);
                }

                match ImageData::load(&label.image_path) {
                    Ok(qr) => {
                        let name = format!("Qr{slot}");
                        images.push((name.clone(), doc.add_image(&qr)));
                        draw_image(&mut content, &name, &layout.qr);
                        if let Some((_, square)) = &logo {
                            draw_image(&mut content, LOGO_RESOURCE, square);
                        }
                        let (cx, baseline) = layout.caption;
                        draw_centered_text(
                            &mut content,
                            CAPTION_FONT,
                            CAPTION_SIZE,
                            cx,
                            baseline,
                            &label.asset_id,
                        );
                    }
                    Err(e) => {
                        warn!("Error processing {}: {e}", label.image_path.display());
                        degraded += 1;
                        draw_centered_text(
                            &mut content,
                            FALLBACK_FONT,
                            FALLBACK_SIZE,
                            label_w / 2.0,
                            label_h / 2.0,
                            &label.asset_id,
                        );
                    }
                }

                content.restore_state();
            }

            doc.add_page(page_w as f32, page_h as f32, &content.finish(), &images);
        }

        let pages = doc.page_count();
        RenderedSheet {
            data: doc.finish(),
            labels: self.labels.len(),
            pages,
            degraded,
            substituted,
            logo_drawn: logo.is_some() && !self.labels.is_empty(),
        }
    }

    /// Render and write the document to `path`, replacing any existing file.
    ///
    /// The write only counts as successful when the file exists afterwards
    /// with a non-zero size.
    pub fn save(&self, path: &Path) -> Result<SheetSummary, SheetError> {
        let rendered = self.render();

        std::fs::write(path, &rendered.data).map_err(|source| SheetError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| SheetError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes == 0 {
            return Err(SheetError::EmptyOutput(path.to_path_buf()));
        }

        info!(path = %path.display(), bytes, "PDF saved successfully");
        Ok(SheetSummary {
            path: path.to_path_buf(),
            labels: rendered.labels,
            pages: rendered.pages,
            per_page: self.grid.per_page(),
            degraded: rendered.degraded,
            logo_drawn: rendered.logo_drawn,
            bytes,
        })
    }
}

fn draw_image(content: &mut Content, name: &str, square: &Square) {
    let size = square.size as f32;
    content.save_state();
    content.transform([size, 0.0, 0.0, size, square.x as f32, square.y as f32]);
    content.x_object(Name(name.as_bytes()));
    content.restore_state();
}

fn draw_centered_text(
    content: &mut Content,
    font: StandardFont,
    size: f64,
    center_x: f64,
    baseline: f64,
    text: &str,
) {
    let width = font.text_width(text, size);
    let encoded = encode_win_ansi(text);
    content.begin_text();
    content.set_font(font_resource(font), size as f32);
    content.next_line((center_x - width / 2.0) as f32, baseline as f32);
    content.show(Str(&encoded));
    content.end_text();
}

/// Stroke a rectangle from the origin with rounded corners of `radius`.
fn draw_rounded_rect(content: &mut Content, width: f64, height: f64, radius: f64) {
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    content.set_line_width(BORDER_WIDTH);
    content.set_stroke_gray(0.0);
    if r <= 0.0 {
        content.rect(0.0, 0.0, width as f32, height as f32);
        content.stroke();
        return;
    }

    let k = r * KAPPA;
    let (w, h) = (width, height);
    let f = |v: f64| v as f32;
    content.move_to(f(r), 0.0);
    content.line_to(f(w - r), 0.0);
    content.cubic_to(f(w - r + k), 0.0, f(w), f(r - k), f(w), f(r));
    content.line_to(f(w), f(h - r));
    content.cubic_to(f(w), f(h - r + k), f(w - r + k), f(h), f(w - r), f(h));
    content.line_to(f(r), f(h));
    content.cubic_to(f(r - k), f(h), 0.0, f(h - r + k), 0.0, f(h - r));
    content.line_to(0.0, f(r));
    content.cubic_to(0.0, f(r - k), f(r - k), 0.0, f(r), 0.0);
    content.close_path();
    content.stroke();
}
