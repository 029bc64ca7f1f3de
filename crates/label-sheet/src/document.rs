//! Low-level PDF assembly on top of `pdf-writer`.

use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Local, Timelike};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::DynamicImage;
use pdf_writer::{Date, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::SheetError;
use crate::metrics::StandardFont;

const PRODUCER: &str = concat!("qr-labels ", env!("CARGO_PKG_VERSION"));

/// Resource name a standard font is registered under on every page.
pub(crate) fn font_resource(font: StandardFont) -> Name<'static> {
    match font {
        StandardFont::HelveticaBold => Name(b"F1"),
        StandardFont::Helvetica => Name(b"F2"),
    }
}

/// RGB pixel data ready to embed as a Flate-compressed image XObject.
pub(crate) struct ImageData {
    width: u32,
    height: u32,
    compressed: Vec<u8>,
}

impl ImageData {
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let img = image::open(path).map_err(|source| SheetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(&img)
    }

    pub fn from_image(img: &DynamicImage) -> Result<Self, SheetError> {
        let rgb = img.to_rgb8();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(rgb.as_raw())
            .map_err(SheetError::Compress)?;
        let compressed = encoder.finish().map_err(SheetError::Compress)?;
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            compressed,
        })
    }
}

/// Accumulates pages and shared objects for one document.
pub(crate) struct DocumentWriter {
    pdf: Pdf,
    next_ref: Ref,
    catalog_id: Ref,
    page_tree_id: Ref,
    page_ids: Vec<Ref>,
    fonts: Vec<(StandardFont, Ref)>,
}

impl DocumentWriter {
    pub fn new(title: &str) -> Self {
        let mut next_ref = Ref::new(1);
        let catalog_id = next_ref.bump();
        let page_tree_id = next_ref.bump();
        let info_id = next_ref.bump();
        let mut pdf = Pdf::new();

        let mut fonts = Vec::new();
        for font in [StandardFont::HelveticaBold, StandardFont::Helvetica] {
            let id = next_ref.bump();
            pdf.type1_font(id)
                .base_font(Name(font.base_name()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            fonts.push((font, id));
        }

        let now = Local::now();
        let created = Date::new(now.year() as u16)
            .month(now.month() as u8)
            .day(now.day() as u8)
            .hour(now.hour() as u8)
            .minute(now.minute() as u8)
            .second(now.second() as u8);
        pdf.document_info(info_id)
            .title(TextStr(title))
            .producer(TextStr(PRODUCER))
            .creation_date(created);

        Self {
            pdf,
            next_ref,
            catalog_id,
            page_tree_id,
            page_ids: Vec::new(),
            fonts,
        }
    }

    /// Embed an image once; the returned reference can be used on any page.
    pub fn add_image(&mut self, img: &ImageData) -> Ref {
        let id = self.next_ref.bump();
        let mut xobject = self.pdf.image_xobject(id, &img.compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(img.width as i32);
        xobject.height(img.height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.finish();
        id
    }

    /// Append a page with the given content stream and image resources.
    pub fn add_page(&mut self, width: f32, height: f32, content: &[u8], images: &[(String, Ref)]) {
        let page_id = self.next_ref.bump();
        let content_id = self.next_ref.bump();

        let mut page = self.pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, width, height));
        page.parent(self.page_tree_id);
        page.contents(content_id);

        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (font, id) in &self.fonts {
                fonts.pair(font_resource(*font), *id);
            }
        }
        {
            let mut x_objects = resources.x_objects();
            for (name, id) in images {
                x_objects.pair(Name(name.as_bytes()), *id);
            }
        }
        resources.finish();
        page.finish();

        self.pdf.stream(content_id, content);
        self.page_ids.push(page_id);
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Write the catalog and page tree and serialize the document.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.page_tree_id);
        let count = self.page_ids.len() as i32;
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.page_ids.iter().copied())
            .count(count);
        self.pdf.finish()
    }
}
