//! Sheet and label geometry.
//!
//! Sheet dimensions are in millimetres; per-label layout is in PDF points
//! with the origin at the label's bottom-left corner.

use tracing::debug;

use crate::SheetError;

/// Points per millimetre.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Distance of the caption baseline above the bottom padding, in points.
pub const CAPTION_OFFSET_PT: f64 = 2.0;

/// Tolerance for the floor division so exact multiples count as a full cell.
const GRID_EPSILON: f64 = 1e-9;

/// Physical description of a label sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSpec {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub label_width_mm: f64,
    pub label_height_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    /// Radius of the rounded cell border.
    pub corner_radius_mm: f64,
}

impl Default for SheetSpec {
    /// US Letter with 2-5/8" x 1" address labels.
    fn default() -> Self {
        Self {
            page_width_mm: 215.9,
            page_height_mm: 279.4,
            label_width_mm: 66.675,
            label_height_mm: 25.4,
            margin_left_mm: 5.0,
            margin_right_mm: 5.0,
            margin_top_mm: 5.0,
            margin_bottom_mm: 5.0,
            corner_radius_mm: 1.0,
        }
    }
}

/// Number of label cells on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    pub fn per_page(&self) -> u32 {
        self.columns * self.rows
    }

    /// Pages needed for `labels` cells.
    pub fn page_count(&self, labels: usize) -> usize {
        let per_page = self.per_page() as usize;
        if per_page == 0 {
            return 0;
        }
        labels.div_ceil(per_page)
    }
}

impl SheetSpec {
    /// Columns and rows that fit on the page: `floor(page / label)` per axis.
    pub fn grid(&self) -> Grid {
        let fit = |page: f64, label: f64| -> u32 {
            if label <= 0.0 || page <= 0.0 {
                return 0;
            }
            (page / label + GRID_EPSILON).floor() as u32
        };
        Grid {
            columns: fit(self.page_width_mm, self.label_width_mm),
            rows: fit(self.page_height_mm, self.label_height_mm),
        }
    }

    /// Check the sheet holds at least one label per page.
    pub fn validate(&self) -> Result<Grid, SheetError> {
        let sizes = [
            ("page width", self.page_width_mm),
            ("page height", self.page_height_mm),
            ("label width", self.label_width_mm),
            ("label height", self.label_height_mm),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(SheetError::InvalidSpec(format!("{name} must be positive, got {value}")));
            }
        }
        let margins = [
            self.margin_left_mm,
            self.margin_right_mm,
            self.margin_top_mm,
            self.margin_bottom_mm,
            self.corner_radius_mm,
        ];
        if margins.iter().any(|m| !(m.is_finite() && *m >= 0.0)) {
            return Err(SheetError::InvalidSpec(
                "margins and corner radius must be non-negative".into(),
            ));
        }

        let grid = self.grid();
        if grid.per_page() == 0 {
            return Err(SheetError::InvalidSpec(format!(
                "label {}x{}mm does not fit on page {}x{}mm",
                self.label_width_mm, self.label_height_mm, self.page_width_mm, self.page_height_mm
            )));
        }
        Ok(grid)
    }

    pub fn page_size_pt(&self) -> (f64, f64) {
        (self.page_width_mm * MM_TO_PT, self.page_height_mm * MM_TO_PT)
    }

    pub fn label_size_pt(&self) -> (f64, f64) {
        (self.label_width_mm * MM_TO_PT, self.label_height_mm * MM_TO_PT)
    }

    /// Bottom-left corner (points, page coordinates) of the cell at
    /// `index` on a page. Cells fill row by row starting at the top left.
    pub fn cell_origin(&self, grid: &Grid, index: u32) -> (f64, f64) {
        let column = index % grid.columns.max(1);
        let row = index / grid.columns.max(1);

        let (left, column_gap) = axis_layout(
            self.page_width_mm,
            self.label_width_mm,
            grid.columns,
            self.margin_left_mm,
            self.margin_right_mm,
        );
        let (top, row_gap) = axis_layout(
            self.page_height_mm,
            self.label_height_mm,
            grid.rows,
            self.margin_top_mm,
            self.margin_bottom_mm,
        );

        let x_mm = left + f64::from(column) * (self.label_width_mm + column_gap);
        let top_mm = top + f64::from(row) * (self.label_height_mm + row_gap);
        let y_mm = self.page_height_mm - top_mm - self.label_height_mm;
        (x_mm * MM_TO_PT, y_mm * MM_TO_PT)
    }
}

/// Leading offset and inter-cell gap along one axis.
///
/// Configured margins are honoured when they fit, with the rest of the
/// space spread as equal gaps. Otherwise the cells are centered with no gap.
fn axis_layout(page: f64, label: f64, count: u32, start: f64, end: f64) -> (f64, f64) {
    let leftover = (page - f64::from(count) * label).max(0.0);
    if start + end > leftover {
        debug!(page, label, count, leftover, "Margins do not fit, centering grid");
        return (leftover / 2.0, 0.0);
    }
    if count <= 1 {
        return (start, 0.0);
    }
    (start, (leftover - start - end) / f64::from(count - 1))
}

/// Fractions controlling the inner layout of one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFractions {
    /// Inner padding as a fraction of the shorter label side.
    pub padding: f64,
    /// Maximum QR width as a fraction of the usable width.
    pub qr_width: f64,
    /// Maximum logo size as a fraction of the usable height.
    pub logo_height: f64,
}

impl Default for LayoutFractions {
    fn default() -> Self {
        Self {
            padding: 0.10,
            qr_width: 0.70,
            logo_height: 0.80,
        }
    }
}

/// Axis-aligned square placement in label coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Computed placement of everything drawn inside one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub padding: f64,
    pub usable_width: f64,
    pub usable_height: f64,
    pub qr: Square,
    /// `None` when no logo is requested or there is no room left for it.
    pub logo: Option<Square>,
    /// Caption anchor: horizontal center and baseline.
    pub caption: (f64, f64),
}

impl LabelLayout {
    /// Lay out a `width` x `height` label.
    pub fn compute(width: f64, height: f64, fractions: &LayoutFractions, with_logo: bool) -> Self {
        let padding = width.min(height) * fractions.padding;
        let usable_width = (width - 2.0 * padding).max(0.0);
        let usable_height = (height - 2.0 * padding).max(0.0);

        let qr_size = usable_height.min(usable_width * fractions.qr_width);
        let qr = Square {
            x: padding,
            y: padding + (usable_height - qr_size) / 2.0,
            size: qr_size,
        };

        let logo = with_logo
            .then(|| {
                let gap = padding * 0.5;
                let remaining_width = usable_width - qr_size - gap;
                let size = remaining_width.min(usable_height * fractions.logo_height);
                (size > 0.0).then_some(Square {
                    x: padding + qr_size + gap,
                    y: padding + (usable_height - size) / 2.0,
                    size,
                })
            })
            .flatten();

        Self {
            padding,
            usable_width,
            usable_height,
            qr,
            logo,
            caption: (qr.x + qr.size / 2.0, padding + CAPTION_OFFSET_PT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_sheet_grid_is_three_by_eleven() {
        let grid = SheetSpec::default().grid();
        assert_eq!(grid, Grid { columns: 3, rows: 11 });
        assert_eq!(grid.per_page(), 33);
    }

    #[test]
    fn validate_rejects_label_larger_than_page() {
        let spec = SheetSpec {
            label_width_mm: 300.0,
            ..SheetSpec::default()
        };
        assert!(matches!(spec.validate(), Err(SheetError::InvalidSpec(_))));
    }

    #[test]
    fn validate_rejects_non_positive_sizes() {
        let spec = SheetSpec {
            label_height_mm: 0.0,
            ..SheetSpec::default()
        };
        assert!(spec.validate().is_err());
        let spec = SheetSpec {
            margin_top_mm: -1.0,
            ..SheetSpec::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn page_count_rounds_up() {
        let grid = Grid { columns: 3, rows: 11 };
        assert_eq!(grid.page_count(0), 0);
        assert_eq!(grid.page_count(2), 1);
        assert_eq!(grid.page_count(33), 1);
        assert_eq!(grid.page_count(34), 2);
    }

    #[test]
    fn cells_fill_rows_from_top_left() {
        let spec = SheetSpec::default();
        let grid = spec.grid();
        let (x0, y0) = spec.cell_origin(&grid, 0);
        let (x1, y1) = spec.cell_origin(&grid, 1);
        let (x3, y3) = spec.cell_origin(&grid, 3);
        let (lw, lh) = spec.label_size_pt();
        assert!((y0 - y1).abs() < EPS);
        assert!(x1 > x0);
        assert!((x3 - x0).abs() < EPS);
        assert!((y0 - y3 - lh).abs() < 1e-6);
        let (page_w, page_h) = spec.page_size_pt();
        assert!(y0 + lh <= page_h + 1e-6);
        let (x2, _) = spec.cell_origin(&grid, 2);
        assert!(x2 + lw <= page_w + 1e-6);
    }

    #[test]
    fn last_cell_stays_on_page() {
        let spec = SheetSpec::default();
        let grid = spec.grid();
        let (x, y) = spec.cell_origin(&grid, grid.per_page() - 1);
        let (lw, _) = spec.label_size_pt();
        let (page_w, _) = spec.page_size_pt();
        assert!(y >= -1e-6);
        assert!(x + lw <= page_w + 1e-6);
    }

    #[test]
    fn fitting_margins_produce_gaps() {
        let spec = SheetSpec {
            page_width_mm: 100.0,
            page_height_mm: 50.0,
            label_width_mm: 40.0,
            label_height_mm: 50.0,
            margin_left_mm: 5.0,
            margin_right_mm: 5.0,
            margin_top_mm: 0.0,
            margin_bottom_mm: 0.0,
            corner_radius_mm: 0.0,
        };
        let grid = spec.grid();
        assert_eq!(grid, Grid { columns: 2, rows: 1 });
        let (x0, _) = spec.cell_origin(&grid, 0);
        let (x1, _) = spec.cell_origin(&grid, 1);
        assert!((x0 - 5.0 * MM_TO_PT).abs() < 1e-6);
        // 100 - 80 - 10 = 10mm gap
        assert!((x1 - 55.0 * MM_TO_PT).abs() < 1e-6);
    }

    #[test]
    fn default_label_layout() {
        let (w, h) = SheetSpec::default().label_size_pt();
        let layout = LabelLayout::compute(w, h, &LayoutFractions::default(), true);
        assert!((layout.padding - h * 0.1).abs() < EPS);
        // Height-bound: QR fills the usable height
        assert!((layout.qr.size - layout.usable_height).abs() < EPS);
        assert!((layout.qr.x - layout.padding).abs() < EPS);
        let logo = layout.logo.expect("logo fits a 2-5/8in label");
        assert!((logo.size - layout.usable_height * 0.8).abs() < EPS);
        assert!(logo.x >= layout.qr.x + layout.qr.size);
    }

    #[test]
    fn layout_never_overflows_cell() {
        let fractions = LayoutFractions::default();
        for &(w, h) in &[
            (189.0, 72.0),
            (72.0, 189.0),
            (10.0, 10.0),
            (1.0, 500.0),
            (500.0, 1.0),
            (0.5, 0.25),
        ] {
            let layout = LabelLayout::compute(w, h, &fractions, true);
            let qr = layout.qr;
            assert!(qr.size <= layout.usable_height.min(layout.usable_width * 0.7) + EPS);
            assert!(qr.x + qr.size <= w + EPS, "qr overflows {w}x{h}");
            assert!(qr.y + qr.size <= h + EPS);
            if let Some(logo) = layout.logo {
                assert!(logo.size > 0.0);
                assert!(logo.size <= layout.usable_height * 0.8 + EPS);
                assert!(logo.x + logo.size <= w + EPS, "logo overflows {w}x{h}");
                assert!(logo.x >= qr.x + qr.size);
            }
        }
    }

    #[test]
    fn no_room_suppresses_logo() {
        // Width-bound QR at 100% of usable width leaves nothing for a logo
        let fractions = LayoutFractions {
            qr_width: 1.0,
            ..LayoutFractions::default()
        };
        let layout = LabelLayout::compute(50.0, 200.0, &fractions, true);
        assert!(layout.logo.is_none());
    }

    #[test]
    fn logo_absent_when_not_requested() {
        let layout = LabelLayout::compute(189.0, 72.0, &LayoutFractions::default(), false);
        assert!(layout.logo.is_none());
    }

    #[test]
    fn caption_sits_under_qr_center() {
        let layout = LabelLayout::compute(189.0, 72.0, &LayoutFractions::default(), false);
        let (cx, cy) = layout.caption;
        assert!((cx - (layout.qr.x + layout.qr.size / 2.0)).abs() < EPS);
        assert!((cy - (layout.padding + CAPTION_OFFSET_PT)).abs() < EPS);
    }
}
