//! End-to-end runs of both stages against temporary directories.

use std::path::Path;
use std::sync::{Arc, Mutex};

use image::Rgb;
use qr_labels_lib::services::logo::TEMP_LOGO_NAME;
use qr_labels_lib::services::{composer, generator};
use qr_labels_lib::{AppConfig, CaptionMode, ComposeError, ComposeReport, GenerateError};
use qrcode::{Color, EcLevel, QrCode};

const SAMPLE: &str = "WISE_ID,Shelf_QR_ID,QR Code Printed\n\
                      WISE-01,abc123,FALSE\n\
                      WISE-02,def456,FALSE\n\
                      WISE-03,ghi789,TRUE\n";

fn setup(csv: &str) -> (tempfile::TempDir, AppConfig) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::in_dir(dir.path());
    // Keep font lookup hermetic
    config.font_candidates = Vec::new();
    std::fs::write(&config.csv_path, csv).unwrap();
    (dir, config)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}

/// Log output shared between the test and a scoped subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with warnings and errors written to a buffer; returns both.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}

fn write_logo(path: &Path) {
    image::RgbImage::from_pixel(600, 300, Rgb([200, 30, 30]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

#[test]
fn generates_one_image_per_unprinted_row() {
    let (_dir, config) = setup(SAMPLE);
    let report = generator::run(&config).unwrap();

    assert_eq!(report.selected, 2);
    assert!(report.failed.is_empty());
    assert_eq!(
        file_names(&config.image_dir),
        vec!["WISE-01_abc123.png", "WISE-02_def456.png"]
    );
}

#[test]
fn blank_flag_row_does_not_stop_the_run() {
    let (_dir, config) = setup(
        "WISE_ID,Shelf_QR_ID,QR Code Printed\n\
         WISE-01,abc123,FALSE\n\
         WISE-02,def456,\n\
         WISE-03,ghi789,TRUE\n",
    );
    let (report, logs) = capture_warnings(|| generator::run(&config));
    let report = report.unwrap();

    assert_eq!(report.selected, 1);
    assert_eq!(file_names(&config.image_dir), vec!["WISE-01_abc123.png"]);
    assert!(logs.contains("Skipping row 3"), "logs: {logs}");
}

#[test]
fn underscore_id_is_flagged_before_composing() {
    let (_dir, config) = setup("WISE_ID,Shelf_QR_ID,QR Code Printed\nWISE_07,zz9,FALSE\n");
    let (report, logs) = capture_warnings(|| generator::run(&config));

    assert_eq!(report.unwrap().generated.len(), 1);
    assert!(logs.contains("caption will read 'WISE'"), "logs: {logs}");
}

#[test]
fn generated_image_encodes_lookup_url() {
    let (_dir, config) = setup(SAMPLE);
    generator::run(&config).unwrap();

    let img = image::open(config.image_dir.join("WISE-01_abc123.png"))
        .unwrap()
        .to_rgb8();
    let url = format!("{}WISE-01", qr_labels_lib::config::defaults::BASE_URL);
    let expected = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L).unwrap();
    let modules = expected.width() as u32;

    assert_eq!(img.width(), (modules + 8) * 10);
    assert_eq!(img.width(), img.height());
    for y in 0..modules {
        for x in 0..modules {
            let px = img.get_pixel((x + 4) * 10 + 5, (y + 4) * 10 + 5);
            let dark = expected[(x as usize, y as usize)] == Color::Dark;
            assert_eq!(px[0] == 0, dark, "module ({x}, {y})");
        }
    }
}

#[test]
fn rerun_overwrites_identical_images() {
    let (_dir, config) = setup(SAMPLE);
    let first = generator::run(&config).unwrap();
    let bytes: Vec<Vec<u8>> = first
        .generated
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    let second = generator::run(&config).unwrap();
    assert_eq!(first.generated, second.generated);
    for (path, before) in second.generated.iter().zip(bytes) {
        assert_eq!(std::fs::read(path).unwrap(), before);
    }
}

#[test]
fn all_printed_has_no_side_effects() {
    let (_dir, config) = setup("WISE_ID,Shelf_QR_ID,QR Code Printed\nWISE-03,ghi789,TRUE\n");
    let report = generator::run(&config).unwrap();
    assert!(report.nothing_to_do());
    assert!(!config.image_dir.exists());
}

#[test]
fn missing_table_is_reported_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::in_dir(dir.path());
    assert!(matches!(
        generator::run(&config),
        Err(GenerateError::MissingInput(_))
    ));
    assert!(!config.image_dir.exists());
}

#[test]
fn banner_mode_adds_caption_band() {
    let (_dir, mut config) = setup(SAMPLE);
    config.caption_mode = CaptionMode::Banner;
    let report = generator::run(&config).unwrap();

    let img = image::open(&report.generated[0]).unwrap();
    // Built-in font at 24px: 24px text + 20px padding
    assert_eq!(img.height(), img.width() + 44);
}

#[test]
fn end_to_end_without_logo() {
    let (_dir, config) = setup(SAMPLE);
    generator::run(&config).unwrap();

    let summary = match composer::run(&config).unwrap() {
        ComposeReport::Written(summary) => summary,
        ComposeReport::NothingToDo => panic!("expected a document"),
    };
    assert_eq!(summary.labels, 2);
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.per_page, 33);
    assert_eq!(summary.degraded, 0);
    assert!(!summary.logo_drawn);

    let pdf = std::fs::read(&config.output_pdf).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(count(&pdf, b"(WISE-01)"), 1);
    assert_eq!(count(&pdf, b"(WISE-02)"), 1);
    assert_eq!(count(&pdf, b"(WISE-03)"), 0);
    assert_eq!(count(&pdf, b"/Logo"), 0);
}

#[test]
fn end_to_end_with_logo_cleans_up_temp_file() {
    let (dir, config) = setup(SAMPLE);
    write_logo(&config.logo_path);
    generator::run(&config).unwrap();

    let ComposeReport::Written(summary) = composer::run(&config).unwrap() else {
        panic!("expected a document");
    };
    assert!(summary.logo_drawn);
    let pdf = std::fs::read(&config.output_pdf).unwrap();
    assert_eq!(count(&pdf, b"/Logo Do"), 2);
    assert!(!dir.path().join(TEMP_LOGO_NAME).exists());
}

#[test]
fn corrupt_logo_still_produces_document() {
    let (dir, config) = setup(SAMPLE);
    std::fs::write(&config.logo_path, b"\xff\xd8 truncated").unwrap();
    generator::run(&config).unwrap();

    let (report, logs) = capture_warnings(|| composer::run(&config));
    let ComposeReport::Written(summary) = report.unwrap() else {
        panic!("expected a document");
    };
    assert!(!summary.logo_drawn);
    assert!(logs.contains("Could not process logo file"), "logs: {logs}");
    assert_eq!(summary.labels, 2);
    assert!(!dir.path().join(TEMP_LOGO_NAME).exists());
}

#[test]
fn logo_at_temp_path_is_kept() {
    let (dir, mut config) = setup(SAMPLE);
    config.logo_path = dir.path().join(TEMP_LOGO_NAME);
    write_logo(&config.logo_path);
    let original = std::fs::read(&config.logo_path).unwrap();
    generator::run(&config).unwrap();

    let ComposeReport::Written(summary) = composer::run(&config).unwrap() else {
        panic!("expected a document");
    };
    assert!(summary.logo_drawn);
    assert_eq!(std::fs::read(&config.logo_path).unwrap(), original);
}

#[test]
fn missing_image_dir_leaves_existing_output_alone() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::in_dir(dir.path());
    std::fs::write(&config.output_pdf, b"previous run").unwrap();

    assert!(matches!(
        composer::run(&config),
        Err(ComposeError::MissingInput(_))
    ));
    assert_eq!(std::fs::read(&config.output_pdf).unwrap(), b"previous run");
}

#[test]
fn empty_image_dir_is_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::in_dir(dir.path());
    std::fs::create_dir_all(&config.image_dir).unwrap();

    assert_eq!(composer::run(&config).unwrap(), ComposeReport::NothingToDo);
    assert!(!config.output_pdf.exists());
}

#[test]
fn unwritable_output_is_a_failure() {
    let (dir, mut config) = setup(SAMPLE);
    generator::run(&config).unwrap();
    config.output_pdf = dir.path().join("no-such-dir").join("labels.pdf");

    assert!(matches!(
        composer::run(&config),
        Err(ComposeError::OutputWrite(_))
    ));
}

#[test]
fn labels_follow_sorted_file_order_across_pages() {
    let mut csv = String::from("WISE_ID,Shelf_QR_ID,QR Code Printed\n");
    for i in (1..=40).rev() {
        csv.push_str(&format!("WISE-{i:02},s{i},FALSE\n"));
    }
    let (_dir, config) = setup(&csv);
    generator::run(&config).unwrap();

    let ComposeReport::Written(summary) = composer::run(&config).unwrap() else {
        panic!("expected a document");
    };
    assert_eq!(summary.labels, 40);
    assert_eq!(summary.pages, 2);

    let pdf = std::fs::read(&config.output_pdf).unwrap();
    let pos = |id: &str| {
        let needle = format!("({id})");
        pdf.windows(needle.len())
            .position(|w| w == needle.as_bytes())
            .unwrap()
    };
    assert!(pos("WISE-01") < pos("WISE-02"));
    assert!(pos("WISE-33") < pos("WISE-34"));
}
