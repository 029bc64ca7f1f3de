//! Configuration validation.

use super::AppConfig;

/// Check a configuration. Returns one message per problem found.
pub fn validate(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(e) = config.sheet.validate() {
        problems.push(e.to_string());
    }

    // Padding on both sides must leave a usable area.
    if !(config.fractions.padding > 0.0 && config.fractions.padding < 0.5) {
        problems.push(format!(
            "padding fraction must be in (0, 0.5), got {}",
            config.fractions.padding
        ));
    }
    for (name, value) in [
        ("QR width", config.fractions.qr_width),
        ("logo height", config.fractions.logo_height),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            problems.push(format!("{name} fraction must be in (0, 1], got {value}"));
        }
    }

    if config.base_url.trim().is_empty() {
        problems.push("base URL must not be empty".into());
    }
    if config.shelf_url_prefix.trim().is_empty() {
        problems.push("shelf URL prefix must not be empty".into());
    }
    if config.qr_style.module_px == 0 {
        problems.push("QR module size must be at least 1px".into());
    }
    if config.logo_max_px == 0 {
        problems.push("logo size bound must be at least 1px".into());
    }
    if !(config.caption_font_px.is_finite() && config.caption_font_px > 0.0) {
        problems.push("caption font size must be positive".into());
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_empty());
    }

    #[test]
    fn oversized_label_is_reported() {
        let mut c = AppConfig::default();
        c.sheet.label_height_mm = 400.0;
        let problems = validate(&c);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("does not fit"));
    }

    #[test]
    fn out_of_range_fractions_are_reported() {
        let mut c = AppConfig::default();
        c.fractions.padding = 0.5;
        c.fractions.qr_width = 0.0;
        c.fractions.logo_height = 1.5;
        assert_eq!(validate(&c).len(), 3);
    }

    #[test]
    fn full_width_qr_is_allowed() {
        let mut c = AppConfig::default();
        c.fractions.qr_width = 1.0;
        assert!(validate(&c).is_empty());
    }

    #[test]
    fn empty_base_url_is_reported() {
        let mut c = AppConfig::default();
        c.base_url = "  ".into();
        assert_eq!(validate(&c), vec!["base URL must not be empty".to_string()]);
    }
}
