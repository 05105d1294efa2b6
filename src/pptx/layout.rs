//! Slide geometry. All placement happens on a fixed 10 x 7.5 in canvas.

pub const EMU_PER_INCH: f64 = 914_400.0;

pub const SLIDE_WIDTH_IN: f64 = 10.0;
pub const SLIDE_HEIGHT_IN: f64 = 7.5;

/// Vertical start of the image area on a content slide.
pub const IMAGE_TOP_IN: f64 = 2.8;
/// Width used when the request gives no explicit dimensions.
pub const DEFAULT_IMAGE_WIDTH_IN: f64 = 6.5;
/// Vertical gap between stacked images.
pub const IMAGE_GAP_IN: f64 = 0.24;

pub const CAPTION_GAP_IN: f64 = 0.08;
pub const CAPTION_HEIGHT_IN: f64 = 0.36;

pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Final size in inches for an image with the given pixel dimensions.
/// Explicit request dimensions win; a single explicit dimension keeps the
/// pixel aspect ratio; with neither, the image is scaled to the default
/// width.
pub fn scale_to_fit(
    px_width: u32,
    px_height: u32,
    width_inch: Option<f64>,
    height_inch: Option<f64>,
) -> (f64, f64) {
    let ratio = px_height.max(1) as f64 / px_width.max(1) as f64;
    match (width_inch, height_inch) {
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) => (width, width * ratio),
        (None, Some(height)) => (height / ratio, height),
        (None, None) => (DEFAULT_IMAGE_WIDTH_IN, DEFAULT_IMAGE_WIDTH_IN * ratio),
    }
}

/// Horizontal offset that centers a width on the slide.
pub fn centered_left_in(width_in: f64) -> f64 {
    (SLIDE_WIDTH_IN - width_in) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emu_conversion_rounds() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(0.5), 457_200);
        assert_eq!(emu(2.8), 2_560_320);
    }

    #[test]
    fn no_explicit_dimensions_scale_to_default_width() {
        let (width, height) = scale_to_fit(800, 600, None, None);
        assert_eq!(width, 6.5);
        assert!((height - 4.875).abs() < 1e-9);
    }

    #[test]
    fn explicit_width_keeps_aspect_ratio() {
        let (width, height) = scale_to_fit(200, 100, Some(4.0), None);
        assert_eq!(width, 4.0);
        assert!((height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_height_keeps_aspect_ratio() {
        let (width, height) = scale_to_fit(200, 100, None, Some(2.0));
        assert!((width - 4.0).abs() < 1e-9);
        assert_eq!(height, 2.0);
    }

    #[test]
    fn both_explicit_dimensions_win_over_the_pixel_ratio() {
        let (width, height) = scale_to_fit(200, 100, Some(3.0), Some(3.0));
        assert_eq!((width, height), (3.0, 3.0));
    }

    #[test]
    fn default_width_is_centered_at_1_75_in() {
        assert!((centered_left_in(6.5) - 1.75).abs() < 1e-9);
    }
}
