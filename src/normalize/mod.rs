//! Turns fetched image bytes into something the package writer can embed
//! directly (PNG/JPEG/GIF), converting SVG and WebP payloads to PNG.

use std::io::Cursor;

use bytes::Bytes;
use image::ImageFormat;

use crate::download::FetchedResource;
use crate::error::FormatError;

const SVG_MARKER: &str = "image/svg";
const WEBP_MARKER: &str = "image/webp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddableFormat {
    Png,
    Jpeg,
    Gif,
}

impl EmbeddableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            EmbeddableFormat::Png => "png",
            EmbeddableFormat::Jpeg => "jpeg",
            EmbeddableFormat::Gif => "gif",
        }
    }
}

/// Byte buffer guaranteed to decode as PNG, JPEG or GIF.
#[derive(Debug)]
pub struct EmbeddableImage {
    pub bytes: Bytes,
    pub format: EmbeddableFormat,
}

/// Decides between pass-through and conversion based on the declared
/// content-type, falling back to the URL extension only when the header is
/// absent or not a recognized image type. A recognized header always wins
/// over a contradicting extension.
pub fn normalize(resource: FetchedResource) -> Result<EmbeddableImage, FormatError> {
    let declared = resource
        .content_type
        .as_deref()
        .unwrap_or("")
        .to_ascii_lowercase();
    let path = source_path_lowercase(&resource.source_url);
    let header_recognized = declared.contains(SVG_MARKER)
        || declared.contains(WEBP_MARKER)
        || declared_passthrough(&declared).is_some();

    if declared.contains(SVG_MARKER) || (!header_recognized && path.ends_with(".svg")) {
        return rasterize_svg(&resource.bytes);
    }

    if declared.contains(WEBP_MARKER) || (!header_recognized && path.ends_with(".webp")) {
        return reencode_as_png(&resource.bytes);
    }

    if let Some(format) = declared_passthrough(&declared) {
        return Ok(EmbeddableImage { bytes: resource.bytes, format });
    }

    if let Some(format) = extension_format(&path) {
        return Ok(EmbeddableImage { bytes: resource.bytes, format });
    }

    Err(FormatError::UnsupportedType {
        content_type: if declared.is_empty() { "unknown".to_string() } else { declared },
    })
}

/// Pixel dimensions read from the encoded header, without a full decode.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), FormatError> {
    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| FormatError::Decode { source: image::ImageError::IoError(source) })?;
    reader.into_dimensions().map_err(|source| FormatError::Decode { source })
}

fn declared_passthrough(declared: &str) -> Option<EmbeddableFormat> {
    if declared.contains("image/png") {
        Some(EmbeddableFormat::Png)
    } else if declared.contains("image/jpeg") || declared.contains("image/jpg") {
        Some(EmbeddableFormat::Jpeg)
    } else if declared.contains("image/gif") {
        Some(EmbeddableFormat::Gif)
    } else {
        None
    }
}

fn extension_format(path: &str) -> Option<EmbeddableFormat> {
    if path.ends_with(".png") {
        Some(EmbeddableFormat::Png)
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        Some(EmbeddableFormat::Jpeg)
    } else if path.ends_with(".gif") {
        Some(EmbeddableFormat::Gif)
    } else {
        None
    }
}

fn source_path_lowercase(source_url: &str) -> String {
    match reqwest::Url::parse(source_url) {
        Ok(url) => url.path().to_ascii_lowercase(),
        Err(_) => source_url.to_ascii_lowercase(),
    }
}

fn reencode_as_png(bytes: &[u8]) -> Result<EmbeddableImage, FormatError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| FormatError::Decode { source })?;
    let rgba = decoded.to_rgba8();
    let mut out = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|source| FormatError::Encode { source })?;
    Ok(EmbeddableImage { bytes: out.into(), format: EmbeddableFormat::Png })
}

#[cfg(feature = "svg")]
fn rasterize_svg(bytes: &[u8]) -> Result<EmbeddableImage, FormatError> {
    use resvg::{tiny_skia, usvg};

    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|err| FormatError::Rasterize { reason: err.to_string() })?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        FormatError::Rasterize { reason: format!("invalid raster size {}x{}", size.width(), size.height()) }
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    let png = pixmap
        .encode_png()
        .map_err(|err| FormatError::Rasterize { reason: err.to_string() })?;
    Ok(EmbeddableImage { bytes: png.into(), format: EmbeddableFormat::Png })
}

#[cfg(not(feature = "svg"))]
fn rasterize_svg(_bytes: &[u8]) -> Result<EmbeddableImage, FormatError> {
    Err(FormatError::RasterizerUnavailable)
}

#[cfg(test)]
mod tests {
    use image::codecs::webp::WebPEncoder;
    use image::{ColorType, Rgba, RgbaImage};

    use super::*;

    fn resource(bytes: Vec<u8>, content_type: Option<&str>, url: &str) -> FetchedResource {
        FetchedResource {
            bytes: bytes.into(),
            content_type: content_type.map(|value| value.to_string()),
            source_url: url.to_string(),
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Gif)
            .unwrap();
        out
    }

    fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 128]));
        let mut out = Vec::new();
        WebPEncoder::new_lossless(&mut out)
            .encode(img.as_raw(), width, height, ColorType::Rgba8)
            .unwrap();
        out
    }

    const SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#ff0000"/></svg>"##;

    #[test]
    fn declared_png_passes_bytes_through_unchanged() {
        let bytes = png_bytes(8, 8);
        let result =
            normalize(resource(bytes.clone(), Some("image/png"), "https://example.com/a")).unwrap();

        assert_eq!(&result.bytes[..], &bytes[..]);
        assert_eq!(result.format, EmbeddableFormat::Png);
    }

    #[test]
    fn content_type_matching_is_case_insensitive_and_tolerates_parameters() {
        let bytes = png_bytes(8, 8);
        let result = normalize(resource(
            bytes.clone(),
            Some("IMAGE/JPEG; charset=utf-8"),
            "https://example.com/a",
        ))
        .unwrap();

        assert_eq!(&result.bytes[..], &bytes[..]);
        assert_eq!(result.format, EmbeddableFormat::Jpeg);
    }

    #[test]
    fn declared_gif_passes_through() {
        let bytes = gif_bytes(4, 4);
        let result =
            normalize(resource(bytes.clone(), Some("image/gif"), "https://example.com/a")).unwrap();

        assert_eq!(&result.bytes[..], &bytes[..]);
        assert_eq!(result.format, EmbeddableFormat::Gif);
    }

    #[test]
    fn webp_is_reencoded_as_png_with_equal_dimensions() {
        let result = normalize(resource(
            webp_bytes(12, 7),
            Some("image/webp"),
            "https://example.com/pic",
        ))
        .unwrap();

        assert_eq!(result.format, EmbeddableFormat::Png);
        let decoded = image::load_from_memory_with_format(&result.bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn webp_extension_is_used_when_header_is_unreliable() {
        let result = normalize(resource(
            webp_bytes(5, 5),
            Some("application/octet-stream"),
            "https://example.com/pic.webp",
        ))
        .unwrap();

        assert_eq!(result.format, EmbeddableFormat::Png);
    }

    #[test]
    fn recognized_header_beats_contradicting_extension() {
        // Served as PNG but named .webp: the header wins, no re-encode.
        let bytes = png_bytes(6, 6);
        let result = normalize(resource(
            bytes.clone(),
            Some("image/png"),
            "https://example.com/pic.webp",
        ))
        .unwrap();

        assert_eq!(&result.bytes[..], &bytes[..]);
        assert_eq!(result.format, EmbeddableFormat::Png);
    }

    #[test]
    fn missing_header_with_known_extension_falls_back_to_passthrough() {
        let bytes = png_bytes(3, 3);
        let result =
            normalize(resource(bytes.clone(), None, "https://example.com/logo.PNG")).unwrap();

        assert_eq!(&result.bytes[..], &bytes[..]);
        assert_eq!(result.format, EmbeddableFormat::Png);
    }

    #[test]
    fn unsupported_type_reports_the_content_type() {
        let result = normalize(resource(
            b"<html/>".to_vec(),
            Some("text/html"),
            "https://example.com/page",
        ));

        match result {
            Err(FormatError::UnsupportedType { content_type }) => {
                assert!(content_type.contains("text/html"))
            }
            other => panic!("expected unsupported type, got {:?}", other),
        }
    }

    #[test]
    fn missing_header_and_unknown_extension_reports_unknown() {
        let result = normalize(resource(b"???".to_vec(), None, "https://example.com/data"));

        match result {
            Err(FormatError::UnsupportedType { content_type }) => {
                assert_eq!(content_type, "unknown")
            }
            other => panic!("expected unsupported type, got {:?}", other),
        }
    }

    #[test]
    fn corrupt_webp_is_a_decode_error() {
        let result = normalize(resource(
            b"RIFFxxxxWEBPbroken".to_vec(),
            Some("image/webp"),
            "https://example.com/pic.webp",
        ));

        assert!(matches!(result, Err(FormatError::Decode { .. })));
    }

    #[test]
    fn dimensions_reads_the_header() {
        assert_eq!(dimensions(&png_bytes(33, 21)).unwrap(), (33, 21));
    }

    #[cfg(feature = "svg")]
    #[test]
    fn svg_is_rasterized_to_png_at_intrinsic_size() {
        let result = normalize(resource(
            SVG.to_vec(),
            Some("image/svg+xml"),
            "https://example.com/logo",
        ))
        .unwrap();

        assert_eq!(result.format, EmbeddableFormat::Png);
        assert_eq!(dimensions(&result.bytes).unwrap(), (40, 20));
    }

    #[cfg(feature = "svg")]
    #[test]
    fn svg_extension_is_used_when_header_is_missing() {
        let result =
            normalize(resource(SVG.to_vec(), None, "https://example.com/logo.svg")).unwrap();

        assert_eq!(result.format, EmbeddableFormat::Png);
    }

    #[cfg(feature = "svg")]
    #[test]
    fn broken_svg_is_a_rasterize_error() {
        let result = normalize(resource(
            b"<svg".to_vec(),
            Some("image/svg+xml"),
            "https://example.com/logo.svg",
        ));

        assert!(matches!(result, Err(FormatError::Rasterize { .. })));
    }

    #[cfg(not(feature = "svg"))]
    #[test]
    fn svg_without_rasterizer_fails_with_capability_error() {
        let result = normalize(resource(
            SVG.to_vec(),
            Some("image/svg+xml"),
            "https://example.com/logo.svg",
        ));

        assert!(matches!(result, Err(FormatError::RasterizerUnavailable)));
    }
}
