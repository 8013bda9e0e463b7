// Image gate and encoder. The inspector only looks at magic bytes so that
// a wrong file is rejected before any network round trip; the encoder is
// a plain standard-alphabet base64 without line wrapping.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;

use crate::error::{PipelineResult, UploadError};

/// Image formats recognized from their file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    WebP,
}

impl ImageFormat {
    /// Sniff the format from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]) {
            return Some(ImageFormat::Png);
        }
        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            return Some(ImageFormat::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }
        if bytes.starts_with(b"BM") && bytes.len() >= 14 {
            return Some(ImageFormat::Bmp);
        }
        if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
            return Some(ImageFormat::Tiff);
        }
        // WebP: RIFF ....WEBP
        if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && bytes[8..12] == *b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::WebP => "webp",
        }
    }
}

/// Read `path` and return its bytes if they look like an image.
///
/// An unreadable file is reported the same way as a non-image file.
pub fn inspect(path: &Path) -> PipelineResult<Vec<u8>> {
    let not_an_image = || UploadError::NotAnImage {
        path: path.to_path_buf(),
    };

    let bytes = fs::read(path).map_err(|e| {
        debug!("Could not read {}: {}", path.display(), e);
        not_an_image()
    })?;

    match ImageFormat::detect(&bytes) {
        Some(format) => {
            debug!("{} looks like a {} image ({} bytes)", path.display(), format.as_str(), bytes.len());
            Ok(bytes)
        }
        None => Err(not_an_image()),
    }
}

/// Standard base64 of `bytes`, no line breaks.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
