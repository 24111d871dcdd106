//! Image file decoding and encoding around the in-memory engine

use std::path::Path;

use crate::engine::buffer::PixelBuffer;
use crate::io::error::{Result, StereogramError};

/// Decode an image file into an RGBA8 buffer
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or is not a supported
/// image, or `InvalidDimension` if it decodes to an empty image
pub fn load_pixel_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| StereogramError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(StereogramError::InvalidDimension {
            width: rgba.width(),
            height: rgba.height(),
        });
    }
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(PixelBuffer::from_rgba(rgba))
}

/// Read the width and height of an image file from its header, without decoding pixels
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or its format is not recognised
pub fn read_dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32)> {
    let path = path.as_ref();
    let load_error = |source: image::ImageError| StereogramError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    image::ImageReader::open(path)
        .and_then(image::ImageReader::with_guessed_format)
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .into_dimensions()
        .map_err(load_error)
}

/// Encode `buffer` to `path`, choosing the format from the extension
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written to the specified path
pub fn save_pixel_buffer<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StereogramError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    // JPEG has no alpha channel
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let saved = if is_jpeg {
        image::DynamicImage::ImageRgba8(buffer.as_rgba().clone())
            .to_rgb8()
            .save(path)
    } else {
        buffer.as_rgba().save(path)
    };
    saved.map_err(|e| StereogramError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Wrote {}", path.display());
    Ok(())
}
