//! Owned RGBA8 pixel storage shared by every synthesis stage

use image::{Rgba, RgbaImage};

use crate::io::error::{Result, StereogramError};

/// Bytes per pixel (red, green, blue, alpha)
pub const CHANNELS: usize = 4;

/// Rectangular grid of RGBA8 pixels stored row-major
///
/// A buffer is owned by the stage that created it. Downstream stages only
/// read it, except the compositor which mutates its own working canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Create a fully transparent buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either side is zero
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Wrap an already decoded image
    pub const fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Build a buffer from raw row-major RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either side is zero or the byte count
    /// does not equal `width * height * 4`
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        RgbaImage::from_raw(width, height, data)
            .map(Self::from_rgba)
            .ok_or(StereogramError::InvalidDimension { width, height })
    }

    /// Create a buffer where every pixel is produced by `f(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either side is zero
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y))),
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Overwrite the pixel at `(x, y)`; coordinates outside the buffer are ignored
    pub fn put_pixel(&mut self, x: u32, y: u32, value: [u8; 4]) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            *pixel = Rgba(value);
        }
    }

    /// Raw bytes of row `y`
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let stride = self.stride();
        let start = (y as usize).checked_mul(stride)?;
        self.image.as_raw().get(start..start + stride)
    }

    /// Mutable iterator over rows, top to bottom
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let stride = self.stride();
        self.image.chunks_exact_mut(stride)
    }

    /// All bytes, row-major RGBA
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable access to all bytes, row-major RGBA
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Borrow as an `image` buffer
    pub const fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Convert into an `image` buffer for encoding
    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.image.width() as usize * CHANNELS
    }

    /// Copy `source` onto this buffer with its top-left corner at column `x_offset`, row 0
    ///
    /// The copy is clipped to this buffer on the right and bottom. Pixels are
    /// replaced, not blended, which is what drawing onto a transparent canvas
    /// amounts to.
    pub fn blit(&mut self, source: &Self, x_offset: u32) {
        if x_offset >= self.width() {
            return;
        }
        let copy_width = source.width().min(self.width() - x_offset) as usize;
        let copy_bytes = copy_width * CHANNELS;
        let start = x_offset as usize * CHANNELS;

        let rows = self.height().min(source.height());
        for (y, dst_row) in (0..rows).zip(self.rows_mut()) {
            let Some(src_row) = source.row(y) else {
                break;
            };
            if let (Some(dst), Some(src)) = (
                dst_row.get_mut(start..start + copy_bytes),
                src_row.get(..copy_bytes),
            ) {
                dst.copy_from_slice(src);
            }
        }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self::from_rgba(image)
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        buffer.into_rgba()
    }
}

const fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(StereogramError::InvalidDimension { width, height });
    }
    Ok(())
}
