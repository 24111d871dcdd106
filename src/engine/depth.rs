//! Depth map sampling and the depth-to-shift rule

use ndarray::Array2;

use crate::engine::buffer::PixelBuffer;
use crate::io::error::{Result, StereogramError};

/// Luminance-only view of a depth image
///
/// Only the red channel of the source is kept; `0` and `255` are the two ends
/// of the depth range. Samples are indexed `(row, column)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthMap {
    samples: Array2<u8>,
}

impl DepthMap {
    /// Extract the depth samples from the red channel of a decoded image
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        let samples = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            buffer
                .pixel(x as u32, y as u32)
                .map_or(0, |[red, _, _, _]| red)
        });
        Self { samples }
    }

    /// Depth map where every sample equals `value`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either side is zero
    pub fn uniform(width: u32, height: u32, value: u8) -> Result<Self> {
        Self::from_fn(width, height, |_, _| value)
    }

    /// Depth map where the sample at `(x, y)` is `f(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either side is zero
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u8,
    {
        if width == 0 || height == 0 {
            return Err(StereogramError::InvalidDimension { width, height });
        }
        let samples =
            Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
                f(x as u32, y as u32)
            });
        Ok(Self { samples })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.samples.ncols() as u32
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.samples.nrows() as u32
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Raw sample at `(x, y)`
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        self.samples.get((y as usize, x as usize)).copied()
    }

    /// Samples of row `y`, left to right
    pub fn row(&self, y: u32) -> Option<ndarray::ArrayView1<'_, u8>> {
        ((y as usize) < self.samples.nrows()).then(|| self.samples.row(y as usize))
    }

    /// True if any sample is nonzero
    pub fn has_relief(&self) -> bool {
        self.samples.iter().any(|&s| s != 0)
    }
}

/// Map a raw depth sample onto `[0.0, 1.0]`
pub fn normalize(raw: u8) -> f64 {
    f64::from(raw) / 255.0
}

/// Number of pixels a link point is pulled inward for a raw depth sample
///
/// `floor(depth × separation × (depth_strength / 100))`, evaluated in `f64`
/// in exactly that order so results match pixel-for-pixel across platforms.
pub fn shift_for(raw: u8, separation: u32, depth_strength: u32) -> u32 {
    let shift =
        normalize(raw) * f64::from(separation) * (f64::from(depth_strength) / 100.0);
    shift.floor() as u32
}

/// Largest shift any sample can produce
pub fn max_shift(separation: u32, depth_strength: u32) -> u32 {
    shift_for(u8::MAX, separation, depth_strength)
}
