//! Construction of the repeating pattern tile
//!
//! A tile is exactly one separation wide and as tall as the output. It is
//! either a template image scaled to the tile width and repeated downwards,
//! or opaque gray noise with no spatial correlation.

use image::imageops::{self, FilterType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::buffer::PixelBuffer;
use crate::io::error::{Result, StereogramError};

/// Where the randomness for noise tiles comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoiseSource {
    /// Fresh operating-system entropy on every request
    #[default]
    Entropy,
    /// Reproducible stream from a fixed seed
    Seeded(u64),
}

impl NoiseSource {
    /// `Seeded` when a seed is given, `Entropy` otherwise
    pub const fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(seed),
            None => Self::Entropy,
        }
    }

    /// Instantiate the random number generator
    pub fn rng(self) -> StdRng {
        match self {
            Self::Entropy => StdRng::from_os_rng(),
            Self::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// Builds a `width × height` pattern tile from an optional template
#[derive(Debug, Clone, Copy)]
pub struct PatternTileBuilder<'a> {
    width: u32,
    height: u32,
    template: Option<&'a PixelBuffer>,
}

impl<'a> PatternTileBuilder<'a> {
    /// Start a builder for a tile of the given size, defaulting to noise
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            template: None,
        }
    }

    /// Use `template` as the motif; `None` keeps the noise path
    #[must_use]
    pub const fn with_template(mut self, template: Option<&'a PixelBuffer>) -> Self {
        self.template = template;
        self
    }

    /// Render the tile
    ///
    /// `rng` is only consumed on the noise path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if the tile size has a zero side, or
    /// `InvalidTemplate` if the template has a zero side
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<PixelBuffer> {
        if self.width == 0 || self.height == 0 {
            return Err(StereogramError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }

        match self.template {
            Some(template) => tile_template(self.width, self.height, template),
            None => fill_noise(self.width, self.height, rng),
        }
    }
}

/// Build a pattern tile; see [`PatternTileBuilder::build`]
///
/// # Errors
///
/// Returns `InvalidDimension` or `InvalidTemplate` for unusable sizes
pub fn build_tile<R: Rng>(
    width: u32,
    height: u32,
    template: Option<&PixelBuffer>,
    rng: &mut R,
) -> Result<PixelBuffer> {
    PatternTileBuilder::new(width, height)
        .with_template(template)
        .build(rng)
}

/// Height of one template band once scaled to `tile_width`, preserving aspect ratio
///
/// # Errors
///
/// Returns `InvalidTemplate` if the template has a zero side
pub fn scaled_band_height(tile_width: u32, template: &PixelBuffer) -> Result<u32> {
    let (template_width, template_height) = template.dimensions();
    if template_width == 0 || template_height == 0 {
        return Err(StereogramError::InvalidTemplate {
            reason: format!("template is {template_width}x{template_height}"),
        });
    }

    let aspect_ratio = f64::from(template_width) / f64::from(template_height);
    let band = (f64::from(tile_width) / aspect_ratio).round();
    Ok((band as u32).max(1))
}

fn tile_template(width: u32, height: u32, template: &PixelBuffer) -> Result<PixelBuffer> {
    let band_height = scaled_band_height(width, template)?;
    let scaled = PixelBuffer::from_rgba(imageops::resize(
        template.as_rgba(),
        width,
        band_height,
        FilterType::Triangle,
    ));

    let mut tile = PixelBuffer::new(width, height)?;
    tile.blit(&scaled, 0);
    repeat_downwards(&mut tile, band_height.min(height));
    Ok(tile)
}

/// Fill the rows below `rendered` by copying the already rendered rows
///
/// Each pass copies `[0, rendered)` to `[rendered, rendered + len)`, so
/// coverage doubles until the tile is full and the final band is a crop of
/// the top. The leftover rows are never filled with a whole band scaled down
/// to fit, so every row keeps the template's aspect ratio.
/// Source and destination live in the same buffer, hence the overlap-safe
/// `copy_within`.
fn repeat_downwards(tile: &mut PixelBuffer, mut rendered: u32) {
    let height = tile.height();
    let stride = tile.stride();
    let bytes = tile.as_raw_mut();

    while rendered > 0 && rendered < height {
        let copy_rows = rendered.min(height - rendered) as usize;
        let destination = rendered as usize * stride;
        bytes.copy_within(0..copy_rows * stride, destination);
        rendered += copy_rows as u32;
    }
}

fn fill_noise<R: Rng>(width: u32, height: u32, rng: &mut R) -> Result<PixelBuffer> {
    PixelBuffer::from_fn(width, height, |_, _| {
        let value: u8 = rng.random();
        [value, value, value, u8::MAX]
    })
}
