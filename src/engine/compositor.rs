//! Depth-driven composition of the final stereogram
//!
//! Composition runs two passes over a canvas the size of the depth map:
//! the pattern tile is repeated every `separation` columns, then every
//! column from `separation` onwards takes its color from a column to its
//! left whose distance shrinks with the local depth.

use crate::engine::buffer::{CHANNELS, PixelBuffer};
use crate::engine::depth::{DepthMap, shift_for};
use crate::engine::pattern::{NoiseSource, build_tile};
use crate::io::configuration::{DEFAULT_DEPTH_STRENGTH, DEFAULT_SEPARATION};
use crate::io::error::{Result, StereogramError};

/// Per-request generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereogramConfig {
    /// Horizontal pixel distance between linked columns
    pub separation: u32,
    /// Percentage of `separation` that full depth pulls the link point inward
    pub depth_strength: u32,
}

impl Default for StereogramConfig {
    fn default() -> Self {
        Self {
            separation: DEFAULT_SEPARATION,
            depth_strength: DEFAULT_DEPTH_STRENGTH,
        }
    }
}

impl StereogramConfig {
    /// Check the parameters can drive a composition
    ///
    /// # Errors
    ///
    /// Returns `InvalidSeparation` if `separation` is zero
    pub const fn validate(&self) -> Result<()> {
        if self.separation == 0 {
            return Err(StereogramError::InvalidSeparation {
                separation: self.separation,
            });
        }
        Ok(())
    }
}

/// Compose a stereogram from a depth map and a pattern tile
///
/// All inputs are validated before the canvas is allocated, so a failure
/// never leaves a partial image behind.
///
/// # Errors
///
/// - `InvalidSeparation` if `separation` is zero
/// - `InvalidPattern` if `pattern` is missing or not `separation` pixels wide
/// - `DimensionMismatch` if the pattern is not as tall as the depth map
pub fn compose(
    depth: &DepthMap,
    separation: u32,
    depth_strength: u32,
    pattern: Option<&PixelBuffer>,
) -> Result<PixelBuffer> {
    let config = StereogramConfig {
        separation,
        depth_strength,
    };
    config.validate()?;

    let pattern = pattern.ok_or_else(|| StereogramError::InvalidPattern {
        reason: "no pattern tile supplied".to_string(),
    })?;
    if pattern.width() != separation {
        return Err(StereogramError::InvalidPattern {
            reason: format!(
                "tile is {} pixels wide but separation is {separation}",
                pattern.width()
            ),
        });
    }
    if pattern.height() != depth.height() {
        return Err(StereogramError::DimensionMismatch {
            expected: (separation, depth.height()),
            actual: pattern.dimensions(),
        });
    }

    let mut canvas = tile_horizontally(pattern, depth.width(), depth.height())?;
    link_columns(&mut canvas, depth, config)?;
    Ok(canvas)
}

/// Build the tile for `depth_image` and compose it in one call
///
/// # Errors
///
/// Propagates any tile building or composition error
pub fn generate(
    depth_image: &PixelBuffer,
    template: Option<&PixelBuffer>,
    config: StereogramConfig,
    noise: NoiseSource,
) -> Result<PixelBuffer> {
    config.validate()?;
    let depth = DepthMap::from_buffer(depth_image);
    let pattern = build_tile(
        config.separation,
        depth.height(),
        template,
        &mut noise.rng(),
    )?;
    compose(
        &depth,
        config.separation,
        config.depth_strength,
        Some(&pattern),
    )
}

/// Pass 1: repeat `pattern` at columns `0, w, 2w, …` across a new canvas
///
/// The last copy is clipped at the right edge.
///
/// # Errors
///
/// Returns `InvalidDimension` if the canvas has a zero side, or
/// `InvalidPattern` if the pattern is zero pixels wide
pub fn tile_horizontally(pattern: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    let step = pattern.width();
    if step == 0 {
        return Err(StereogramError::InvalidPattern {
            reason: "tile has zero width".to_string(),
        });
    }

    let mut canvas = PixelBuffer::new(width, height)?;
    for x in (0..width).step_by(step as usize) {
        canvas.blit(pattern, x);
    }
    Ok(canvas)
}

/// Pass 2: rewrite each column from its depth-adjusted partner on the left
///
/// For column `x >= separation` the color channels are copied from
/// `x - separation + shift`, where `shift` grows with the depth sample at
/// `(x, y)`. Alpha is never touched and columns left of `separation` keep
/// their tiled pattern.
///
/// Reads see the canvas as already rewritten for columns left of `x`, so
/// columns must be visited left to right within a row. Rows are independent.
///
/// # Errors
///
/// Returns `InvalidSeparation` for a zero separation, or `DimensionMismatch`
/// if the canvas and depth map differ in size
pub fn link_columns(
    canvas: &mut PixelBuffer,
    depth: &DepthMap,
    config: StereogramConfig,
) -> Result<()> {
    config.validate()?;
    if canvas.dimensions() != depth.dimensions() {
        return Err(StereogramError::DimensionMismatch {
            expected: depth.dimensions(),
            actual: canvas.dimensions(),
        });
    }

    let width = i64::from(canvas.width());
    let separation = i64::from(config.separation);

    for (y, row) in (0..depth.height()).zip(canvas.rows_mut()) {
        let Some(samples) = depth.row(y) else {
            break;
        };
        for (x, &raw) in samples.iter().enumerate().skip(config.separation as usize) {
            let shift = i64::from(shift_for(raw, config.separation, config.depth_strength));
            let left = x as i64 - separation + shift;
            if (0..width).contains(&left) {
                let source = left as usize * CHANNELS;
                row.copy_within(source..source + 3, x * CHANNELS);
            }
        }
    }
    Ok(())
}
