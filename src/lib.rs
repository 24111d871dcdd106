//! Single-image stereogram synthesis
//!
//! A grayscale depth map and a repeating pattern are combined into one flat
//! image that shows the depth map's surface in 3D when viewed with the eyes
//! converged behind the picture plane. The engine works on in-memory RGBA8
//! buffers; the `io` module adds file handling and a batch CLI around it.

#![forbid(unsafe_code)]

/// Pattern tiles, depth maps and the compositor
pub mod engine;
/// Input/output operations, configuration and error handling
pub mod io;

pub use engine::{DepthMap, NoiseSource, PixelBuffer, StereogramConfig};
pub use io::error::{Result, StereogramError};
