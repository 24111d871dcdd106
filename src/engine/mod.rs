/// Owned RGBA8 pixel storage
pub mod buffer;
/// Two-pass stereogram composition
pub mod compositor;
/// Depth map sampling and the depth-to-shift rule
pub mod depth;
/// Pattern tile construction from templates or noise
pub mod pattern;

pub use buffer::PixelBuffer;
pub use compositor::{StereogramConfig, compose, generate};
pub use depth::DepthMap;
pub use pattern::{NoiseSource, PatternTileBuilder, build_tile};
