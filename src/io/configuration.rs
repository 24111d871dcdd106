//! Generation defaults and runtime configuration constants

// Values the original web front end fixed for every request
/// Default horizontal distance between linked columns
pub const DEFAULT_SEPARATION: u32 = 170;
/// Default percentage of the separation that full depth pulls inward
pub const DEFAULT_DEPTH_STRENGTH: u32 = 25;

/// Upper bound accepted for depth strength on the command line
pub const MAX_DEPTH_STRENGTH: u32 = 100;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed output dimension
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// File extensions recognised as depth images and templates (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_stereogram";
/// Extension of generated files
pub const OUTPUT_EXTENSION: &str = "png";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Number of stages reported per file (load, pattern, compose, save)
pub const STAGES_PER_FILE: u64 = 4;
