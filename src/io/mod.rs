/// Directory listings of depth images and templates with ordinal ids
pub mod catalog;
/// Command-line interface and batch file processing
pub mod cli;
/// Generation defaults and runtime constants
pub mod configuration;
/// Error types
pub mod error;
/// Decoding and encoding of image files
pub mod image;
/// Progress display for batch runs
pub mod progress;
