//! Error types for stereogram synthesis and the surrounding file handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all stereogram operations
#[derive(Debug)]
pub enum StereogramError {
    /// A requested buffer or tile has a zero width or height
    InvalidDimension {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Template image cannot be used as a pattern motif
    InvalidTemplate {
        /// Description of what's wrong with the template
        reason: String,
    },

    /// Separation between linked columns must be positive
    InvalidSeparation {
        /// Provided separation
        separation: u32,
    },

    /// Pattern tile is missing or does not fit the separation
    InvalidPattern {
        /// Description of what's wrong with the pattern
        reason: String,
    },

    /// Depth map and canvas (or pattern) sizes disagree
    DimensionMismatch {
        /// Size the depth map dictates (width, height)
        expected: (u32, u32),
        /// Size that was supplied (width, height)
        actual: (u32, u32),
    },

    /// Command-line or configuration value failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Ordinal identifier does not name any catalog entry
    CatalogLookup {
        /// Directory the catalog was built from
        directory: PathBuf,
        /// Requested identifier
        id: usize,
        /// Number of entries in the catalog
        available: usize,
    },

    /// Failed to decode an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode the generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for StereogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { width, height } => {
                write!(f, "Invalid dimensions {width}x{height}: both sides must be positive")
            }
            Self::InvalidTemplate { reason } => write!(f, "Invalid template: {reason}"),
            Self::InvalidSeparation { separation } => {
                write!(f, "Invalid separation {separation}: must be at least 1 pixel")
            }
            Self::InvalidPattern { reason } => write!(f, "Invalid pattern: {reason}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Dimension mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::CatalogLookup {
                directory,
                id,
                available,
            } => {
                write!(
                    f,
                    "No image with id {id} in '{}' ({available} available)",
                    directory.display()
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for StereogramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for stereogram results
pub type Result<T> = std::result::Result<T, StereogramError>;

impl From<image::ImageError> for StereogramError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for StereogramError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> StereogramError {
    StereogramError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
