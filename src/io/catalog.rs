//! Directory listings of available depth images and templates
//!
//! Entries are numbered from 1 in file-name order so that a caller can pick
//! an image by a short, stable ordinal instead of a path.

use std::path::{Path, PathBuf};

use crate::io::configuration::{OUTPUT_SUFFIX, SUPPORTED_EXTENSIONS};
use crate::io::error::{Result, StereogramError};

/// One image file in a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// 1-based ordinal identifier
    pub id: usize,
    /// File stem, used as a display name
    pub name: String,
    /// File name including extension
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
}

/// Ordered list of the supported image files in one directory
#[derive(Debug, Clone)]
pub struct Catalog {
    directory: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// List the supported image files directly inside `directory`
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory cannot be read
    pub fn scan<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::scan_filtered(directory, |_| true)
    }

    /// List the depth images inside `directory`, leaving out generated stereograms
    ///
    /// Earlier outputs written next to their inputs would otherwise shift the
    /// ids after every run.
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the directory cannot be read
    pub fn scan_depth_images<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::scan_filtered(directory, |path| !is_generated_output(path))
    }

    fn scan_filtered<P, F>(directory: P, keep: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&Path) -> bool,
    {
        let directory = directory.as_ref().to_path_buf();
        let read_error = |e| StereogramError::FileSystem {
            path: directory.clone(),
            operation: "read directory",
            source: e,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&directory).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_file() && is_supported_image(&path) && keep(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let entries = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| CatalogEntry {
                id: index + 1,
                name: path
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
                filename: path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
                path,
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Catalog of {} holds {} images",
            directory.display(),
            entries.len()
        );
        Ok(Self { directory, entries })
    }

    /// Look up an entry by its ordinal identifier
    ///
    /// # Errors
    ///
    /// Returns `CatalogLookup` if no entry has that id
    pub fn get(&self, id: usize) -> Result<&CatalogEntry> {
        id.checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or_else(|| StereogramError::CatalogLookup {
                directory: self.directory.clone(),
                id,
                available: self.entries.len(),
            })
    }

    /// All entries in id order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Directory the catalog was built from
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the directory held no supported images
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True if the extension is one of the supported image formats, ignoring case
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// True if the file stem carries the suffix of generated stereograms
pub fn is_generated_output(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
}
