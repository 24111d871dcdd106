//! Command-line interface for turning depth images into stereograms

use crate::engine::compositor::{StereogramConfig, compose};
use crate::engine::depth::{DepthMap, max_shift};
use crate::engine::pattern::{NoiseSource, build_tile};
use crate::engine::PixelBuffer;
use crate::io::catalog::{Catalog, is_supported_image};
use crate::io::configuration::{
    DEFAULT_DEPTH_STRENGTH, DEFAULT_SEPARATION, MAX_DEPTH_STRENGTH, MAX_IMAGE_DIMENSION,
    OUTPUT_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, StereogramError, invalid_parameter};
use crate::io::image::{load_pixel_buffer, read_dimensions, save_pixel_buffer};
use crate::io::progress::{ProgressManager, Stage};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "stereogram")]
#[command(
    author,
    version,
    about = "Render single-image stereograms from grayscale depth maps"
)]
/// Command-line arguments for the stereogram generator
pub struct Cli {
    /// Depth image or directory of depth images to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Pick one depth image from a TARGET directory by its 1-based id
    #[arg(short = 'D', long)]
    pub depth_id: Option<usize>,

    /// Template image used as the repeating motif (noise when omitted)
    #[arg(short, long, conflicts_with = "template_id")]
    pub template: Option<PathBuf>,

    /// Directory of template images, for listing and --template-id
    #[arg(short = 'T', long)]
    pub templates_dir: Option<PathBuf>,

    /// Pick a template from --templates-dir by its 1-based id
    #[arg(short = 'i', long, requires = "templates_dir")]
    pub template_id: Option<usize>,

    /// Horizontal distance in pixels between linked columns
    #[arg(short, long, default_value_t = DEFAULT_SEPARATION)]
    pub separation: u32,

    /// Percentage of the separation that full depth pulls inward
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DEPTH_STRENGTH,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_DEPTH_STRENGTH))
    )]
    pub depth_strength: u32,

    /// Seed for the noise pattern (system randomness when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path (single depth image only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the available depth images and templates with their ids, then exit
    #[arg(short, long)]
    pub list: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet && !self.list
    }

    /// Generation parameters taken from the arguments
    pub const fn config(&self) -> StereogramConfig {
        StereogramConfig {
            separation: self.separation,
            depth_strength: self.depth_strength,
        }
    }

    /// Noise source derived from `--seed`
    pub const fn noise(&self) -> NoiseSource {
        NoiseSource::from_seed(self.seed)
    }

    /// Log level for the terminal logger
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Orchestrates batch generation of stereograms with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, template loading or the
    /// generation of any file fails
    pub fn process(&mut self) -> Result<()> {
        if self.cli.list {
            return self.list();
        }

        let config = self.cli.config();
        config.validate()?;
        if config.depth_strength > MAX_DEPTH_STRENGTH {
            return Err(invalid_parameter(
                "depth_strength",
                &config.depth_strength,
                &format!("must be at most {MAX_DEPTH_STRENGTH}"),
            ));
        }

        let files = self.collect_files()?;
        if files.is_empty() {
            log::info!("Nothing to do for {}", self.cli.target.display());
            return Ok(());
        }

        let template = self.resolve_template()?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index, template.as_ref())?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Path a stereogram for `input_path` is written to
    pub fn output_path_for(&self, input_path: &Path) -> PathBuf {
        self.cli
            .output
            .clone()
            .unwrap_or_else(|| Self::get_output_path(input_path))
    }

    // Allow print for the listing itself, which is the requested output
    #[allow(clippy::print_stdout)]
    fn list(&self) -> Result<()> {
        let mut catalogs = Vec::new();
        if self.cli.target.is_dir() {
            catalogs.push((
                "Depth images",
                Catalog::scan_depth_images(&self.cli.target)?,
            ));
        }
        if let Some(ref dir) = self.cli.templates_dir {
            catalogs.push(("Templates", Catalog::scan(dir)?));
        }
        if catalogs.is_empty() {
            return Err(invalid_parameter(
                "list",
                &self.cli.target.display(),
                &"needs a TARGET directory or --templates-dir",
            ));
        }

        for (title, catalog) in &catalogs {
            println!("{title} in {}:", catalog.directory().display());
            for entry in catalog.entries() {
                println!("  {:>3}  {}  ({})", entry.id, entry.name, entry.filename);
            }
        }
        Ok(())
    }

    fn resolve_template(&self) -> Result<Option<PixelBuffer>> {
        let path = match (&self.cli.template, &self.cli.templates_dir, self.cli.template_id) {
            (Some(path), _, _) => Some(path.clone()),
            (None, Some(dir), Some(id)) => Some(Catalog::scan(dir)?.get(id)?.path.clone()),
            _ => None,
        };

        path.map(|p| {
            log::info!("Using template {}", p.display());
            load_pixel_buffer(&p).map_err(|e| match e {
                StereogramError::InvalidDimension { width, height } => {
                    StereogramError::InvalidTemplate {
                        reason: format!("'{}' is {width}x{height}", p.display()),
                    }
                }
                other => other,
            })
        })
        .transpose()
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if let Some(id) = self.cli.depth_id {
                return Err(invalid_parameter(
                    "depth_id",
                    &id,
                    &"needs a TARGET directory",
                ));
            }
            if !is_supported_image(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"must be a PNG or JPEG image",
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            if let Some(id) = self.cli.depth_id {
                let path = Catalog::scan_depth_images(target)?.get(id)?.path.clone();
                return Ok(if self.should_process_file(&path) {
                    vec![path]
                } else {
                    vec![]
                });
            }
            if self.cli.output.is_some() {
                return Err(invalid_parameter(
                    "output",
                    &target.display(),
                    &"--output needs a single depth image or --depth-id",
                ));
            }
            let catalog = Catalog::scan_depth_images(target)?;
            Ok(catalog
                .entries()
                .iter()
                .map(|entry| entry.path.clone())
                .filter(|path| self.should_process_file(path))
                .collect())
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be an image file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path_for(input_path);
        if output_path.exists() {
            log::info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        template: Option<&PixelBuffer>,
    ) -> Result<()> {
        let start_time = Instant::now();
        let output_path = self.output_path_for(input_path);
        let config = self.cli.config();

        self.stage(index, input_path, Stage::Load);
        // Checked on the header so oversized images are never decoded
        let (width, height) = read_dimensions(input_path)?;
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(invalid_parameter(
                "depth image",
                &format!("{width}x{height}"),
                &format!("sides must not exceed {MAX_IMAGE_DIMENSION} pixels"),
            ));
        }
        let depth_image = load_pixel_buffer(input_path)?;
        let (width, height) = depth_image.dimensions();
        let depth = DepthMap::from_buffer(&depth_image);
        if !depth.has_relief() {
            log::warn!(
                "{}: depth map is flat, the stereogram will show no shape",
                input_path.display()
            );
        }
        log::debug!(
            "{}: columns shift by at most {} pixels",
            input_path.display(),
            max_shift(config.separation, config.depth_strength)
        );
        if config.separation >= width {
            log::warn!(
                "{}: separation {} is not below the width {width}, no depth will be encoded",
                input_path.display(),
                config.separation
            );
        }

        self.stage(index, input_path, Stage::Pattern);
        let mut rng = self.noise_for(index).rng();
        let pattern = build_tile(config.separation, height, template, &mut rng)?;

        self.stage(index, input_path, Stage::Compose);
        let stereogram = compose(
            &depth,
            config.separation,
            config.depth_strength,
            Some(&pattern),
        )?;

        self.stage(index, input_path, Stage::Save);
        save_pixel_buffer(&stereogram, &output_path)?;

        log::info!(
            "{} -> {} in {:.2?}",
            input_path.display(),
            output_path.display(),
            start_time.elapsed()
        );
        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    // Each file of a seeded batch gets its own reproducible stream
    fn noise_for(&self, index: usize) -> NoiseSource {
        match self.cli.noise() {
            NoiseSource::Seeded(seed) => NoiseSource::Seeded(seed.wrapping_add(index as u64)),
            NoiseSource::Entropy => NoiseSource::Entropy,
        }
    }

    fn stage(&mut self, index: usize, path: &Path, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_stage(index, path, stage);
        }
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            OUTPUT_EXTENSION
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
