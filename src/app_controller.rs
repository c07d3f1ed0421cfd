use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle::{self, SubtitleFormat};

// @module: Application controller for subtitle conversion

/// Main application controller for subtitle normalization
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Convert one subtitle file to the configured output path.
    ///
    /// The output is written to a temp file in the destination directory
    /// and moved over the target only when the conversion succeeds, so a
    /// failed run never leaves a half-written file behind.
    pub fn run(
        &self,
        input_file: PathBuf,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
        format_override: Option<SubtitleFormat>,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = match output_path {
            Some(path) => path,
            None => input_file.with_extension(self.config.output_format.extension()),
        };

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, output already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(());
        }

        let format = match format_override {
            Some(format) => format,
            None => {
                let detected = FileManager::detect_subtitle_format(&input_file)?;
                debug!("Detected {} input: {:?}", detected.display_name(), input_file);
                detected
            }
        };

        if format == SubtitleFormat::SubRip {
            // already the target format; conversion is a no-op
            info!("Input is already SubRip, nothing to convert: {:?}", input_file);
            return Ok(());
        }

        if !self.convert_to_path(&input_file, format, &output_path)? {
            return Err(anyhow!("Conversion failed for {:?}", input_file));
        }

        info!(
            "Converted {:?} -> {:?} in {} ms",
            input_file,
            output_path,
            start_time.elapsed().as_millis()
        );
        Ok(())
    }

    /// Convert every recognized subtitle file under a directory.
    ///
    /// Failures are logged per file; the batch keeps going.
    pub fn run_folder(
        &self,
        input_dir: PathBuf,
        force_overwrite: bool,
        format_override: Option<SubtitleFormat>,
    ) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(&input_dir)?;
        if files.is_empty() {
            warn!("No subtitle files found in {:?}", input_dir);
            return Ok(());
        }

        let mut converted = 0;
        for file in &files {
            match self.run(file.clone(), None, force_overwrite, format_override) {
                Ok(()) => converted += 1,
                Err(e) => error!("Error processing {:?}: {}", file, e),
            }
        }

        info!("Finished processing {}/{} files", converted, files.len());
        Ok(())
    }

    /// Convert a freshly-downloaded subtitle file in place.
    ///
    /// The original file is only replaced when parsing and writing both
    /// succeed. With `delete_on_fail`, a failed conversion also removes
    /// the source file (the download is useless without conversion).
    /// Returns whether the file was parsed and written correctly.
    pub fn convert_in_place(&self, subtitle_path: &Path, delete_on_fail: bool) -> Result<bool> {
        let format = match FileManager::detect_subtitle_format(subtitle_path) {
            Ok(format) => format,
            Err(e) => {
                if delete_on_fail {
                    let _ = std::fs::remove_file(subtitle_path);
                }
                return Err(e);
            }
        };

        if format == SubtitleFormat::SubRip {
            return Ok(true); // already the target format
        }

        let ok = self.convert_to_path(subtitle_path, format, subtitle_path)?;
        if !ok && delete_on_fail {
            warn!("Removing unconvertible subtitle file: {:?}", subtitle_path);
            let _ = std::fs::remove_file(subtitle_path);
        }

        Ok(ok)
    }

    // Convert source -> temp file next to the target, then replace the
    // target atomically on success. The temp file is cleaned up on every
    // failure path by its own drop.
    fn convert_to_path(
        &self,
        input_file: &Path,
        format: SubtitleFormat,
        output_path: &Path,
    ) -> Result<bool> {
        let output_dir = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        FileManager::ensure_dir(output_dir)?;

        let source = File::open(input_file)
            .with_context(|| format!("Failed to open subtitle file: {:?}", input_file))?;

        let mut temp = NamedTempFile::new_in(output_dir)
            .context("Failed to create temporary conversion file")?;

        let ok = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let ok = subtitle::convert(
                source,
                format,
                &mut writer,
                self.config.output_format.is_subrip(),
                self.config.timestamp_parsing,
                self.config.language_filter.as_deref(),
                self.config.detect_youtube_duplicates,
                self.config.ignore_empty_frames,
            );
            writer.flush()?;
            ok
        };

        if ok {
            temp.persist(output_path)
                .with_context(|| format!("Failed to move converted file to {:?}", output_path))?;
        }

        Ok(ok)
    }
}
