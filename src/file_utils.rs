use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::subtitle::SubtitleFormat;

// @module: File and subtitle-format detection utilities

// How many bytes of a file the content sniffer looks at
const SNIFF_LENGTH: usize = 512;

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Detect the subtitle format of a file from its extension, falling
    /// back to sniffing the first bytes of content when the extension is
    /// missing or ambiguous (`.xml` can be TTML or Transcript v3).
    pub fn detect_subtitle_format<P: AsRef<Path>>(path: P) -> Result<SubtitleFormat> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "srt" => return Ok(SubtitleFormat::SubRip),
                "vtt" => return Ok(SubtitleFormat::WebVtt),
                "ttml" | "dfxp" => return Ok(SubtitleFormat::Ttml),
                "srv3" => return Ok(SubtitleFormat::Transcript3),
                _ => {}
            }
        }

        // Fall back to examining file contents
        let head = Self::read_head(path)?;
        Self::sniff_format(&head)
            .ok_or_else(|| anyhow::anyhow!("Unrecognized subtitle format: {:?}", path))
    }

    /// Find all files with a recognized subtitle extension under a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "vtt" | "ttml" | "dfxp" | "srv3" | "xml") {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }

    fn read_head(path: &Path) -> Result<String> {
        let mut file = fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;
        let mut buffer = vec![0u8; SNIFF_LENGTH];
        let read = file.read(&mut buffer)?;
        buffer.truncate(read);

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn sniff_format(head: &str) -> Option<SubtitleFormat> {
        let head = head.trim_start_matches('\u{feff}').trim_start();

        if head.starts_with("WEBVTT") {
            return Some(SubtitleFormat::WebVtt);
        }
        if head.contains("<timedtext") {
            return Some(SubtitleFormat::Transcript3);
        }
        if head.contains("<tt") {
            return Some(SubtitleFormat::Ttml);
        }
        // SRT files open with a bare index line followed by a timestamp range
        if head.contains("-->") && head.contains(',') {
            return Some(SubtitleFormat::SubRip);
        }

        None
    }
}
