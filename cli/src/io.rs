use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use image_batcher_core::format::{OutputFormat, SourceFormat};

use crate::error::BatchError;

/// Collect the PNG/JPEG files directly inside `input`, sorted by file name.
///
/// Subdirectories and files with other extensions are skipped.
pub fn collect_images(input: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !input.is_dir() {
        return Err(BatchError::ReadFile {
            path: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if SourceFormat::from_path(&path).is_some() {
            files.push(path);
        } else {
            log::debug!("Skipping {}: not a PNG or JPEG file", path.display());
        }
    }

    Ok(files)
}

/// `output_dir/<stem>.<ext>` for a source file.
pub fn output_path(output_dir: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    // Only the last extension goes; `my.holiday.png` keeps `my.holiday`
    let mut name = source.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(format.extension());
    output_dir.join(name)
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), BatchError> {
    fs::create_dir_all(dir).map_err(|e| BatchError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Read file contents.
pub fn read_file(path: &Path) -> Result<Vec<u8>, BatchError> {
    fs::read(path).map_err(|e| BatchError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write file contents, replacing any existing file.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), BatchError> {
    fs::write(path, data).map_err(|e| BatchError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
