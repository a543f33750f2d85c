//! Package staging and archiving.
//!
//! Every packaging call gets its own uniquely named staging directory under
//! the configured temporary root. The icons and `website.json` are copied in,
//! the manifest and signature are produced next to them, and the directory is
//! finally zipped into `<staging dir>.zip` with a fixed set of entry names.
//!
//! Nothing here deletes the staging directory; see [`crate::cleanup`].

use crate::config::{IconSet, ICONSET_DIR};
use crate::manifest::{package_entries, WEBSITE_FILE};
use crate::{Error, Result};
use log::debug;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name prefix of every staging directory and archive this crate creates.
pub const STAGING_PREFIX: &str = "pushPackage_";

/// ZIP compression level for package archives.
///
/// # Examples
///
/// ```
/// use pushpkg::package::CompressionLevel;
///
/// let stored = CompressionLevel::NONE;
/// assert_eq!(stored.level(), 0);
///
/// // Values above 9 are clamped
/// assert_eq!(CompressionLevel::new(42).level(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression (level 0); entries are stored.
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default compression (level 6).
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Maximum compression (level 9).
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9.
    ///
    /// Values greater than 9 are clamped to 9.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    /// Returns the compression level value (0-9).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }

    fn file_options(self) -> SimpleFileOptions {
        let options = if self.0 == 0 {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(self.0)))
        };
        options
            .unix_permissions(0o644)
            .last_modified_time(zip::DateTime::default())
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

/// Create a fresh, uniquely named staging directory under `temp_root`.
///
/// The name is `pushPackage_<uuid>`. An already existing directory at that
/// path is accepted.
///
/// # Errors
///
/// Returns [`Error::StagingDirectory`] if the root or the directory cannot be created.
pub fn create_staging_directory(temp_root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(temp_root).map_err(|source| Error::StagingDirectory {
        path: temp_root.to_path_buf(),
        source,
    })?;

    let path = temp_root.join(format!("{}{}", STAGING_PREFIX, Uuid::new_v4().simple()));
    create_dir_idempotent(&path)?;

    debug!("created staging directory {}", path.display());
    Ok(path)
}

fn create_dir_idempotent(path: &Path) -> Result<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(source) => Err(Error::StagingDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Copy the icons into `icon.iconset/` and write `website.json`.
///
/// # Errors
///
/// - [`Error::StagingDirectory`] if `icon.iconset/` cannot be created
/// - [`Error::IconCopy`] naming the source icon that failed
/// - [`Error::WriteFile`] if `website.json` cannot be written
pub fn stage_files(staging_dir: &Path, icons: &IconSet, website_json: &[u8]) -> Result<()> {
    let iconset = staging_dir.join(ICONSET_DIR);
    create_dir_idempotent(&iconset)?;

    for (slot, source) in icons.iter() {
        let target = iconset.join(slot.file_name());
        fs::copy(source, &target).map_err(|e| Error::IconCopy {
            path: source.to_path_buf(),
            source: e,
        })?;
        debug!("staged {} from {}", slot.package_path(), source.display());
    }

    let path = staging_dir.join(WEBSITE_FILE);
    fs::write(&path, website_json).map_err(|source| Error::WriteFile { path, source })?;

    Ok(())
}

/// Path of the archive for `staging_dir`: the same path with `.zip` appended.
pub fn archive_path_for(staging_dir: &Path) -> PathBuf {
    let mut name = OsString::from(staging_dir.as_os_str());
    name.push(".zip");
    PathBuf::from(name)
}

/// Zip the package entries of `staging_dir` into `<staging_dir>.zip`.
///
/// Entries are written under their relative names in required-file order,
/// followed by `manifest.json` and `signature`. No directory entries are
/// written. On failure the partial archive is removed.
///
/// # Errors
///
/// - [`Error::ArchiveCreate`] if the output file cannot be created
/// - [`Error::ArchiveEntry`] if an entry cannot be read or written
/// - [`Error::ArchiveFinish`] if the central directory cannot be written
pub fn create_archive(staging_dir: &Path, compression_level: CompressionLevel) -> Result<PathBuf> {
    let archive_path = archive_path_for(staging_dir);

    let file = File::create(&archive_path).map_err(|source| Error::ArchiveCreate {
        path: archive_path.clone(),
        source,
    })?;

    match write_entries(ZipWriter::new(file), staging_dir, compression_level) {
        Ok(()) => Ok(archive_path),
        Err(e) => {
            let _ = fs::remove_file(&archive_path);
            Err(e)
        }
    }
}

fn write_entries(
    mut zip: ZipWriter<File>,
    staging_dir: &Path,
    compression_level: CompressionLevel,
) -> Result<()> {
    let options = compression_level.file_options();

    for name in package_entries() {
        let entry_error = |source: ZipError| Error::ArchiveEntry {
            name: name.to_string(),
            source,
        };

        let data = fs::read(staging_dir.join(name)).map_err(|e| entry_error(ZipError::Io(e)))?;

        zip.start_file(name, options).map_err(entry_error)?;
        zip.write_all(&data)
            .map_err(|e| entry_error(ZipError::Io(e)))?;

        debug!("archived {name} ({} bytes)", data.len());
    }

    zip.finish().map_err(Error::ArchiveFinish)?;
    Ok(())
}
