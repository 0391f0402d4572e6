//! Archive validation and extraction
//!
//! Artifacts are zip archives. Extraction is split in two so a malformed
//! download can be told apart from a local I/O failure while writing it out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The archive itself is malformed or unsafe.
    #[error("{0}")]
    Corrupt(String),

    /// Writing the extracted content failed.
    #[error("{message} ({path}): {source}")]
    Io {
        path: PathBuf,
        message: &'static str,
        #[source]
        source: io::Error,
    },
}

pub trait ArchiveExtractor: Send + Sync {
    /// Check that the archive at `archive` is well-formed without writing anything.
    fn validate(&self, archive: &Path) -> Result<(), ExtractError>;

    /// Extract the archive at `archive` into the existing directory `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    fn open(archive: &Path) -> Result<zip::ZipArchive<fs::File>, ExtractError> {
        let file = fs::File::open(archive).map_err(|source| ExtractError::Io {
            path: archive.to_path_buf(),
            message: "Failed to open archive",
            source,
        })?;
        zip::ZipArchive::new(file)
            .map_err(|e| ExtractError::Corrupt(format!("not a valid zip archive: {e}")))
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn validate(&self, archive: &Path) -> Result<(), ExtractError> {
        let mut zip = Self::open(archive)?;
        for i in 0..zip.len() {
            let entry = zip
                .by_index_raw(i)
                .map_err(|e| ExtractError::Corrupt(format!("unreadable entry {i}: {e}")))?;
            if entry.enclosed_name().is_none() {
                return Err(ExtractError::Corrupt(format!(
                    "entry '{}' escapes the extraction directory",
                    entry.name()
                )));
            }
        }
        Ok(())
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        let mut zip = Self::open(archive)?;

        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| ExtractError::Corrupt(format!("unreadable entry {i}: {e}")))?;

            let relative = entry.enclosed_name().ok_or_else(|| {
                ExtractError::Corrupt(format!(
                    "entry '{}' escapes the extraction directory",
                    entry.name()
                ))
            })?;
            let outpath = dest.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&outpath).map_err(|source| ExtractError::Io {
                    path: outpath.clone(),
                    message: "Failed to create directory",
                    source,
                })?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).map_err(|source| ExtractError::Io {
                    path: parent.to_path_buf(),
                    message: "Failed to create parent directory",
                    source,
                })?;
            }

            let mut outfile = fs::File::create(&outpath).map_err(|source| ExtractError::Io {
                path: outpath.clone(),
                message: "Failed to create file",
                source,
            })?;

            // Decompression and CRC failures surface as InvalidData while copying.
            io::copy(&mut entry, &mut outfile).map_err(|source| {
                if source.kind() == io::ErrorKind::InvalidData {
                    ExtractError::Corrupt(format!("entry '{}' is damaged: {source}", entry.name()))
                } else {
                    ExtractError::Io {
                        path: outpath.clone(),
                        message: "Failed to write file",
                        source,
                    }
                }
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).ok();
                }
            }
        }

        Ok(())
    }
}
