/// Moves media files into `YYYY-MM-DD` subdirectories.
///
/// The organizer lists the immediate entries of a directory, asks the matcher
/// registry which date folder each file belongs in, creates that folder when it is
/// missing and renames the file into it. Problems with a single file are logged and
/// recorded in the [`RunReport`]; only problems with the directory itself abort the run.
use crate::config::{CompiledFilters, ConfigError};
use crate::matcher::Registry;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The input path does not exist or is not a directory.
    #[error("Invalid directory {}: {reason}", path.display())]
    InvalidInputPath { path: PathBuf, reason: String },
    /// The input directory could not be enumerated.
    #[error("Failed to read directory {}: {source}", path.display())]
    DirectoryListingFailed { path: PathBuf, source: io::Error },
    /// A date folder could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Something already exists where the file would be moved.
    #[error("Destination file {file_name:?} already exists in {}", directory.display())]
    DestinationCollision {
        file_name: String,
        directory: PathBuf,
    },
    /// Renaming the file failed.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl OrganizeError {
    /// True for errors that only concern a single file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::DestinationCollision { .. } | Self::FileMoveFailure { .. }
        )
    }
}

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A file placed (or, in a dry run, to be placed) in its date folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedFile {
    pub file_name: String,
    pub folder: String,
    pub destination: PathBuf,
}

/// A file whose rename failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMove {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one organizer run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub base_path: PathBuf,
    pub dry_run: bool,
    pub moved: Vec<PlacedFile>,
    pub unrecognized: Vec<String>,
    pub collisions: Vec<String>,
    pub failed: Vec<FailedMove>,
    pub excluded: usize,
}

impl RunReport {
    fn new(base_path: &Path, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            base_path: base_path.to_path_buf(),
            dry_run,
            moved: Vec::new(),
            unrecognized: Vec::new(),
            collisions: Vec::new(),
            failed: Vec::new(),
            excluded: 0,
        }
    }

    /// Number of files left in place because of a per-file problem.
    pub fn skipped(&self) -> usize {
        self.unrecognized.len() + self.collisions.len() + self.failed.len()
    }
}

/// Checks that `path` exists and is a directory.
pub fn validate_directory(path: &Path) -> OrganizeResult<()> {
    let metadata = fs::metadata(path).map_err(|e| OrganizeError::InvalidInputPath {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(OrganizeError::InvalidInputPath {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}

/// Organizes the files of one directory into date folders.
pub struct DateOrganizer<'a> {
    registry: &'a Registry,
    filters: &'a CompiledFilters,
    dry_run: bool,
}

impl<'a> DateOrganizer<'a> {
    pub fn new(registry: &'a Registry, filters: &'a CompiledFilters) -> Self {
        Self {
            registry,
            filters,
            dry_run: false,
        }
    }

    /// In a dry run nothing is created or moved.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Organizes every recognised file directly inside `base_path`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be listed or a date folder cannot be created.
    /// Unrecognised names, collisions and failed renames are recorded in the
    /// returned report instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use datetidy::config::CompiledFilters;
    /// use datetidy::file_organizer::DateOrganizer;
    /// use datetidy::matcher::Registry;
    /// use std::path::Path;
    ///
    /// let filters = CompiledFilters::default();
    /// let report = DateOrganizer::new(Registry::global(), &filters)
    ///     .organize(Path::new("/path/to/camera"))
    ///     .unwrap();
    /// println!("moved {} files", report.moved.len());
    /// ```
    pub fn organize(&self, base_path: &Path) -> OrganizeResult<RunReport> {
        let mut report = RunReport::new(base_path, self.dry_run);

        for file_name in list_files(base_path)? {
            let file_path = base_path.join(&file_name);
            if !self.filters.should_include(&file_path) {
                debug!("Excluded by filters: {}", file_path.display());
                report.excluded += 1;
                continue;
            }

            let Some(name) = file_name.to_str() else {
                warn!("No matcher found for {:?}", file_name);
                report
                    .unrecognized
                    .push(file_name.to_string_lossy().into_owned());
                continue;
            };

            let folder = match self.registry.capture_date(name) {
                Ok((matcher, date)) => {
                    debug!("{} matched {} ({})", name, matcher.name(), date);
                    date.folder_name()
                }
                Err(e) => {
                    warn!("{}", e);
                    report.unrecognized.push(name.to_string());
                    continue;
                }
            };

            match self.place_file(base_path, name, &folder) {
                Ok(placed) => report.moved.push(placed),
                Err(e @ OrganizeError::DestinationCollision { .. }) => {
                    warn!("{}", e);
                    report.collisions.push(name.to_string());
                }
                Err(e @ OrganizeError::FileMoveFailure { .. }) => {
                    error!("{}", e);
                    report.failed.push(FailedMove {
                        file_name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Moves `base_path/file_name` into `base_path/folder_name/`.
    ///
    /// The folder is created when missing. Nothing is overwritten: if the
    /// destination already exists the file stays where it is.
    pub fn place_file(
        &self,
        base_path: &Path,
        file_name: &str,
        folder_name: &str,
    ) -> OrganizeResult<PlacedFile> {
        let folder_path = base_path.join(folder_name);
        let destination = folder_path.join(file_name);

        if !self.dry_run && !folder_path.exists() {
            create_date_folder(&folder_path)?;
        }

        // symlink_metadata so a dangling link still counts as occupied
        if fs::symlink_metadata(&destination).is_ok() {
            return Err(OrganizeError::DestinationCollision {
                file_name: file_name.to_string(),
                directory: folder_path,
            });
        }

        if self.dry_run {
            info!("Would move {} -> {}/", file_name, folder_name);
        } else {
            let source = base_path.join(file_name);
            fs::rename(&source, &destination).map_err(|e| OrganizeError::FileMoveFailure {
                from: source,
                to: destination.clone(),
                source: e,
            })?;
            info!("Moved {} -> {}/", file_name, folder_name);
        }

        Ok(PlacedFile {
            file_name: file_name.to_string(),
            folder: folder_name.to_string(),
            destination,
        })
    }
}

/// Lists the names of all non-directory entries, sorted.
fn list_files(base_path: &Path) -> OrganizeResult<Vec<OsString>> {
    let listing_failed = |source: io::Error| OrganizeError::DirectoryListingFailed {
        path: base_path.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(base_path).map_err(listing_failed)? {
        let entry = entry.map_err(listing_failed)?;
        if !entry.file_type().map_err(listing_failed)?.is_dir() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    Ok(names)
}

#[cfg(unix)]
fn create_date_folder(path: &Path) -> OrganizeResult<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .mode(0o700)
        .create(path)
        .map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(not(unix))]
fn create_date_folder(path: &Path) -> OrganizeResult<()> {
    fs::create_dir(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
