// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Storage backends for badge artifacts.
//!
//! The manager only talks to [`ArtifactStore`], keyed by pull request number
//! and file name. [`FsArtifactStore`] persists to
//! `{base}/pr/{number}/{file}`; [`MemoryArtifactStore`] keeps bytes in memory
//! for tests and dry runs.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError}
};

use serde::Serialize;
use tracing::debug;

use crate::{
    config::PrBadgeConfig,
    error::{self, Error}
};

/// Location and size of a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    /// File name inside the PR directory.
    pub file_name: String,
    /// Full path of the artifact.
    pub path:      PathBuf,
    /// Size in bytes as reported after writing.
    pub size:      u64
}

/// Persistence boundary used by [`PrBadgeManager`](crate::PrBadgeManager).
pub trait ArtifactStore: Send + Sync {
    /// Location of a pull request's artifacts.
    fn pr_location(&self, pr_number: u64) -> PathBuf;

    /// Makes sure the pull request location exists.
    fn prepare(&self, pr_number: u64) -> Result<PathBuf, Error>;

    /// Writes one artifact and reports its stored size.
    fn write(
        &self,
        pr_number: u64,
        file_name: &str,
        contents: &[u8]
    ) -> Result<StoredArtifact, Error>;

    /// Lists artifacts sorted by file name; a missing location lists nothing.
    fn list(&self, pr_number: u64) -> Result<Vec<StoredArtifact>, Error>;

    /// Removes the whole pull request location.
    ///
    /// Returns `false` when there was nothing to remove.
    fn remove_pr(&self, pr_number: u64) -> Result<bool, Error>;
}

/// Filesystem store rooted at the configured output base path.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    base_path:      PathBuf,
    directory_mode: u32,
    file_mode:      u32
}

impl FsArtifactStore {
    /// Creates a store with explicit permission bits.
    pub fn new(base_path: impl Into<PathBuf>, directory_mode: u32, file_mode: u32) -> Self {
        Self {
            base_path: base_path.into(),
            directory_mode,
            file_mode
        }
    }

    /// Creates a store from the manager configuration.
    pub fn from_config(config: &PrBadgeConfig) -> Self {
        Self::new(&config.output_base_path, config.directory_mode, config.file_mode)
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[cfg(unix)]
    fn apply_mode(&self, path: &Path, mode: u32) -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|source| error::badge_io_error(path, source))
    }

    #[cfg(not(unix))]
    fn apply_mode(&self, _path: &Path, _mode: u32) -> Result<(), Error> {
        Ok(())
    }
}

impl ArtifactStore for FsArtifactStore {
    fn pr_location(&self, pr_number: u64) -> PathBuf {
        self.base_path.join("pr").join(pr_number.to_string())
    }

    fn prepare(&self, pr_number: u64) -> Result<PathBuf, Error> {
        let directory = self.pr_location(pr_number);
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.directory_mode);
        }
        builder
            .create(&directory)
            .map_err(|source| error::badge_io_error(&directory, source))?;
        self.apply_mode(&directory, self.directory_mode)?;
        debug!("prepared badge directory {}", directory.display());
        Ok(directory)
    }

    fn write(
        &self,
        pr_number: u64,
        file_name: &str,
        contents: &[u8]
    ) -> Result<StoredArtifact, Error> {
        let path = self.pr_location(pr_number).join(file_name);
        let file = File::create(&path).map_err(|source| error::badge_io_error(&path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents)
            .map_err(|source| error::badge_io_error(&path, source))?;
        writer
            .flush()
            .map_err(|source| error::badge_io_error(&path, source))?;
        drop(writer);
        self.apply_mode(&path, self.file_mode)?;

        let metadata = fs::metadata(&path).map_err(|source| error::badge_io_error(&path, source))?;
        Ok(StoredArtifact {
            file_name: file_name.to_owned(),
            path,
            size: metadata.len()
        })
    }

    fn list(&self, pr_number: u64) -> Result<Vec<StoredArtifact>, Error> {
        let directory = self.pr_location(pr_number);
        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(error::badge_io_error(&directory, source))
        };

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| error::badge_io_error(&directory, source))?;
            let path = entry.path();
            let metadata = entry
                .metadata()
                .map_err(|source| error::badge_io_error(&path, source))?;
            if !metadata.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            artifacts.push(StoredArtifact {
                file_name,
                path,
                size: metadata.len()
            });
        }

        artifacts.sort_by(|left, right| left.file_name.cmp(&right.file_name));
        Ok(artifacts)
    }

    fn remove_pr(&self, pr_number: u64) -> Result<bool, Error> {
        let directory = self.pr_location(pr_number);
        match fs::remove_dir_all(&directory) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(error::badge_io_error(&directory, source))
        }
    }
}

/// In-memory store keyed by pull request number and file name.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<BTreeMap<u64, BTreeMap<String, Vec<u8>>>>
}

impl MemoryArtifactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes stored for an artifact.
    pub fn contents(&self, pr_number: u64, file_name: &str) -> Option<Vec<u8>> {
        let artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        artifacts
            .get(&pr_number)
            .and_then(|files| files.get(file_name))
            .cloned()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn pr_location(&self, pr_number: u64) -> PathBuf {
        PathBuf::from("pr").join(pr_number.to_string())
    }

    fn prepare(&self, pr_number: u64) -> Result<PathBuf, Error> {
        let mut artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        artifacts.entry(pr_number).or_default();
        Ok(self.pr_location(pr_number))
    }

    fn write(
        &self,
        pr_number: u64,
        file_name: &str,
        contents: &[u8]
    ) -> Result<StoredArtifact, Error> {
        let mut artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        artifacts
            .entry(pr_number)
            .or_default()
            .insert(file_name.to_owned(), contents.to_vec());
        Ok(StoredArtifact {
            file_name: file_name.to_owned(),
            path:      self.pr_location(pr_number).join(file_name),
            size:      contents.len() as u64
        })
    }

    fn list(&self, pr_number: u64) -> Result<Vec<StoredArtifact>, Error> {
        let artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        let location = self.pr_location(pr_number);
        Ok(artifacts
            .get(&pr_number)
            .map(|files| {
                files
                    .iter()
                    .map(|(file_name, contents)| StoredArtifact {
                        file_name: file_name.clone(),
                        path:      location.join(file_name),
                        size:      contents.len() as u64
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn remove_pr(&self, pr_number: u64) -> Result<bool, Error> {
        let mut artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(artifacts.remove(&pr_number).is_some())
    }
}
