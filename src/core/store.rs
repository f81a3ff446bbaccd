//! Storage abstraction for source discovery and index output.
//!
//! The scanner and index writer only talk to a [`FileStore`], so the whole
//! pipeline can run against an in-memory tree in tests.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use walkdir::WalkDir;

pub trait FileStore: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write `contents`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// True for existing files and directories.
    fn exists(&self, path: &Path) -> bool;

    /// Regular files below `dir`, recursively, sorted by path.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// The local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileStore {
    pub verbose: bool,
}

impl OsFileStore {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl FileStore for OsFileStore {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(anyhow!("Directory not found: {}", dir.display()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    if self.verbose {
                        eprintln!("Warning: Cannot access path: {}", e);
                    }
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// In-memory store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `(path, contents)` pairs.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, contents)| (path.into(), contents.into()))
            .collect();
        Self {
            files: Mutex::new(files),
        }
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileStore for MemoryFileStore {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("Failed to read file: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.lock().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().keys().any(|p| p.starts_with(path))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let files: Vec<PathBuf> = self
            .lock()
            .keys()
            .filter(|p| p.starts_with(dir) && p.as_path() != dir)
            .cloned()
            .collect();
        if files.is_empty() {
            return Err(anyhow!("Directory not found: {}", dir.display()));
        }
        Ok(files)
    }
}
