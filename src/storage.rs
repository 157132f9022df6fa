//! Storage trait for reading dataset files
//!
//! A dictionary dataset is a flat namespace of named byte blobs: one
//! `"index"` file plus shard files named with lowercase 3-hex-digit
//! zero-padded shard indexes (`"000"`..`"fff"`). The dataset is immutable
//! once built, so the capability consumed here is read-only and
//! synchronous; any concrete backend (local files, embedded archive,
//! remote blob store) implements the one-method [`StorageRead`] trait.
//!
//! ## Implementations
//!
//! - [`MemoryStorage`]: HashMap-backed, for unit tests and embedded data
//! - [`FileStorage`]: one dataset directory on the local filesystem

use crate::error::{Error, Result};
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

/// Name of the term index file within a dataset.
pub const INDEX_NAME: &str = "index";

// ============================================================================
// Core Trait
// ============================================================================

/// Read-only access to dataset files by name.
///
/// Returns `Error::NotFound` if no file exists under `name`, and
/// `Error::Storage` for any other backend failure. Implementations must be
/// safe for unsynchronized concurrent reads; the runtime calls this from
/// multiple query threads.
pub trait StorageRead: Debug + Send + Sync {
    /// Read the raw bytes of the named dataset file.
    fn read_bytes(&self, name: &str) -> Result<Vec<u8>>;
}

// ============================================================================
// MemoryStorage Implementation
// ============================================================================

/// A simple in-memory storage for testing
///
/// Stores files in a HashMap with interior mutability (via
/// `Arc<RwLock<...>>`) so fixtures can be inserted through shared clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<std::collections::HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file at the given name
    ///
    /// Note: This method takes `&self` (not `&mut self`) due to interior
    /// mutability.
    pub fn insert(&self, name: impl Into<String>, data: Vec<u8>) {
        self.data
            .write()
            .expect("RwLock poisoned")
            .insert(name.into(), data);
    }
}

impl StorageRead for MemoryStorage {
    fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.data
            .read()
            .expect("RwLock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name))
    }
}

// ============================================================================
// FileStorage Implementation
// ============================================================================

/// File-based storage reading one dataset directory from disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory holding the index and shard files
    base_path: std::path::PathBuf,
}

impl FileStorage {
    /// Create a new file storage rooted at the given dataset directory.
    pub fn new(base_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path for this storage
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Resolve a dataset file name to a path under the base directory.
    ///
    /// Dataset names are flat identifiers, never paths: absolute names and
    /// anything with a separator or `..` component is rejected.
    fn resolve_name(&self, name: &str) -> Result<std::path::PathBuf> {
        use std::path::Component;
        let p = std::path::Path::new(name);

        let mut components = p.components();
        let valid = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();
        if !valid {
            return Err(Error::storage(format!(
                "invalid dataset file name '{}': must be a bare file name",
                name
            )));
        }

        Ok(self.base_path.join(p))
    }
}

impl StorageRead for FileStorage {
    fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve_name(name)?;
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(format!("{}: {}", name, path.display()))
            } else {
                Error::storage(format!("failed to read {}: {}", path.display(), e))
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
