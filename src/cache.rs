use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::error::{ExplorerError, ExplorerResult};

/// Default number of datasets kept in memory.
pub const DEFAULT_CAPACITY: usize = 4;

// ---------------------------------------------------------------------------
// DatasetCache – explicit, bounded cache of loaded datasets
// ---------------------------------------------------------------------------

/// Least-recently-used cache of loaded datasets, keyed by the path they were
/// loaded from.
///
/// Owned by the caller and passed where needed. Entries only leave through
/// eviction, [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
/// Failed loads are never cached.
pub struct DatasetCache {
    capacity: usize,
    /// Most recently used at the back.
    entries: Mutex<VecDeque<(PathBuf, Arc<Dataset>)>>,
    loader: fn(&Path) -> ExplorerResult<Dataset>,
}

impl DatasetCache {
    pub fn with_capacity(capacity: usize) -> ExplorerResult<Self> {
        Self::with_loader(capacity, load_file)
    }

    /// A cache that loads through `loader` instead of [`load_file`].
    pub fn with_loader(
        capacity: usize,
        loader: fn(&Path) -> ExplorerResult<Dataset>,
    ) -> ExplorerResult<Self> {
        if capacity == 0 {
            return Err(ExplorerError::InvalidArgument(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        Ok(DatasetCache {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            loader,
        })
    }

    /// Return the dataset for `path`, loading it on a miss.
    ///
    /// The lock is held across the load so concurrent callers asking for the
    /// same path share one load and one entry.
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> ExplorerResult<Arc<Dataset>> {
        let path = path.as_ref();
        let mut entries = self.lock();

        if let Some(pos) = entries.iter().position(|(p, _)| p == path) {
            if let Some(entry) = entries.remove(pos) {
                let dataset = Arc::clone(&entry.1);
                entries.push_back(entry);
                log::debug!("cache hit for {}", path.display());
                return Ok(dataset);
            }
        }

        log::debug!("cache miss for {}", path.display());
        let dataset = Arc::new((self.loader)(path)?);
        if entries.len() == self.capacity {
            if let Some((evicted, _)) = entries.pop_front() {
                log::debug!("evicting {} from dataset cache", evicted.display());
            }
        }
        entries.push_back((path.to_path_buf(), Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one was present.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mut entries = self.lock();
        match entries.iter().position(|(p, _)| p == path) {
            Some(pos) => {
                entries.remove(pos);
                log::debug!("invalidated cached {}", path.display());
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.lock().iter().any(|(p, _)| p == path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while loading leaves the deque itself consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<(PathBuf, Arc<Dataset>)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        DatasetCache {
            capacity: DEFAULT_CAPACITY,
            entries: Mutex::new(VecDeque::with_capacity(DEFAULT_CAPACITY)),
            loader: load_file,
        }
    }
}
