//! Shared mask/alpha memoization.
//!
//! Mask composites typically reuse a small set of overlay files across many
//! sessions — the same vignette mask applied to every image in a batch.
//! Decoding those files once per session wastes the bulk of the composite's
//! cost, so the [`Studio`](crate::session::Studio) owns one [`OverlayCache`]
//! and every session it creates shares it.
//!
//! # Design
//!
//! The cache is keyed by source file path. Lookup and insert form a single
//! critical section under a mutex, so two sessions racing on the same path
//! in a threaded host cannot decode it twice; the second caller blocks
//! until the first insert lands and then takes the shared handle.
//!
//! Entries are never evicted or invalidated. A cached overlay goes stale if
//! the underlying file changes on disk — acceptable for overlay assets,
//! which are immutable in practice. Hosts that edit overlays mid-run should
//! create a fresh studio.
//!
//! Hit/miss counters are kept alongside the entries and exposed as
//! [`CacheStats`] for batch reporting.

use crate::backend::{BackendError, RenderBackend};
use image::DynamicImage;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Path-keyed store of decoded overlay images.
#[derive(Debug, Default)]
pub struct OverlayCache {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<PathBuf, Arc<DynamicImage>>,
    stats: CacheStats,
}

impl OverlayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the decoded overlay for `path`, decoding and inserting on
    /// first use.
    ///
    /// The decode runs inside the critical section; that serializes cold
    /// loads of distinct paths too, which is the price of the no-duplicate
    /// guarantee. A failed decode inserts nothing, so the next call
    /// retries.
    pub fn get_or_load(
        &self,
        path: &Path,
        backend: &impl RenderBackend,
    ) -> Result<Arc<DynamicImage>, BackendError> {
        let mut inner = self.lock();
        if let Some(found) = inner.entries.get(path) {
            let found = Arc::clone(found);
            inner.stats.hits += 1;
            debug!(path = %path.display(), "overlay cache hit");
            return Ok(found);
        }

        let decoded = Arc::new(backend.decode_path(path)?);
        inner.stats.misses += 1;
        debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "overlay decoded and cached"
        );
        inner
            .entries
            .insert(path.to_path_buf(), Arc::clone(&decoded));
        Ok(decoded)
    }

    /// Whether `path` has been decoded into the cache.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked holder leaves the map consistent: inserts happen only
        // after a decode completes, in one statement.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Summary of cache performance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} decoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} decoded", self.misses)
        }
    }
}
