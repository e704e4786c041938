use crate::error::{ProcessingError, Result};
use crate::models::MeasurementFrame;
use crate::readers::SliceReader;
use crate::utils::constants::CACHE_DELIMITER;
use crate::writers::CsvWriter;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cached copy; the frame will be computed
    Miss,
    /// Cached copy at least as new as every known source
    Fresh,
    /// Cached copy older than one of its sources. It is still used.
    Stale,
}

/// Persists computed frames as comma-separated files, one per key.
///
/// There is no automatic invalidation: a cached frame is returned as long as
/// its file exists. Source files registered with [`with_sources`] are only
/// used to warn when the cached copy is older than its inputs.
///
/// [`with_sources`]: CsvFrameCache::with_sources
pub struct CsvFrameCache {
    dir: PathBuf,
    sources: Vec<PathBuf>,
}

impl CsvFrameCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn status(&self, key: &str) -> Result<CacheStatus> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(CacheStatus::Miss);
        }

        let cached_at = std::fs::metadata(&path)?.modified()?;
        let newest_source = self
            .sources
            .iter()
            .filter_map(|source| modified(source))
            .max();

        Ok(match newest_source {
            Some(source_time) if source_time > cached_at => CacheStatus::Stale,
            _ => CacheStatus::Fresh,
        })
    }

    /// Load the frame cached under `key`, or compute and persist it
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<MeasurementFrame>
    where
        F: FnOnce() -> Result<MeasurementFrame>,
    {
        let path = self.path_for(key);

        match self.status(key)? {
            CacheStatus::Miss => {
                tracing::info!(path = %path.display(), "Cache miss, computing frame");
                let frame = compute()?;
                self.store(key, &frame)?;
                Ok(frame)
            }
            status => {
                if status == CacheStatus::Stale {
                    tracing::warn!(
                        path = %path.display(),
                        "Cached frame is older than its source slices; refresh it to pick up changes"
                    );
                }
                let frame = SliceReader::new()
                    .with_delimiter(CACHE_DELIMITER)
                    .read_frame(&path)?;
                tracing::info!(rows = frame.len(), path = %path.display(), "Loaded cached frame");
                Ok(frame)
            }
        }
    }

    /// Write `frame` under `key`, replacing any previous copy
    pub fn store(&self, key: &str, frame: &MeasurementFrame) -> Result<()> {
        let path = self.path_for(key);
        let file_name = path
            .file_name()
            .ok_or_else(|| ProcessingError::Config(format!("Invalid cache key '{}'", key)))?;
        // Staged next to the target so the rename stays within one directory
        let staging = path.with_file_name(format!(".{}.partial", file_name.to_string_lossy()));

        let written = CsvWriter::new()
            .with_delimiter(CACHE_DELIMITER)
            .write_frame(frame, &staging)
            .and_then(|()| std::fs::rename(&staging, &path).map_err(ProcessingError::from));

        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&staging) {
                tracing::debug!(path = %staging.display(), error = %cleanup, "No staging file to remove");
            }
            return Err(e);
        }

        tracing::info!(rows = frame.len(), path = %path.display(), "Cached frame");
        Ok(())
    }

    /// Remove the cached copy; returns whether one existed
    pub fn invalidate(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "Invalidated cached frame");
        Ok(true)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;
    use tempfile::TempDir;

    fn frame() -> MeasurementFrame {
        MeasurementFrame::from_rows(
            vec!["operator".to_string(), "total_power".to_string()],
            vec![
                vec!["EE".to_string(), "-91.5".to_string()],
                vec!["Three".to_string(), "".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_computes_once_then_loads() -> Result<()> {
        let dir = TempDir::new()?;
        let cache = CsvFrameCache::new(dir.path());
        let calls = Cell::new(0);

        let first = cache.get_or_compute("agg.csv", || {
            calls.set(calls.get() + 1);
            Ok(frame())
        })?;
        assert!(cache.path_for("agg.csv").exists());

        let second = cache.get_or_compute("agg.csv", || {
            calls.set(calls.get() + 1);
            Ok(MeasurementFrame::default())
        })?;

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_compute_error_leaves_no_cache() {
        let dir = TempDir::new().unwrap();
        let cache = CsvFrameCache::new(dir.path());

        let result = cache.get_or_compute("agg.csv", || {
            Err(crate::error::ProcessingError::MissingData("slice".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(cache.status("agg.csv").unwrap(), CacheStatus::Miss);
    }

    #[test]
    fn test_invalidate() -> Result<()> {
        let dir = TempDir::new()?;
        let cache = CsvFrameCache::new(dir.path());

        assert!(!cache.invalidate("agg.csv")?);
        cache.store("agg.csv", &frame())?;
        assert!(cache.invalidate("agg.csv")?);
        assert_eq!(cache.status("agg.csv")?, CacheStatus::Miss);
        Ok(())
    }

    #[test]
    fn test_key_in_subdirectory() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::create_dir(dir.path().join("cache"))?;
        let cache = CsvFrameCache::new(dir.path());

        let first = cache.get_or_compute("cache/agg.csv", || Ok(frame()))?;
        assert!(dir.path().join("cache").join("agg.csv").is_file());
        assert!(!dir.path().join("cache").join(".agg.csv.partial").exists());

        let second = cache.get_or_compute("cache/agg.csv", || Ok(MeasurementFrame::default()))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_absolute_key() -> Result<()> {
        let dir = TempDir::new()?;
        let elsewhere = TempDir::new()?;
        let target = elsewhere.path().join("agg.csv");
        let key = target.to_string_lossy().into_owned();

        let cache = CsvFrameCache::new(dir.path());
        cache.get_or_compute(&key, || Ok(frame()))?;

        assert!(target.is_file());
        assert_eq!(cache.status(&key)?, CacheStatus::Fresh);
        Ok(())
    }

    #[test]
    fn test_failed_store_removes_staging_file() -> Result<()> {
        let dir = TempDir::new()?;
        // A non-empty directory where the cache file belongs makes the rename fail
        let blocker = dir.path().join("agg.csv");
        std::fs::create_dir(&blocker)?;
        std::fs::write(blocker.join("keep"), "x")?;

        let cache = CsvFrameCache::new(dir.path());
        assert!(cache.store("agg.csv", &frame()).is_err());
        assert!(!dir.path().join(".agg.csv.partial").exists());
        Ok(())
    }

    #[test]
    fn test_stale_when_source_is_newer() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("lte_Jun_18.csv");
        let cache = CsvFrameCache::new(dir.path()).with_sources(vec![source.clone()]);

        cache.store("agg.csv", &frame())?;
        std::fs::write(&source, "operator\nEE\n")?;

        let cached_at = std::fs::metadata(cache.path_for("agg.csv"))?.modified()?;
        let file = std::fs::File::options().write(true).open(&source)?;
        file.set_modified(cached_at + Duration::from_secs(60))?;

        assert_eq!(cache.status("agg.csv")?, CacheStatus::Stale);

        // Stale copies are still served
        let loaded = cache.get_or_compute("agg.csv", || Ok(MeasurementFrame::default()))?;
        assert_eq!(loaded.len(), 2);
        Ok(())
    }
}
