//! Derived-variable cache
//!
//! Derived series are computed once per `(variable, source)` pair and
//! persisted as single-column CSV files under the cache directory. Later
//! requests read the artifact back verbatim.
//!
//! # Example
//!
//! ```rust,no_run
//! use gday_series::{Config, DerivedCache, SourceId};
//!
//! let cache = DerivedCache::new(Config::with_dirs("outputs", "cache"));
//! let source: SourceId = "D1GDAYEUCFIXEDAMBAVG.csv".parse().unwrap();
//!
//! let leaf = cache.get_variable("leafAl", &source).unwrap();
//! println!("{} days, {} missing", leaf.len(), leaf.missing_count());
//! println!("{:?}", cache.stats());
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::{Error, Result};
use gday_series_core::{DerivedSeries, RawTable, SourceId};
use gday_series_csv::{RawTableReader, SeriesReader, SeriesWriteOptions, SeriesWriter};
use gday_series_formula::check_variable_name;

/// Separator between variable and source in artifact file names
const KEY_SEPARATOR: &str = "__";

/// When an existing artifact is recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationPolicy {
    /// Artifacts are reused as long as they exist
    #[default]
    Never,
    /// Artifacts older than their raw file are recomputed
    SourceModified,
}

/// Counters from a cache's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from an artifact
    pub hits: u64,
    /// Requests that had to compute
    pub misses: u64,
    /// Raw files read
    pub raw_reads: u64,
    /// Artifacts written
    pub writes: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    raw_reads: AtomicU64,
    writes: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            raw_reads: self.raw_reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}

/// Compute-once store of derived series
///
/// Shared by reference; concurrent first requests for the same key are
/// serialised so the series is computed once.
#[derive(Debug)]
pub struct DerivedCache {
    config: Config,
    write_options: SeriesWriteOptions,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    counters: Counters,
}

impl DerivedCache {
    /// Create a cache over the configured data and cache directories
    pub fn new(config: Config) -> Self {
        Self {
            config,
            write_options: SeriesWriteOptions::default(),
            locks: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counters so far
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Artifact path for a `(variable, source)` pair
    pub fn artifact_path(&self, variable: &str, source: &SourceId) -> PathBuf {
        self.config.cache_dir.join(format!(
            "{}{}{}",
            variable,
            KEY_SEPARATOR,
            source.file_name()
        ))
    }

    /// Raw output path for a source
    pub fn source_path(&self, source: &SourceId) -> PathBuf {
        self.config.data_dir.join(source.file_name())
    }

    /// Read a source's raw table
    pub fn load_raw(&self, source: &SourceId) -> Result<RawTable> {
        let path = self.source_path(source);
        if !path.is_file() {
            return Err(Error::SourceNotFound(path));
        }

        Counters::bump(&self.counters.raw_reads);
        tracing::debug!(path = %path.display(), "reading raw output");
        RawTableReader::read_file(&path, &self.config.read_options).map_err(Error::csv(&path))
    }

    /// Derived series for `variable` computed from `source`
    ///
    /// The formula is looked up before any file is touched, so an unknown
    /// variable fails with no I/O. On a miss the raw table is read, the
    /// formula evaluated, and the result persisted before it is returned.
    pub fn get_variable(&self, variable: &str, source: &SourceId) -> Result<DerivedSeries> {
        let formula = self.config.formulas.get(variable)?;
        let path = self.artifact_path(variable, source);

        let lock = self.key_lock(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(values) = self.read_artifact(&path, source) {
            Counters::bump(&self.counters.hits);
            tracing::debug!(variable, source = %source, "cache hit");
            return Ok(DerivedSeries::new(variable, source.file_name(), values));
        }

        Counters::bump(&self.counters.misses);
        tracing::debug!(variable, source = %source, formula = %formula, "cache miss");

        let table = self.load_raw(source)?;
        let values = gday_series_formula::evaluate(formula, &table)?;
        self.write_artifact(&path, &values)?;

        Ok(DerivedSeries::new(variable, source.file_name(), values))
    }

    /// Derived series for every `(source, variable)` pair
    ///
    /// Results are ordered by source, then by variable within each source.
    /// Every variable is checked against the formula table first.
    pub fn get_variables<V: AsRef<str>>(
        &self,
        variables: &[V],
        sources: &[SourceId],
    ) -> Result<Vec<DerivedSeries>> {
        for variable in variables {
            self.config.formulas.get(variable.as_ref())?;
        }

        let mut series = Vec::with_capacity(variables.len() * sources.len());
        for source in sources {
            for variable in variables {
                series.push(self.get_variable(variable.as_ref(), source)?);
            }
        }
        Ok(series)
    }

    /// Remove one artifact; returns whether it existed
    pub fn invalidate(&self, variable: &str, source: &SourceId) -> Result<bool> {
        check_variable_name(variable)?;
        let path = self.artifact_path(variable, source);
        let lock = self.key_lock(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "invalidated artifact");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&path)(e)),
        }
    }

    /// Remove every artifact in the cache directory; returns how many
    pub fn clear(&self) -> Result<usize> {
        let dir = &self.config.cache_dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::io(dir)(e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(Error::io(dir))?;
            let path = entry.path();
            let is_artifact = path.is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map_or(false, |name| name.contains(KEY_SEPARATOR));
            if is_artifact {
                fs::remove_file(&path).map_err(Error::io(&path))?;
                removed += 1;
            }
        }

        tracing::info!(removed, dir = %dir.display(), "cleared cache");
        Ok(removed)
    }

    fn key_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Artifact values if present, readable and fresh
    fn read_artifact(&self, path: &Path, source: &SourceId) -> Option<Vec<f64>> {
        if !path.is_file() || self.is_stale(path, source) {
            return None;
        }

        match SeriesReader::read_file(path) {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "unreadable artifact, recomputing"
                );
                None
            }
        }
    }

    fn is_stale(&self, path: &Path, source: &SourceId) -> bool {
        if self.config.invalidation == InvalidationPolicy::Never {
            return false;
        }

        let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
        match (modified(path), modified(&self.source_path(source))) {
            (Some(artifact), Some(raw)) if raw > artifact => {
                tracing::warn!(
                    path = %path.display(),
                    "artifact older than raw output, recomputing"
                );
                true
            }
            _ => false,
        }
    }

    /// Persist values via a temp file in the cache directory
    fn write_artifact(&self, path: &Path, values: &[f64]) -> Result<()> {
        let dir = &self.config.cache_dir;
        fs::create_dir_all(dir).map_err(Error::io(dir))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;
        SeriesWriter::write(values, &mut tmp, &self.write_options)
            .map_err(Error::csv(path))?;
        tmp.persist(path).map_err(|e| Error::io(path)(e.error))?;

        Counters::bump(&self.counters.writes);
        tracing::info!(path = %path.display(), len = values.len(), "wrote artifact");
        Ok(())
    }
}
