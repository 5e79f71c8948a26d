//! Configuration for scan backends.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegScanError};

/// Which primitive backend to run scans on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single-threaded reference backend.
    Sequential,

    /// Rayon thread pool backend.
    Parallel,
}

/// Configuration for building a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Backend to construct.
    pub backend: BackendKind,

    /// Thread pool size for parallel execution.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,

    /// Inputs shorter than this run sequentially, and parallel chunks are
    /// never smaller than this.
    pub min_chunk_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Parallel,
            thread_pool_size: None,
            min_chunk_len: 4096,
        }
    }
}

impl ScanConfig {
    /// Create a new config for the given backend.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: ScanConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the backend kind.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the thread pool size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Set the minimum chunk length.
    pub fn with_min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = len;
        self
    }

    /// Check the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.min_chunk_len == 0 {
            return Err(SegScanError::invalid_config(
                "min_chunk_len must be greater than 0",
            ));
        }
        if self.thread_pool_size == Some(0) {
            return Err(SegScanError::invalid_config(
                "thread_pool_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.backend, BackendKind::Parallel);
        assert_eq!(config.thread_pool_size, None);
        assert_eq!(config.min_chunk_len, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ScanConfig::new(BackendKind::Sequential)
            .with_thread_pool_size(2)
            .with_min_chunk_len(16);
        assert_eq!(config.backend, BackendKind::Sequential);
        assert_eq!(config.thread_pool_size, Some(2));
        assert_eq!(config.min_chunk_len, 16);
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let config = ScanConfig::default().with_min_chunk_len(0);
        assert!(matches!(
            config.validate(),
            Err(SegScanError::InvalidConfig(_))
        ));

        let config = ScanConfig::default().with_thread_pool_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "backend": "sequential", "min_chunk_len": 128 }}"#).unwrap();

        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Sequential);
        assert_eq!(config.min_chunk_len, 128);
        assert_eq!(config.thread_pool_size, None);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "min_chunk_len": 0 }}"#).unwrap();
        assert!(ScanConfig::from_json_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ScanConfig::from_json_file(file.path()),
            Err(SegScanError::Json(_))
        ));
    }
}
