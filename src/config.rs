//! Server configuration.
//!
//! All runtime behaviour is controlled through [`ServerConfig`], built via
//! its [`ServerConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers and to diff two deployments
//! to understand why their behaviour differs.

use crate::error::Doc2ChartError;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the doc2chart service.
///
/// Built via [`ServerConfig::builder()`] or [`ServerConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2chart::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::builder()
///     .output_root("/var/lib/doc2chart")
///     .retention(Duration::from_secs(1800))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root directory under which each report gets its own subdirectory.
    /// Default: `<system temp dir>/doc2chart-reports`.
    ///
    /// Every upload writes into `<output_root>/<uuid>/`, so two concurrent
    /// requests can never overwrite each other's artifacts. The directory
    /// is created on demand.
    pub output_root: PathBuf,

    /// How long a report's artifacts stay downloadable. Default: 1 hour.
    ///
    /// Reports older than this are deleted by the sweep that runs at the
    /// start of every upload. One hour comfortably covers "generate, look
    /// at the page, download the workbook" while bounding disk use on a
    /// busy instance.
    pub retention: Duration,

    /// Maximum accepted upload size in bytes. Default: 10 MiB.
    ///
    /// Table-bearing office documents are rarely larger; the cap mainly
    /// protects the parsers from being handed a multi-hundred-megabyte
    /// body to buffer.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            output_root: std::env::temp_dir().join("doc2chart-reports"),
            retention: Duration::from_secs(3600),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create a new builder for `ServerConfig`.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = root.into();
        self
    }

    pub fn retention(mut self, retention: Duration) -> Self {
        self.config.retention = retention;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes.max(1024);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServerConfig, Doc2ChartError> {
        let c = &self.config;
        if c.retention < Duration::from_secs(1) {
            return Err(Doc2ChartError::InvalidConfig(
                "Retention must be at least 1 second".into(),
            ));
        }
        if c.output_root.as_os_str().is_empty() {
            return Err(Doc2ChartError::InvalidConfig(
                "Output root must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
