//! Build tool lifecycle integration

use crate::{
    ChangeCache, CompressionError, Logger, PrecompressConfig, Result, RunReport, TracingLogger,
    orchestrator,
};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// What the host build tool hands over once its configuration is final.
#[derive(Clone)]
pub struct BuildConfig {
    /// Project root
    pub root: PathBuf,
    /// Build output directory, absolute or relative to `root`
    pub out_dir: PathBuf,
    /// Host logging channel
    pub logger: Arc<dyn Logger>,
}

impl BuildConfig {
    /// Create a build configuration that logs through `tracing`
    pub fn new(root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_dir: out_dir.into(),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the host logger
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Absolute output directory
    pub fn resolved_out_dir(&self) -> PathBuf {
        if self.out_dir.is_absolute() {
            self.out_dir.clone()
        } else {
            self.root.join(&self.out_dir)
        }
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("root", &self.root)
            .field("out_dir", &self.out_dir)
            .finish_non_exhaustive()
    }
}

/// Hooks a build tool calls on its plugins.
#[async_trait]
pub trait BuildPlugin: Send + Sync {
    /// Plugin name for host diagnostics
    fn name(&self) -> &'static str;

    /// Called once the build configuration is final
    fn config_resolved(&mut self, config: &BuildConfig);

    /// Called once the output bundle has been written
    async fn close_bundle(&self) -> Result<RunReport>;
}

struct ResolvedBuild {
    out_dir: PathBuf,
    logger: Arc<dyn Logger>,
}

/// Compresses build output after every bundle.
///
/// # Example
///
/// ```rust,no_run
/// use precompress_core::{BuildConfig, BuildPlugin, CompressionPlugin, PrecompressConfig};
///
/// # async fn build() -> precompress_core::Result<()> {
/// let mut plugin = CompressionPlugin::new(PrecompressConfig::builder().brotli().build());
/// plugin.config_resolved(&BuildConfig::new("/srv/app", "dist"));
/// let report = plugin.close_bundle().await?;
/// println!("{} files compressed", report.results.len());
/// # Ok(())
/// # }
/// ```
pub struct CompressionPlugin {
    config: PrecompressConfig,
    cache: Arc<ChangeCache>,
    build: Option<ResolvedBuild>,
}

impl CompressionPlugin {
    /// Create a plugin with its own change cache
    pub fn new(config: PrecompressConfig) -> Self {
        Self::with_cache(config, Arc::new(ChangeCache::new()))
    }

    /// Create a plugin sharing an existing change cache
    pub fn with_cache(config: PrecompressConfig, cache: Arc<ChangeCache>) -> Self {
        Self {
            config,
            cache,
            build: None,
        }
    }

    pub fn config(&self) -> &PrecompressConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ChangeCache> {
        &self.cache
    }

    /// Output directory captured by [`BuildPlugin::config_resolved`]
    pub fn out_dir(&self) -> Option<&PathBuf> {
        self.build.as_ref().map(|b| &b.out_dir)
    }
}

#[async_trait]
impl BuildPlugin for CompressionPlugin {
    fn name(&self) -> &'static str {
        "precompress"
    }

    fn config_resolved(&mut self, config: &BuildConfig) {
        self.build = Some(ResolvedBuild {
            out_dir: config.resolved_out_dir(),
            logger: config.logger.clone(),
        });
    }

    async fn close_bundle(&self) -> Result<RunReport> {
        if self.config.disable {
            return Ok(RunReport::default());
        }

        let build = self.build.as_ref().ok_or(CompressionError::NotConfigured)?;
        orchestrator::run(
            &build.out_dir,
            &self.config,
            &self.cache,
            build.logger.as_ref(),
        )
        .await
    }
}

impl fmt::Debug for CompressionPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionPlugin")
            .field("config", &self.config)
            .field("cached_files", &self.cache.len())
            .field("out_dir", &self.out_dir())
            .finish()
    }
}
