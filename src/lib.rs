// precompress - ahead-of-time compression of bundler output
//
// This library writes compressed companions (`.gz`, `.br`) next to the files a
// build produced, skipping anything that has not changed since the last run.

// Re-export core functionality
pub use precompress_core::*;

/// Commonly used types, for `use precompress::prelude::*;`
pub mod prelude {
    pub use precompress_core::{
        BuildConfig, BuildPlugin, ChangeCache, CompressionOptions, CompressionPlugin,
        FileFilter, Logger, PrecompressConfig, RunReport,
    };
}
