//! Asynchronous compression entry point

use crate::{CompressionAlgorithm, CompressionError, CompressionOptions, Result};

/// Compress `data` with the algorithm named by `algorithm`.
///
/// The identifier and options are checked here rather than at configuration
/// time, so a bad identifier surfaces as a per-file failure. The encoder
/// itself runs on the blocking pool.
pub async fn compress(
    data: Vec<u8>,
    algorithm: &str,
    options: &CompressionOptions,
) -> Result<Vec<u8>> {
    let algorithm: CompressionAlgorithm = algorithm.parse()?;
    let settings = algorithm.settings(options)?;

    tokio::task::spawn_blocking(move || algorithm.compress(&data, &settings))
        .await
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?
}
