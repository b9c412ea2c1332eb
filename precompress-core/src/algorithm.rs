//! Compression algorithm implementations

use crate::{CompressionError, CompressionOptions, Result};
use serde_json::{Value, json};
#[cfg(feature = "gzip")]
use std::io::Write;
use std::str::FromStr;

/// zlib's "pick the default level" marker
const Z_DEFAULT_COMPRESSION: i64 = -1;

#[cfg(feature = "brotli")]
const BROTLI_PARAM_MODE: &str = "0";
#[cfg(feature = "brotli")]
const BROTLI_PARAM_QUALITY: &str = "1";
#[cfg(feature = "brotli")]
const BROTLI_PARAM_LGWIN: &str = "2";
#[cfg(feature = "brotli")]
const BROTLI_PARAM_SIZE_HINT: &str = "5";

/// Supported compression algorithms.
///
/// Identifiers follow the names bundler plugins conventionally use, so a
/// configuration written for a JavaScript toolchain carries over as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    /// Gzip container (`gzip`)
    #[cfg(feature = "gzip")]
    Gzip,

    /// Zlib container (`deflate`)
    #[cfg(feature = "gzip")]
    Deflate,

    /// Raw deflate stream without header (`deflateRaw`)
    #[cfg(feature = "gzip")]
    DeflateRaw,

    /// Brotli (`brotliCompress`)
    #[cfg(feature = "brotli")]
    Brotli,

    /// Zstd (`zstd`)
    #[cfg(feature = "zstd")]
    Zstd,
}

impl CompressionAlgorithm {
    /// Every algorithm compiled into this build.
    pub fn all() -> Vec<Self> {
        vec![
            #[cfg(feature = "gzip")]
            Self::Gzip,
            #[cfg(feature = "gzip")]
            Self::Deflate,
            #[cfg(feature = "gzip")]
            Self::DeflateRaw,
            #[cfg(feature = "brotli")]
            Self::Brotli,
            #[cfg(feature = "zstd")]
            Self::Zstd,
        ]
    }

    /// Configuration identifier for this algorithm
    pub fn identifier(&self) -> &'static str {
        match *self {
            #[cfg(feature = "gzip")]
            Self::Gzip => "gzip",
            #[cfg(feature = "gzip")]
            Self::Deflate => "deflate",
            #[cfg(feature = "gzip")]
            Self::DeflateRaw => "deflateRaw",
            #[cfg(feature = "brotli")]
            Self::Brotli => "brotliCompress",
            #[cfg(feature = "zstd")]
            Self::Zstd => "zstd",
        }
    }

    /// Get the minimum compression level for this algorithm
    pub fn min_level(&self) -> u32 {
        match *self {
            #[cfg(feature = "zstd")]
            Self::Zstd => 1,
            #[allow(unreachable_patterns)]
            _ => 0,
        }
    }

    /// Get the maximum compression level for this algorithm
    pub fn max_level(&self) -> u32 {
        match *self {
            #[cfg(feature = "gzip")]
            Self::Gzip | Self::Deflate | Self::DeflateRaw => 9,
            #[cfg(feature = "brotli")]
            Self::Brotli => 11,
            #[cfg(feature = "zstd")]
            Self::Zstd => 22,
        }
    }

    /// Level used when the options carry none
    pub fn default_level(&self) -> u32 {
        match *self {
            #[cfg(feature = "gzip")]
            Self::Gzip | Self::Deflate | Self::DeflateRaw => 6,
            #[cfg(feature = "brotli")]
            Self::Brotli => 11,
            #[cfg(feature = "zstd")]
            Self::Zstd => 3,
        }
    }

    /// Built-in tuning defaults, before user overrides are merged in
    pub fn default_options(&self) -> CompressionOptions {
        let defaults = match *self {
            #[cfg(feature = "gzip")]
            Self::Gzip | Self::Deflate | Self::DeflateRaw => json!({ "level": 9 }),
            #[cfg(feature = "brotli")]
            Self::Brotli => json!({ "params": { "quality": 11, "mode": "text" } }),
            #[cfg(feature = "zstd")]
            Self::Zstd => json!({ "level": 19 }),
        };

        match defaults {
            Value::Object(map) => CompressionOptions::from(map),
            _ => CompressionOptions::new(),
        }
    }

    /// Interpret raw options for this algorithm
    pub fn settings(&self, options: &CompressionOptions) -> Result<EncoderSettings> {
        match *self {
            #[cfg(feature = "brotli")]
            Self::Brotli => {
                let params = match options.get("params") {
                    None => None,
                    Some(Value::Object(params)) => Some(params),
                    Some(_) => {
                        return Err(CompressionError::invalid_option(
                            "params",
                            "expected an object",
                        ));
                    }
                };
                // Named keys, or the zlib `BROTLI_PARAM_*` numbers as strings
                let param = |key: &str, code: &str| {
                    params.and_then(|p| p.get(key).or_else(|| p.get(code)))
                };

                let quality = match param("quality", BROTLI_PARAM_QUALITY) {
                    Some(v) => self.checked_level("params.quality", v)?,
                    None => self.default_level(),
                };
                let mode = match param("mode", BROTLI_PARAM_MODE) {
                    Some(v) => BrotliMode::from_value(v)?,
                    None => BrotliMode::Generic,
                };
                let window = match param("lgwin", BROTLI_PARAM_LGWIN) {
                    Some(v) => Some(checked_range("params.lgwin", v, 10, 24)?),
                    None => None,
                };
                let size_hint = match param("size_hint", BROTLI_PARAM_SIZE_HINT) {
                    Some(v) => Some(
                        v.as_u64()
                            .ok_or_else(|| {
                                CompressionError::invalid_option(
                                    "params.size_hint",
                                    "expected a non-negative integer",
                                )
                            })? as usize,
                    ),
                    None => None,
                };

                Ok(EncoderSettings::Brotli {
                    quality,
                    mode,
                    window,
                    size_hint,
                })
            }
            #[allow(unreachable_patterns)]
            _ => {
                let level = match options.get("level") {
                    Some(v) if self.is_zlib() && v.as_i64() == Some(Z_DEFAULT_COMPRESSION) => {
                        self.default_level()
                    }
                    Some(v) => self.checked_level("level", v)?,
                    None => self.default_level(),
                };
                Ok(EncoderSettings::Level(level))
            }
        }
    }

    fn is_zlib(&self) -> bool {
        match *self {
            #[cfg(feature = "gzip")]
            Self::Gzip | Self::Deflate | Self::DeflateRaw => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    fn checked_level(&self, key: &str, value: &Value) -> Result<u32> {
        checked_range(key, value, self.min_level(), self.max_level())
    }

    /// Compress data using this algorithm
    pub fn compress(&self, data: &[u8], settings: &EncoderSettings) -> Result<Vec<u8>> {
        match (*self, settings) {
            #[cfg(feature = "gzip")]
            (Self::Gzip, EncoderSettings::Level(level)) => compress_gzip(data, *level),
            #[cfg(feature = "gzip")]
            (Self::Deflate, EncoderSettings::Level(level)) => compress_zlib(data, *level),
            #[cfg(feature = "gzip")]
            (Self::DeflateRaw, EncoderSettings::Level(level)) => compress_deflate(data, *level),
            #[cfg(feature = "brotli")]
            (
                Self::Brotli,
                EncoderSettings::Brotli {
                    quality,
                    mode,
                    window,
                    size_hint,
                },
            ) => compress_brotli(data, *quality, *mode, *window, *size_hint),
            #[cfg(feature = "zstd")]
            (Self::Zstd, EncoderSettings::Level(level)) => compress_zstd(data, *level),
            #[allow(unreachable_patterns)]
            (algorithm, settings) => Err(CompressionError::Config(format!(
                "{:?} cannot be applied to {}",
                settings, algorithm
            ))),
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|algorithm| algorithm.identifier() == s)
            .ok_or_else(|| CompressionError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Encoder parameters after option interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderSettings {
    /// Single level knob (zlib family, zstd)
    Level(u32),
    /// Brotli encoder parameters
    Brotli {
        quality: u32,
        mode: BrotliMode,
        window: Option<u32>,
        size_hint: Option<usize>,
    },
}

/// Brotli content hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrotliMode {
    #[default]
    Generic,
    Text,
    Font,
}

impl BrotliMode {
    /// Accepts the names (`"text"`) or the zlib numeric constants (`1`).
    fn from_value(value: &Value) -> Result<Self> {
        let mode = match value {
            Value::String(s) => match s.to_lowercase().as_str() {
                "generic" => Some(Self::Generic),
                "text" => Some(Self::Text),
                "font" => Some(Self::Font),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(Self::Generic),
                Some(1) => Some(Self::Text),
                Some(2) => Some(Self::Font),
                _ => None,
            },
            _ => None,
        };

        mode.ok_or_else(|| {
            CompressionError::invalid_option(
                "params.mode",
                format!("expected generic, text or font, got {}", value),
            )
        })
    }
}

fn checked_range(key: &str, value: &Value, min: u32, max: u32) -> Result<u32> {
    let level = value
        .as_i64()
        .ok_or_else(|| CompressionError::invalid_option(key, "expected an integer"))?;

    if level < i64::from(min) || level > i64::from(max) {
        return Err(CompressionError::InvalidLevel(
            level,
            i64::from(min),
            i64::from(max),
        ));
    }
    Ok(level as u32)
}

// ========== Gzip / Deflate Implementation ==========

#[cfg(feature = "gzip")]
fn compress_gzip(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}

#[cfg(feature = "gzip")]
fn compress_zlib(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}

#[cfg(feature = "gzip")]
fn compress_deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::DeflateEncoder;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}

// ========== Brotli Implementation ==========

#[cfg(feature = "brotli")]
fn compress_brotli(
    data: &[u8],
    quality: u32,
    mode: BrotliMode,
    window: Option<u32>,
    size_hint: Option<usize>,
) -> Result<Vec<u8>> {
    use brotli::enc::backward_references::BrotliEncoderMode;

    let mut params = brotli::enc::BrotliEncoderParams {
        quality: quality as i32,
        mode: match mode {
            BrotliMode::Generic => BrotliEncoderMode::BROTLI_MODE_GENERIC,
            BrotliMode::Text => BrotliEncoderMode::BROTLI_MODE_TEXT,
            BrotliMode::Font => BrotliEncoderMode::BROTLI_MODE_FONT,
        },
        size_hint: size_hint.unwrap_or(data.len()),
        ..Default::default()
    };
    if let Some(lgwin) = window {
        params.lgwin = lgwin as i32;
    }

    let mut output = Vec::new();
    let mut reader = std::io::Cursor::new(data);
    brotli::BrotliCompress(&mut reader, &mut output, &params)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;

    Ok(output)
}

// ========== Zstd Implementation ==========

#[cfg(feature = "zstd")]
fn compress_zstd(data: &[u8], level: u32) -> Result<Vec<u8>> {
    zstd::encode_all(std::io::Cursor::new(data), level as i32)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}
