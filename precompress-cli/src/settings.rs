//! Configuration file loading and flag merging.

use precompress_core::{CompressionOptions, FileFilter, PrecompressConfig};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::CompressArgs;
use crate::error::{CliError, CliResult};

/// File names probed in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["precompress.toml", "precompress.json"];

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    /// Auto-detect format from a file path
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CliError::Config(format!("{}: no file extension", path.display())))?;

        Self::from_extension(ext)
            .ok_or_else(|| CliError::Config(format!("Unsupported format: {}", ext)))
    }
}

/// Settings as written in `precompress.toml` / `precompress.json`.
///
/// Keys accept both snake_case and the camelCase spelling bundler plugin
/// users are used to (`deleteOriginFile`, `compressionOptions`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub disable: bool,
    /// Regex source for the eligibility filter
    pub filter: Option<String>,
    pub verbose: Option<bool>,
    pub threshold: Option<u64>,
    #[serde(alias = "compressionOptions")]
    pub compression_options: CompressionOptions,
    #[serde(alias = "deleteOriginFile")]
    pub delete_origin_file: bool,
    pub ext: Option<String>,
    pub algorithm: Option<String>,
}

impl FileSettings {
    /// Load settings from a file, detecting the format from its extension
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content, FileFormat::from_path(path)?)
    }

    pub fn parse(content: &str, format: FileFormat) -> CliResult<Self> {
        match format {
            FileFormat::Json => Ok(serde_json::from_str(content)?),
            FileFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    /// Explicit `--config` path, else the first default file in `cwd`
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let found: Option<PathBuf> = DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| cwd.join(name))
            .find(|path| path.is_file());

        match found {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using configuration file");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Build the run configuration: file settings first, flags on top.
pub fn resolve(settings: FileSettings, args: &CompressArgs) -> CliResult<PrecompressConfig> {
    let mut builder = PrecompressConfig::builder()
        .disable(settings.disable)
        .delete_origin_file(settings.delete_origin_file || args.delete_origin);

    if let Some(algorithm) = args.algorithm.clone().or(settings.algorithm) {
        builder = builder.algorithm(algorithm);
    }
    if let Some(ext) = args.ext.clone().or(settings.ext) {
        builder = builder.ext(ext);
    }
    if let Some(threshold) = args.threshold.or(settings.threshold) {
        builder = builder.threshold(threshold);
    }

    let verbose = if args.quiet {
        false
    } else {
        settings.verbose.unwrap_or(true)
    };
    builder = builder.verbose(verbose);

    if let Some(pattern) = args.filter.as_deref().or(settings.filter.as_deref()) {
        let filter = FileFilter::pattern(pattern).map_err(|e| {
            CliError::InvalidArgument(format!("invalid filter pattern `{}`: {}", pattern, e))
        })?;
        builder = builder.filter(filter);
    }

    let mut options = settings.compression_options;
    for raw in &args.options {
        let (key, value) = parse_option(raw)?;
        set_option(&mut options, &key, value);
    }

    let mut config = builder.compression_options(options).build();
    if config.ext.trim_start_matches('.').is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "algorithm `{}` has no default extension; pass --ext",
            config.algorithm
        )));
    }

    // Outputs land next to their sources; never pick them up again
    if args.all {
        config.filter = FileFilter::all_except_suffix(config.output_extension());
    }

    Ok(config)
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a
/// plain string.
pub fn parse_option(raw: &str) -> CliResult<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidArgument(format!("expected KEY=VALUE, got `{}`", raw)))?;

    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(CliError::InvalidArgument(format!("invalid option key `{}`", key)));
    }

    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Set a possibly dotted key (`params.quality`), creating nested objects.
fn set_option(options: &mut CompressionOptions, key: &str, value: Value) {
    let mut parts = key.split('.');
    let Some(top) = parts.next() else {
        return;
    };
    let rest: Vec<&str> = parts.collect();

    if rest.is_empty() {
        options.insert(top, value);
        return;
    }

    let mut root = match options.get(top) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    insert_nested(&mut root, &rest, value);
    options.insert(top, Value::Object(root));
}

fn insert_nested(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, tail @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, tail, value);
            }
        }
    }
}
