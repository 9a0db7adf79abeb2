//! Config file discovery and parsing.
//!
//! Responsibilities:
//! - Find `<dir>/<file_name>.<ext>` across the search paths.
//! - Pick a parser from the extension and decode the file into a generic tree.
//!
//! Does NOT handle:
//! - Matching file keys to record fields (see `merge.rs`).
//! - Type coercion of leaf values (see `record::value`).
//!
//! Invariants:
//! - The file is read once and closed before parsing starts.
//! - The decoded top level is always an object; an empty document is an empty object.
//! - Flat formats (`.env`, properties) nest dotted keys: `server.port=1` is `{server: {port: 1}}`.
//!   Segments that differ only by case land in the same table.
//! - Env-file parse errors never include line contents.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::error::ConfigError;
use crate::constants::KEY_PATH_SEPARATOR;

/// Structured formats a config file may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Yaml,
    Properties,
    Hcl,
    Dotenv,
}

/// Extensions probed for each search path, in order.
pub const SUPPORTED_EXTENSIONS: &[(&str, FileFormat)] = &[
    ("json", FileFormat::Json),
    ("toml", FileFormat::Toml),
    ("yaml", FileFormat::Yaml),
    ("yml", FileFormat::Yaml),
    ("properties", FileFormat::Properties),
    ("props", FileFormat::Properties),
    ("prop", FileFormat::Properties),
    ("hcl", FileFormat::Hcl),
    ("tfvars", FileFormat::Hcl),
    ("env", FileFormat::Dotenv),
];

impl FileFormat {
    /// Look up the format for a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        SUPPORTED_EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
            FileFormat::Yaml => "YAML",
            FileFormat::Properties => "properties",
            FileFormat::Hcl => "HCL",
            FileFormat::Dotenv => "env",
        };
        f.write_str(name)
    }
}

/// Find the config file named `file_name` in the first search path that has one.
///
/// A `file_name` that already ends in a supported extension is also accepted
/// as-is, so `appsettings.json` finds `appsettings.json` as well as
/// `appsettings.json.json`.
pub(crate) fn locate(
    search_paths: &[PathBuf],
    file_name: &str,
) -> Result<(PathBuf, FileFormat), ConfigError> {
    if file_name.is_empty() {
        return Err(ConfigError::MissingFileName);
    }

    let explicit_format = FileFormat::from_path(Path::new(file_name));

    for dir in search_paths {
        if let Some(format) = explicit_format {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                return Ok((candidate, format));
            }
        }
        for (ext, format) in SUPPORTED_EXTENSIONS {
            let candidate = dir.join(format!("{file_name}.{ext}"));
            if candidate.is_file() {
                return Ok((candidate, *format));
            }
        }
    }

    Err(ConfigError::FileNotFound {
        file_name: file_name.to_string(),
        searched: search_paths.to_vec(),
    })
}

/// Read and decode a config file into an object tree.
pub(crate) fn read_config_file(
    path: &Path,
    format: FileFormat,
) -> Result<Map<String, Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| ConfigError::FileParse {
        path: path.to_path_buf(),
        format,
        message,
    };

    let tree: Value = match format {
        FileFormat::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        FileFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        FileFormat::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        FileFormat::Hcl => hcl::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        FileFormat::Dotenv => parse_dotenv(&content).map_err(parse_error)?,
        FileFormat::Properties => parse_properties(&content).map_err(parse_error)?,
    };

    match tree {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(parse_error(
            "top-level value must be a table of settings".to_string(),
        )),
    }
}

fn parse_dotenv(content: &str) -> Result<Value, String> {
    let mut root = Map::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item.map_err(|e| match e {
            dotenvy::Error::LineParse(_, index) => format!("invalid syntax at position {index}"),
            dotenvy::Error::Io(io_err) => format!("read failed: {}", io_err.kind()),
            _ => "invalid entry".to_string(),
        })?;
        insert_dotted(&mut root, &key, Value::String(value));
    }
    Ok(Value::Object(root))
}

fn parse_properties(content: &str) -> Result<Value, String> {
    let entries = java_properties::read(content.as_bytes()).map_err(|e| e.to_string())?;
    let mut entries: Vec<(String, String)> = entries.into_iter().collect();
    entries.sort_unstable();

    let mut root = Map::new();
    for (key, value) in entries {
        if key.is_empty() {
            return Err("property with an empty key".to_string());
        }
        insert_dotted(&mut root, &key, Value::String(value));
    }
    Ok(Value::Object(root))
}

/// Insert `value` at a dotted key, creating intermediate tables. Segments
/// reuse an existing table whose name differs only by ASCII case. A scalar in
/// the way is replaced by a table.
fn insert_dotted(root: &mut Map<String, Value>, key: &str, value: Value) {
    let mut segments = key.split(KEY_PATH_SEPARATOR).peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let name = table_name(current, segment);
        let entry = current
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

fn table_name(map: &Map<String, Value>, segment: &str) -> String {
    if map.get(segment).is_some_and(Value::is_object) {
        return segment.to_string();
    }
    map.iter()
        .find(|(name, value)| value.is_object() && name.eq_ignore_ascii_case(segment))
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| segment.to_string())
}
