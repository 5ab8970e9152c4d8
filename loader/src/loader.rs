//! Schema document loading from files and directories.
//!
//! A file may hold:
//!
//! - a single schema mapping,
//! - a sequence of schema mappings,
//! - a bundle mapping with a `schemas` sequence,
//! - for YAML, several `---` separated documents of any of the above.
//!
//! Directories are read one level deep; `*.yaml`, `*.yml` and `*.json`
//! files are loaded in sorted path order so the resulting batch is
//! deterministic.
//!
//! ```no_run
//! use structgen_loader::DocumentSet;
//!
//! let documents = DocumentSet::builder()
//!     .from_path("schemas/")
//!     .from_path("extra/port.yaml")
//!     .build()
//!     .unwrap();
//! println!("loaded {} documents", documents.len());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{LoaderError, Result};

/// Describes where documents were loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A single YAML or JSON file.
    File(PathBuf),
    /// A directory of YAML and JSON files.
    Directory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Format::Json),
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Ordered batch of decoded schema documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Map<String, Value>>,
    sources: Vec<DocumentSource>,
}

impl DocumentSet {
    /// Returns a new [`DocumentSetBuilder`].
    pub fn builder() -> DocumentSetBuilder {
        DocumentSetBuilder::new()
    }

    /// Loads a file or a directory, depending on what `path` is.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Loads every document in one file.
    ///
    /// # Errors
    ///
    /// [`LoaderError::UnsupportedInput`] for unknown extensions,
    /// [`LoaderError::IoError`], [`LoaderError::JsonError`] or
    /// [`LoaderError::YamlError`] when reading fails, and
    /// [`LoaderError::InvalidDocument`] when the content is not a schema
    /// mapping, sequence or bundle.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format =
            Format::of(path).ok_or_else(|| LoaderError::UnsupportedInput(path.to_path_buf()))?;
        let text = std::fs::read_to_string(path)?;

        let mut documents = Vec::new();
        match format {
            Format::Json => {
                let value: Value = serde_json::from_str(&text)?;
                split_documents(value, path, &mut documents)?;
            }
            Format::Yaml => {
                for yaml in serde_yaml::Deserializer::from_str(&text) {
                    let value = Value::deserialize(yaml)?;
                    split_documents(value, path, &mut documents)?;
                }
            }
        }
        debug!(path = %path.display(), documents = documents.len(), "loaded schema file");

        Ok(Self {
            documents,
            sources: vec![DocumentSource::File(path.to_path_buf())],
        })
    }

    /// Loads every `*.yaml`, `*.yml` and `*.json` file in a directory, in
    /// sorted path order. Other files are skipped.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if Format::of(&file_path).is_none() {
                warn!(path = %file_path.display(), "skipping non-schema file");
                continue;
            }
            files.push(file_path);
        }
        files.sort();

        let mut documents = Vec::new();
        for file in &files {
            documents.extend(Self::from_file(file)?.documents);
        }

        Ok(Self {
            documents,
            sources: vec![DocumentSource::Directory(path.to_path_buf())],
        })
    }

    /// The decoded documents, in load order.
    pub fn documents(&self) -> &[Map<String, Value>] {
        &self.documents
    }

    /// Consumes the set, returning the documents in load order.
    pub fn into_documents(self) -> Vec<Map<String, Value>> {
        self.documents
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document was loaded.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Where the documents came from, in load order.
    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    fn append(&mut self, other: DocumentSet) {
        self.documents.extend(other.documents);
        self.sources.extend(other.sources);
    }
}

/// Builder that concatenates documents from several paths.
///
/// Unlike a fallback chain, every path must load; the first failure is
/// returned.
#[derive(Debug, Clone, Default)]
pub struct DocumentSetBuilder {
    paths: Vec<PathBuf>,
}

impl DocumentSetBuilder {
    /// Creates a new builder with no inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file or directory.
    pub fn from_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Adds several files or directories.
    pub fn from_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Loads every configured path in order.
    ///
    /// # Errors
    ///
    /// [`LoaderError::NoInputs`] when no path was added, otherwise the first
    /// loading error.
    pub fn build(self) -> Result<DocumentSet> {
        if self.paths.is_empty() {
            return Err(LoaderError::NoInputs);
        }
        let mut set = DocumentSet::default();
        for path in &self.paths {
            set.append(DocumentSet::from_path(path)?);
        }
        Ok(set)
    }
}

fn split_documents(value: Value, path: &Path, out: &mut Vec<Map<String, Value>>) -> Result<()> {
    let invalid = |reason: &str| LoaderError::InvalidDocument {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    match value {
        // Empty YAML document.
        Value::Null => Ok(()),
        Value::Object(mut map) if !map.contains_key("id") && map.contains_key("schemas") => {
            match map.remove("schemas") {
                Some(schemas @ Value::Array(_)) => split_documents(schemas, path, out),
                _ => Err(invalid("bundle `schemas` should be a sequence")),
            }
        }
        Value::Object(map) => {
            out.push(map);
            Ok(())
        }
        Value::Array(values) => {
            for value in values {
                match value {
                    Value::Object(map) => out.push(map),
                    _ => return Err(invalid("sequence entries should be mappings")),
                }
            }
            Ok(())
        }
        _ => Err(invalid("expected a mapping or a sequence of mappings")),
    }
}
