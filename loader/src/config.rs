//! Generator configuration.
//!
//! A YAML file that records which schema inputs to read and how to emit
//! Go code, so a generation run can be repeated without long command lines.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! inputs:
//!   - schemas/
//!   - extra/port.yaml
//! output: gen/models.go
//! package: models
//! suffix: ""
//! annotation: json
//! ```
//!
//! Relative inputs and output are resolved against the directory holding
//! the config file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use structgen_core::GenerateOptions;

use crate::error::Result;

/// Current configuration format version.
pub const CONFIG_VERSION: &str = "1.0";

/// Top-level generator configuration.
///
/// Every key is optional; missing keys take their [`Default`] values.
///
/// # Examples
///
/// ```
/// use structgen_loader::GenerateConfig;
///
/// let yaml = "package: api\ninputs: [schemas]\n";
/// let config: GenerateConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.options.package, "api");
/// assert_eq!(config.options.annotation, "json");
/// assert_eq!(config.inputs.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Schema files and directories to read, in order.
    pub inputs: Vec<PathBuf>,
    /// Where to write the generated Go source; stdout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Emission settings.
    #[serde(flatten)]
    pub options: GenerateOptions,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            inputs: Vec::new(),
            output: None,
            options: GenerateOptions::default(),
        }
    }
}

impl GenerateConfig {
    /// Loads configuration from a YAML file, resolving relative paths
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::LoaderError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    fn rebase(&mut self, dir: &Path) {
        for input in &mut self.inputs {
            if input.is_relative() {
                *input = dir.join(&*input);
            }
        }
        if let Some(output) = &mut self.output {
            if output.is_relative() {
                *output = dir.join(&*output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
inputs:
  - schemas
  - /abs/extra.yaml
output: gen/models.go
package: network
suffix: Raw
annotation: yaml
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: GenerateConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.inputs,
            vec![PathBuf::from("schemas"), PathBuf::from("/abs/extra.yaml")]
        );
        assert_eq!(config.output, Some(PathBuf::from("gen/models.go")));
        assert_eq!(config.options.package, "network");
        assert_eq!(config.options.suffix, "Raw");
        assert_eq!(config.options.annotation, "yaml");
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: GenerateConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, GenerateConfig::default());
        assert_eq!(config.options.package, "models");
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structgen.yml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let config = GenerateConfig::load(&path).unwrap();
        assert_eq!(
            config.inputs,
            vec![dir.path().join("schemas"), PathBuf::from("/abs/extra.yaml")]
        );
        assert_eq!(config.output, Some(dir.path().join("gen/models.go")));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut original: GenerateConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.inputs = vec![PathBuf::from("/abs/schemas")];
        original.output = None;
        original.save(&path).unwrap();

        let loaded = GenerateConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
