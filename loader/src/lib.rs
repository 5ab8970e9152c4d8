//! Document loading and generator configuration for schema-structgen.
//!
//! This crate is the file-system edge of the workspace: it decodes YAML and
//! JSON schema files into the generic maps that
//! [`structgen_core::resolve`] consumes, and reads the generator's YAML
//! configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use structgen_loader::{DocumentSet, GenerateConfig};
//!
//! let config = GenerateConfig::load("structgen.yml").unwrap();
//! let documents = DocumentSet::builder()
//!     .from_paths(config.inputs.iter().cloned())
//!     .build()
//!     .unwrap();
//! let schemas = structgen_core::resolve(documents.documents()).unwrap();
//! let source = structgen_core::generate_all(&schemas, &config.options).unwrap();
//! println!("{source}");
//! ```

mod config;
mod error;
mod loader;

pub use config::{CONFIG_VERSION, GenerateConfig};
pub use error::{LoaderError, Result};
pub use loader::{DocumentSet, DocumentSetBuilder, DocumentSource};
