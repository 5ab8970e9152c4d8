//! Schema model and inheritance resolver for declarative struct schemas.
//!
//! This crate turns decoded schema documents into a flattened property
//! model and emits Go structs from it:
//!
//! - [`Item`]: a typed node (scalar, array or object).
//! - [`Property`]: a named item inside an object.
//! - [`NamedSet`]: an ordered collection with unique element names.
//! - [`Schema`]: a parsed document with its id, relations and root object.
//!
//! [`resolve`] parses a batch of documents and merges each schema's base
//! fields into it, bases first. [`generate_all`] renders the result.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use structgen_core::*;
//!
//! let documents: Vec<_> = [
//!     json!({"id": "base", "schema": {"type": "object", "properties": {
//!         "id": {"type": "string"}}}}),
//!     json!({"id": "port", "parent": "device", "extends": ["base"], "schema": {
//!         "type": "object",
//!         "properties": {"name": {"type": "string"}}
//!     }}),
//! ]
//! .iter()
//! .map(|doc| doc.as_object().cloned().unwrap())
//! .collect();
//!
//! let schemas = resolve(&documents).unwrap();
//! let port = &schemas[1];
//! assert_eq!(
//!     port.properties().names().collect::<Vec<_>>(),
//!     vec!["name", "device_id", "id"]
//! );
//! ```

mod error;
mod generate;
mod item;
mod naming;
mod property;
mod resolve;
mod schema;
mod set;

pub use error::{Result, SchemaError};
pub use generate::{GenerateOptions, generate_all, generate_schema};
pub use item::{Item, Object, ScalarKind};
pub use naming::{join_name, join_path, to_go_name};
pub use property::Property;
pub use resolve::{BASE_FIELD_WINDOW, DepthWindow, resolve, resolve_schemas};
pub use schema::{FieldSummary, Schema, SchemaSummary, parse_all};
pub use set::{DuplicateKey, Named, NamedSet};
