//! Go struct emission for resolved schemas.
//!
//! Every object reachable from a schema's root becomes one struct, root
//! first. Fields keep their original name as the serialization tag:
//!
//! ```text
//! type Port struct {
//! 	Name string `json:"name"`
//! 	DeviceID string `json:"device_id"`
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::item::Object;
use crate::naming::to_go_name;
use crate::resolve::DepthWindow;
use crate::schema::Schema;
use crate::set::Named;

/// Output settings for the Go emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Go package name for the generated file.
    pub package: String,
    /// Appended to every generated struct name.
    pub suffix: String,
    /// Struct tag key, e.g. `json`, `yaml` or `db`.
    pub annotation: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package: "models".to_string(),
            suffix: String::new(),
            annotation: "json".to_string(),
        }
    }
}

/// Emits the structs of one schema, without a package clause.
pub fn generate_schema(schema: &Schema, options: &GenerateOptions) -> Result<String> {
    let objects = schema.collect_objects(DepthWindow::ALL.limit, DepthWindow::ALL.offset)?;
    let mut out = String::new();
    for object in objects {
        write_object(&mut out, object, schema, options);
    }
    Ok(out)
}

/// Emits a complete Go source file for a batch of resolved schemas.
///
/// A nested object inherited from a base is the same definition in both
/// schemas and is emitted once.
///
/// # Errors
///
/// [`SchemaError::DuplicateObject`] when two different objects produce a
/// struct with the same name.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use structgen_core::{GenerateOptions, resolve, generate_all};
///
/// let documents = vec![
///     json!({"id": "port", "parent": "device", "schema": {
///         "type": "object",
///         "properties": {"name": {"type": "string"}}
///     }})
///     .as_object()
///     .cloned()
///     .unwrap(),
/// ];
/// let schemas = resolve(&documents).unwrap();
/// let source = generate_all(&schemas, &GenerateOptions::default()).unwrap();
/// assert!(source.starts_with("package models\n"));
/// assert!(source.contains("\tDeviceID string `json:\"device_id\"`\n"));
/// ```
pub fn generate_all(schemas: &[Schema], options: &GenerateOptions) -> Result<String> {
    let mut emitted: HashMap<&str, &Object> = HashMap::new();
    let mut out = format!("package {}\n", options.package);
    for schema in schemas {
        let objects = schema.collect_objects(DepthWindow::ALL.limit, DepthWindow::ALL.offset)?;
        out.push('\n');
        for object in objects {
            match emitted.get(object.name()) {
                Some(&previous) if previous == object => {
                    debug!(schema = schema.id(), object = object.path(), "struct already emitted");
                    continue;
                }
                Some(_) => {
                    return Err(SchemaError::DuplicateObject(object.type_name(&options.suffix))
                        .context(format!("invalid schema {}", schema.id())));
                }
                None => {
                    emitted.insert(object.name(), object);
                }
            }
            write_object(&mut out, object, schema, options);
        }
    }
    Ok(out)
}

fn write_object(out: &mut String, object: &Object, schema: &Schema, options: &GenerateOptions) {
    if object.is_root() {
        write_doc_comment(out, object, schema, options);
    }
    write_struct(out, object, options);
}

fn write_doc_comment(
    out: &mut String,
    object: &Object,
    schema: &Schema,
    options: &GenerateOptions,
) {
    let text = match (schema.title(), schema.description()) {
        (_, Some(description)) => description,
        (Some(title), None) => title,
        (None, None) => return,
    };
    let name = object.type_name(&options.suffix);
    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            out.push_str(&format!("// {name} {line}\n"));
        } else {
            out.push_str(&format!("// {line}\n"));
        }
    }
}

fn write_struct(out: &mut String, object: &Object, options: &GenerateOptions) {
    out.push_str(&format!(
        "type {} struct {{\n",
        object.type_name(&options.suffix)
    ));
    for property in object.properties() {
        out.push_str(&format!(
            "\t{} {} `{}:\"{}\"`\n",
            to_go_name(property.name(), ""),
            property.type_name(&options.suffix),
            options.annotation,
            property.name(),
        ));
    }
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::resolve::resolve;

    fn documents(values: &[Value]) -> Vec<Map<String, Value>> {
        values
            .iter()
            .map(|value| value.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_generate_nested_structs() {
        let schemas = resolve(&documents(&[json!({
            "id": "net",
            "description": "A virtual network.",
            "schema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "subnets": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"cidr": {"type": "string"}}
                        }
                    }
                }
            }
        })]))
        .unwrap();

        let source = generate_schema(&schemas[0], &GenerateOptions::default()).unwrap();
        assert_eq!(
            source,
            "// Net A virtual network.\n\
             type Net struct {\n\
             \tName string `json:\"name\"`\n\
             \tSubnets []NetSubnets `json:\"subnets\"`\n\
             }\n\
             type NetSubnets struct {\n\
             \tCidr string `json:\"cidr\"`\n\
             }\n"
        );
    }

    #[test]
    fn test_generate_applies_suffix_and_annotation() {
        let schemas = resolve(&documents(&[json!({
            "id": "net",
            "schema": {"type": "object", "properties": {"mtu": {"type": "integer"}}}
        })]))
        .unwrap();
        let options = GenerateOptions {
            package: "db".to_string(),
            suffix: "Row".to_string(),
            annotation: "db".to_string(),
        };

        let source = generate_all(&schemas, &options).unwrap();
        assert_eq!(
            source,
            "package db\n\ntype NetRow struct {\n\tMtu int64 `db:\"mtu\"`\n}\n"
        );
    }

    #[test]
    fn test_generate_all_rejects_struct_name_clash() {
        let schemas = resolve(&documents(&[
            json!({"id": "net", "schema": {"type": "object", "properties": {
                "config": {"type": "object"}}}}),
            json!({"id": "net_config", "schema": {}}),
        ]))
        .unwrap();

        let err = generate_all(&schemas, &GenerateOptions::default()).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &SchemaError::DuplicateObject("NetConfig".to_string())
        );
    }

    #[test]
    fn test_generate_all_emits_inherited_object_once() {
        let schemas = resolve(&documents(&[
            json!({"id": "net", "schema": {"type": "object", "properties": {
                "config": {"type": "object", "properties": {"mtu": {"type": "integer"}}}}}}),
            json!({"id": "vnet", "extends": ["net"], "schema": {}}),
        ]))
        .unwrap();

        let source = generate_all(&schemas, &GenerateOptions::default()).unwrap();
        assert_eq!(source.matches("type NetConfig struct {").count(), 1);
        assert!(source.contains("type Vnet struct {\n\tConfig NetConfig `json:\"config\"`\n}\n"));
    }

    #[test]
    fn test_generate_multiline_title_comment() {
        let schemas = resolve(&documents(&[json!({
            "id": "net",
            "title": "Virtual network.\nOne per tenant.",
            "schema": {}
        })]))
        .unwrap();

        let source = generate_schema(&schemas[0], &GenerateOptions::default()).unwrap();
        assert_eq!(
            source,
            "// Net Virtual network.\n// One per tenant.\ntype Net struct {\n}\n"
        );
    }
}
