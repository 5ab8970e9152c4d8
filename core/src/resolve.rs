//! Inheritance resolution over the `extends` graph.
//!
//! Each schema is a node with one edge to every base it declares. Schemas
//! are merged in dependency order, bases first, so a base has already
//! absorbed its own bases' fields by the time its dependents read it. Only
//! a base's direct fields are copied ([`BASE_FIELD_WINDOW`]); nesting below
//! them travels with the copied property.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use structgen_core::resolve;
//!
//! let documents: Vec<_> = [
//!     json!({"id": "a", "schema": {"type": "object", "properties": {
//!         "x": {"type": "string"}, "y": {"type": "string"}}}}),
//!     json!({"id": "b", "extends": ["a"], "schema": {"type": "object", "properties": {
//!         "y": {"type": "integer"}, "z": {"type": "boolean"}}}}),
//! ]
//! .iter()
//! .map(|doc| doc.as_object().cloned().unwrap())
//! .collect();
//!
//! let schemas = resolve(&documents).unwrap();
//! let b = &schemas[1];
//! assert_eq!(b.properties().names().collect::<Vec<_>>(), vec!["y", "z", "x"]);
//! assert_eq!(b.properties().get("y").unwrap().type_name(""), "int64");
//! ```

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Result, SchemaError};
use crate::property::Property;
use crate::schema::{Schema, parse_all};
use crate::set::NamedSet;

/// A `(limit, offset)` window for depth-bounded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthWindow {
    /// Levels left to descend; negative means unbounded.
    pub limit: i32,
    /// First level whose nodes are included.
    pub offset: i32,
}

impl DepthWindow {
    /// Every node at every depth, including the starting property.
    pub const ALL: DepthWindow = DepthWindow {
        limit: -1,
        offset: 0,
    };
}

/// Fields a dependent inherits from each direct base: the base root's
/// immediate properties, without the root itself.
pub const BASE_FIELD_WINDOW: DepthWindow = DepthWindow {
    limit: 2,
    offset: 1,
};

/// Parses every document and resolves inheritance.
///
/// Returns the resolved schemas in document order, or the first error.
pub fn resolve(documents: &[Map<String, Value>]) -> Result<Vec<Schema>> {
    let schemas = parse_all(documents)?;
    resolve_schemas(schemas)
}

/// Merges base fields into every schema of an already parsed batch.
///
/// The processing order is computed in full before anything is merged, so
/// an invalid or cyclic graph leaves every schema untouched.
///
/// # Errors
///
/// - [`SchemaError::InvalidBase`] for an unknown base or a base listed twice.
/// - [`SchemaError::CyclicInheritance`] when `extends` forms a cycle.
/// - [`SchemaError::MultipleBasesSameProperty`] when two bases of one schema
///   contribute the same field name.
pub fn resolve_schemas(schemas: NamedSet<Schema>) -> Result<Vec<Schema>> {
    let mut schemas = schemas.into_vec();
    let graph = InheritanceGraph::build(&schemas)?;
    let order = graph.processing_order()?;

    for index in order {
        let inherited = graph.inherited_fields(&schemas, index)?;
        if inherited.is_empty() {
            continue;
        }
        debug!(
            schema = schemas[index].id(),
            fields = ?inherited.names().collect::<Vec<_>>(),
            "merging inherited fields"
        );
        schemas[index].inherit(&inherited)?;
    }

    info!(schemas = schemas.len(), "resolved schema inheritance");
    Ok(schemas)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Schema → base edges, by position in the batch.
#[derive(Debug)]
struct InheritanceGraph {
    ids: Vec<String>,
    bases: Vec<Vec<usize>>,
}

impl InheritanceGraph {
    fn build(schemas: &[Schema]) -> Result<Self> {
        let positions: HashMap<&str, usize> = schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| (schema.id(), i))
            .collect();

        let mut bases = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let mut seen = HashSet::new();
            let mut edges = Vec::with_capacity(schema.bases().len());
            for base in schema.bases() {
                let invalid = |reason: String| {
                    SchemaError::InvalidBase(reason)
                        .context(format!("invalid schema {}", schema.id()))
                };
                let &position = positions
                    .get(base.as_str())
                    .ok_or_else(|| invalid(format!("schema {base} is not defined")))?;
                if !seen.insert(position) {
                    return Err(invalid(format!("schema {base} is listed more than once")));
                }
                edges.push(position);
            }
            bases.push(edges);
        }

        Ok(Self {
            ids: schemas.iter().map(|schema| schema.id().to_string()).collect(),
            bases,
        })
    }

    /// Depth-first order with every base before its dependents.
    fn processing_order(&self) -> Result<Vec<usize>> {
        let mut states = vec![VisitState::Unvisited; self.ids.len()];
        let mut stack = Vec::new();
        let mut order = Vec::with_capacity(self.ids.len());
        for node in 0..self.ids.len() {
            self.visit(node, &mut states, &mut stack, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        node: usize,
        states: &mut [VisitState],
        stack: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<()> {
        match states[node] {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => {
                let start = stack.iter().position(|&n| n == node).unwrap_or(0);
                let chain = stack[start..]
                    .iter()
                    .chain(std::iter::once(&node))
                    .map(|&n| self.ids[n].as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(SchemaError::CyclicInheritance(chain)
                    .context(format!("invalid schema {}", self.ids[node])));
            }
            VisitState::Unvisited => {}
        }

        states[node] = VisitState::InProgress;
        stack.push(node);
        for &base in &self.bases[node] {
            self.visit(base, states, stack, order)?;
        }
        stack.pop();
        states[node] = VisitState::Done;
        order.push(node);
        Ok(())
    }

    /// Direct fields of every base of `index`, merged in declaration order.
    fn inherited_fields(&self, schemas: &[Schema], index: usize) -> Result<NamedSet<Property>> {
        let mut merged = NamedSet::new();
        for &base in &self.bases[index] {
            let fields = schemas[base]
                .collect_properties(BASE_FIELD_WINDOW.limit, BASE_FIELD_WINDOW.offset)?;
            merged
                .safe_insert_all(fields.into_iter().cloned())
                .map_err(|e| {
                    SchemaError::MultipleBasesSameProperty {
                        schema: self.ids[index].clone(),
                        property: e.0,
                    }
                    .context(format!("invalid schema {}", self.ids[index]))
                })?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn documents(values: &[Value]) -> Vec<Map<String, Value>> {
        values
            .iter()
            .map(|value| value.as_object().cloned().unwrap())
            .collect()
    }

    fn object_schema(id: &str, extends: &[&str], fields: &[&str]) -> Value {
        let properties: Map<String, Value> = fields
            .iter()
            .map(|field| (field.to_string(), json!({"type": "string"})))
            .collect();
        json!({
            "id": id,
            "extends": extends,
            "schema": {"type": "object", "properties": properties}
        })
    }

    fn field_names(schema: &Schema) -> Vec<&str> {
        schema.properties().names().collect()
    }

    #[test]
    fn test_local_field_overrides_inherited() {
        let schemas = resolve(&documents(&[
            json!({"id": "a", "schema": {"type": "object", "properties": {
                "x": {"type": "string"}, "y": {"type": "string"}}}}),
            json!({"id": "b", "extends": ["a"], "schema": {"type": "object", "properties": {
                "y": {"type": "number"}, "z": {"type": "string"}}}}),
        ]))
        .unwrap();

        assert_eq!(field_names(&schemas[1]), vec!["y", "z", "x"]);
        assert_eq!(
            schemas[1].properties().get("y").unwrap().type_name(""),
            "float64"
        );
        assert_eq!(field_names(&schemas[0]), vec!["x", "y"]);
    }

    #[test]
    fn test_two_bases_with_same_field_fail() {
        let err = resolve(&documents(&[
            object_schema("b", &[], &["x"]),
            object_schema("c", &[], &["x"]),
            object_schema("d", &["b", "c"], &[]),
        ]))
        .unwrap_err();

        assert_eq!(
            err.root_cause(),
            &SchemaError::MultipleBasesSameProperty {
                schema: "d".to_string(),
                property: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_cycle_is_reported_with_chain() {
        let docs = documents(&[
            object_schema("a", &["b"], &["x"]),
            object_schema("b", &["a"], &["y"]),
        ]);
        let err = resolve(&docs).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &SchemaError::CyclicInheritance("a -> b -> a".to_string())
        );
    }

    #[test]
    fn test_cycle_behind_valid_base_still_fails() {
        let err = resolve(&documents(&[
            object_schema("root", &[], &["r"]),
            object_schema("a", &["root", "b"], &["x"]),
            object_schema("b", &["a"], &["y"]),
        ]))
        .unwrap_err();
        assert_eq!(
            err.root_cause(),
            &SchemaError::CyclicInheritance("a -> b -> a".to_string())
        );
    }

    #[test]
    fn test_self_extension_is_a_cycle() {
        let err = resolve(&documents(&[object_schema("a", &["a"], &[])])).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &SchemaError::CyclicInheritance("a -> a".to_string())
        );
    }

    #[test]
    fn test_inheritance_is_transitive() {
        let schemas = resolve(&documents(&[
            object_schema("c", &["b"], &["z"]),
            object_schema("b", &["a"], &["y"]),
            object_schema("a", &[], &["x"]),
        ]))
        .unwrap();

        assert_eq!(schemas[0].id(), "c");
        assert_eq!(field_names(&schemas[0]), vec!["z", "y", "x"]);
        assert_eq!(field_names(&schemas[1]), vec!["y", "x"]);
    }

    #[test]
    fn test_diamond_reports_ambiguous_field() {
        let err = resolve(&documents(&[
            object_schema("a", &[], &["x"]),
            object_schema("b", &["a"], &[]),
            object_schema("c", &["a"], &[]),
            object_schema("d", &["b", "c"], &[]),
        ]))
        .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SchemaError::MultipleBasesSameProperty { property, .. } if property == "x"
        ));
    }

    #[test]
    fn test_unknown_base_is_invalid() {
        let err = resolve(&documents(&[object_schema("a", &["missing"], &[])])).unwrap_err();
        assert!(matches!(err.root_cause(), SchemaError::InvalidBase(_)));
        assert!(err.to_string().starts_with("invalid schema a:"));
    }

    #[test]
    fn test_repeated_base_is_invalid() {
        let err = resolve(&documents(&[
            object_schema("a", &[], &["x"]),
            object_schema("b", &["a", "a"], &[]),
        ]))
        .unwrap_err();
        assert!(matches!(err.root_cause(), SchemaError::InvalidBase(_)));
    }

    #[test]
    fn test_only_direct_fields_are_inherited() {
        let schemas = resolve(&documents(&[
            json!({"id": "a", "schema": {"type": "object", "properties": {
                "config": {"type": "object", "properties": {"mtu": {"type": "integer"}}}}}}),
            json!({"id": "b", "extends": ["a"], "schema": {}}),
        ]))
        .unwrap();

        let b = &schemas[1];
        assert_eq!(field_names(b), vec!["config"]);
        let config = b.properties().get("config").unwrap().as_object().unwrap();
        assert_eq!(config.properties().names().collect::<Vec<_>>(), vec!["mtu"]);
        assert_eq!(b.properties().get("config").unwrap().type_name(""), "AConfig");
    }

    #[test]
    fn test_parent_field_is_inherited() {
        let schemas = resolve(&documents(&[
            json!({"id": "port", "parent": "device", "schema": {"type": "object", "properties": {
                "name": {"type": "string"}}}}),
            json!({"id": "uplink", "extends": ["port"], "schema": {}}),
        ]))
        .unwrap();
        assert_eq!(field_names(&schemas[1]), vec!["name", "device_id"]);
    }
}
