//! Named bindings of items inside an object.
//!
//! A [`Property`] is where depth windows are applied: it sits at level 0 of
//! its own traversal and decides whether it is part of the result.

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::item::{Item, Object, ScalarKind, parse_item};
use crate::naming::join_path;
use crate::set::{Named, NamedSet};

/// A named item inside an owning object.
///
/// The property owns its item outright; sets of borrowed properties are
/// only ever views used for traversal and deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    item: Item,
}

impl Property {
    /// Creates a property binding `item` under `name`.
    pub fn new(name: impl Into<String>, item: Item) -> Self {
        Self {
            name: name.into(),
            item,
        }
    }

    /// Creates a string-typed property, as used for injected id fields.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Item::Scalar(ScalarKind::String))
    }

    /// Builds a property from its descriptor.
    ///
    /// `prefix` is the dotted path of the owning object (empty for a schema
    /// root); the property's own path is `prefix.name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingField`] when a node has no `type`,
    /// [`SchemaError::UnknownType`] (wrapped with the property path) when a
    /// marker is not recognized, and [`SchemaError::WrongFieldType`] for
    /// malformed `properties` or `items` values.
    pub fn parse(
        name: impl Into<String>,
        prefix: &str,
        depth: usize,
        is_root: bool,
        raw: &Map<String, Value>,
    ) -> Result<Self> {
        let name = name.into();
        let path = join_path(prefix, &name);
        let item = parse_item(&path, depth, is_root, raw)?;
        Ok(Self { name, item })
    }

    /// The field name as declared in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The typed node bound to this name.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Returns `true` if the item is an object.
    pub fn is_object(&self) -> bool {
        self.item.is_object()
    }

    /// The item as an object, if it is one.
    pub fn as_object(&self) -> Option<&Object> {
        self.item.as_object()
    }

    /// See [`Item::add_properties`].
    pub fn add_properties(&mut self, properties: &NamedSet<Property>, safe: bool) -> Result<()> {
        self.item
            .add_properties(properties, safe)
            .map_err(|e| match e {
                SchemaError::NotAnObject(_) => {
                    SchemaError::NotAnObject(format!("property {}", self.name))
                }
                other => other,
            })
    }

    /// See [`Item::collect_objects`].
    pub fn collect_objects(&self, limit: i32, offset: i32) -> Result<NamedSet<&Object>> {
        self.item.collect_objects(limit, offset)
    }

    /// Collects this property and the properties below it within a depth
    /// window.
    ///
    /// `limit` bounds how many levels are descended (negative means no
    /// bound) and `offset` is the first level whose properties are
    /// included; both drop by one per level. This property sits at level 0,
    /// so it is included when `offset <= 0`. A `limit` of 0 yields nothing.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateProperty`] when two collected properties
    /// share a name.
    pub fn collect_properties(&self, limit: i32, offset: i32) -> Result<NamedSet<&Property>> {
        if limit == 0 {
            return Ok(NamedSet::new());
        }
        let mut result = self
            .item
            .collect_properties(limit.saturating_sub(1), offset.saturating_sub(1))?;
        if offset <= 0 {
            result
                .safe_insert(self)
                .map_err(|e| SchemaError::DuplicateProperty(e.0))?;
        }
        Ok(result)
    }

    /// Type descriptor of the property's item; see [`Item::type_name`].
    pub fn type_name(&self, suffix: &str) -> String {
        self.item.type_name(suffix)
    }
}

impl Named for Property {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn three_levels() -> Property {
        let raw = json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "object",
                    "properties": {
                        "b": {
                            "type": "object",
                            "properties": {"c": {"type": "string"}}
                        },
                        "d": {"type": "integer"}
                    }
                },
                "e": {"type": "boolean"}
            }
        });
        Property::parse("root", "", 0, true, raw.as_object().unwrap()).unwrap()
    }

    #[test]
    fn test_zero_limit_collects_nothing() {
        let root = three_levels();
        for offset in [-3, -1, 0, 1, 5] {
            assert!(root.collect_properties(0, offset).unwrap().is_empty());
        }
    }

    #[test]
    fn test_extreme_negative_window_is_unbounded() {
        let root = three_levels();
        let unbounded = root.collect_properties(-1, 0).unwrap();

        let collected = root.collect_properties(i32::MIN, 0).unwrap();
        assert_eq!(collected, unbounded);
        let collected = root.collect_properties(i32::MIN, i32::MIN).unwrap();
        assert_eq!(collected, unbounded);
    }

    #[test]
    fn test_unlimited_collects_every_property_once() {
        let root = three_levels();
        let collected = root.collect_properties(-1, 0).unwrap();
        let mut names: Vec<_> = collected.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "root"]);
    }

    #[test]
    fn test_direct_field_window() {
        let root = three_levels();
        let collected = root.collect_properties(2, 1).unwrap();
        assert_eq!(collected.names().collect::<Vec<_>>(), vec!["a", "e"]);
    }

    #[test]
    fn test_offset_skips_upper_levels() {
        let root = three_levels();
        let collected = root.collect_properties(-1, 2).unwrap();
        let mut names: Vec<_> = collected.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_collect_rejects_nested_name_collision() {
        let raw = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "inner": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        });
        let root = Property::parse("root", "", 0, true, raw.as_object().unwrap()).unwrap();

        let err = root.collect_properties(-1, 0).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateProperty("name".to_string()));
        assert_eq!(root.collect_properties(2, 1).unwrap().len(), 2);
    }

    #[test]
    fn test_add_properties_names_property_on_non_object() {
        let mut property = Property::string("device_id");
        let err = property.add_properties(&NamedSet::new(), false).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NotAnObject("property device_id".to_string())
        );
    }
}
