//! Typed nodes of the schema tree.
//!
//! An [`Item`] is one of three variants:
//!
//! - [`Item::Scalar`]: a primitive with no children.
//! - [`Item::Array`]: exactly one element item, read from `items`.
//! - [`Item::Object`]: a set of uniquely named [`Property`] values, read
//!   from `properties`.
//!
//! Every operation matches the variants explicitly; there is no way to add
//! a new kind of node from outside this module.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::naming::{join_path, to_go_name};
use crate::property::Property;
use crate::set::{Named, NamedSet};

/// Primitive kinds recognized in the `type` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    /// Untyped value.
    Any,
}

impl ScalarKind {
    /// The marker used for this kind in schema documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Any => "any",
        }
    }

    /// The Go type emitted for this kind.
    pub fn go_type(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "int64",
            ScalarKind::Number => "float64",
            ScalarKind::Boolean => "bool",
            ScalarKind::Any => "interface{}",
        }
    }
}

/// An object node: its dotted path and its properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    path: String,
    go_name: String,
    root: bool,
    properties: NamedSet<Property>,
}

impl Object {
    /// Dotted path of the object inside its schema, starting with the
    /// schema id.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this is the root object of a schema.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Declared and merged properties, in order.
    pub fn properties(&self) -> &NamedSet<Property> {
        &self.properties
    }

    /// Generated type name of this object with `suffix` appended.
    pub fn type_name(&self, suffix: &str) -> String {
        to_go_name(&self.path, suffix)
    }

    fn parse(
        &mut self,
        path: &str,
        depth: usize,
        is_root: bool,
        raw: &Map<String, Value>,
    ) -> Result<()> {
        self.path = path.to_string();
        self.go_name = to_go_name(path, "");
        self.root = is_root;

        let properties = match raw.get("properties") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(SchemaError::WrongFieldType {
                    field: join_path(path, "properties"),
                    expected: "a mapping",
                });
            }
        };

        for (name, body) in properties {
            if name.is_empty() {
                return Err(SchemaError::WrongFieldType {
                    field: join_path(path, "properties"),
                    expected: "a mapping with non-empty names",
                });
            }
            let body = body.as_object().ok_or_else(|| SchemaError::WrongFieldType {
                field: join_path(path, name),
                expected: "a mapping",
            })?;
            let property = Property::parse(name.as_str(), path, depth + 1, false, body)?;
            self.properties
                .safe_insert(property)
                .map_err(|e| SchemaError::DuplicateProperty(e.0))?;
        }
        Ok(())
    }

    fn add_properties(&mut self, properties: &NamedSet<Property>, safe: bool) -> Result<()> {
        if safe {
            let existing = properties
                .names()
                .find(|name| self.properties.contains(name));
            if let Some(existing) = existing {
                return Err(SchemaError::DuplicateProperty(existing.to_string()));
            }
        }
        for property in properties {
            if self.properties.contains(property.name()) {
                debug!(object = %self.path, property = property.name(), "keeping local property");
                continue;
            }
            self.properties.insert(property.clone());
        }
        Ok(())
    }

    fn collect_objects(&self, limit: i32, offset: i32) -> Result<NamedSet<&Object>> {
        let mut result = NamedSet::new();
        if limit == 0 {
            return Ok(result);
        }
        if offset <= 0 {
            result
                .safe_insert(self)
                .map_err(|e| SchemaError::DuplicateObject(e.0))?;
        }
        for property in &self.properties {
            let nested = property
                .item()
                .collect_objects(limit.saturating_sub(1), offset.saturating_sub(1))?;
            result
                .safe_insert_all(nested)
                .map_err(|e| SchemaError::DuplicateObject(e.0))?;
        }
        Ok(result)
    }

    fn collect_properties(&self, limit: i32, offset: i32) -> Result<NamedSet<&Property>> {
        let mut result = NamedSet::new();
        for property in &self.properties {
            let nested = property.collect_properties(limit, offset)?;
            result
                .safe_insert_all(nested)
                .map_err(|e| SchemaError::DuplicateProperty(e.0))?;
        }
        Ok(result)
    }
}

impl Named for Object {
    /// Objects are keyed by their generated type name.
    fn name(&self) -> &str {
        &self.go_name
    }
}

/// A typed node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Scalar(ScalarKind),
    Array(Box<Item>),
    Object(Object),
}

impl Item {
    /// Creates an empty item for a `type` marker.
    ///
    /// Objects start without properties and arrays start with an untyped
    /// element; [`Item::parse`] fills both in.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownType`] if the marker is not a string naming
    /// `object`, `array` or one of the [`ScalarKind`] markers.
    pub fn create(raw_type: &Value) -> Result<Item> {
        let item = match raw_type.as_str() {
            Some("object") => Item::Object(Object::default()),
            Some("array") => Item::Array(Box::new(Item::Scalar(ScalarKind::Any))),
            Some("string") => Item::Scalar(ScalarKind::String),
            Some("integer") => Item::Scalar(ScalarKind::Integer),
            Some("number") => Item::Scalar(ScalarKind::Number),
            Some("boolean") => Item::Scalar(ScalarKind::Boolean),
            Some("any") => Item::Scalar(ScalarKind::Any),
            _ => return Err(SchemaError::UnknownType(raw_type.to_string())),
        };
        Ok(item)
    }

    /// Fills the item in from its descriptor.
    ///
    /// `path` is the dotted path of the node, used for diagnostics and for
    /// naming object types.
    pub fn parse(
        &mut self,
        path: &str,
        depth: usize,
        is_root: bool,
        raw: &Map<String, Value>,
    ) -> Result<()> {
        match self {
            Item::Scalar(_) => Ok(()),
            Item::Array(element) => {
                let items_path = join_path(path, "items");
                let body = match raw.get("items") {
                    None => return Err(SchemaError::MissingField(items_path)),
                    Some(Value::Object(body)) => body,
                    Some(_) => {
                        return Err(SchemaError::WrongFieldType {
                            field: items_path,
                            expected: "a mapping",
                        });
                    }
                };
                **element = parse_item(path, depth, false, body)?;
                Ok(())
            }
            Item::Object(object) => object.parse(path, depth, is_root, raw),
        }
    }

    /// Injects properties into an object item.
    ///
    /// With `safe`, a name already present is an error and nothing is
    /// inserted. Without it, the existing property wins and the incoming one
    /// is dropped.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotAnObject`] for scalar and array items,
    /// [`SchemaError::DuplicateProperty`] on a collision when `safe`.
    pub fn add_properties(&mut self, properties: &NamedSet<Property>, safe: bool) -> Result<()> {
        match self {
            Item::Object(object) => object.add_properties(properties, safe),
            other => Err(SchemaError::NotAnObject(other.kind_name().to_string())),
        }
    }

    /// Collects object items within the `(limit, offset)` depth window.
    pub fn collect_objects(&self, limit: i32, offset: i32) -> Result<NamedSet<&Object>> {
        match self {
            Item::Scalar(_) => Ok(NamedSet::new()),
            Item::Array(element) => element.collect_objects(limit, offset),
            Item::Object(object) => object.collect_objects(limit, offset),
        }
    }

    /// Collects properties below this item within the `(limit, offset)`
    /// depth window.
    pub fn collect_properties(&self, limit: i32, offset: i32) -> Result<NamedSet<&Property>> {
        match self {
            Item::Scalar(_) => Ok(NamedSet::new()),
            Item::Array(element) => element.collect_properties(limit, offset),
            Item::Object(object) => object.collect_properties(limit, offset),
        }
    }

    /// Type descriptor used by the Go emitter.
    ///
    /// Object types get `suffix` appended; arrays carry it through to their
    /// element.
    pub fn type_name(&self, suffix: &str) -> String {
        match self {
            Item::Scalar(kind) => kind.go_type().to_string(),
            Item::Array(element) => format!("[]{}", element.type_name(suffix)),
            Item::Object(object) => object.type_name(suffix),
        }
    }

    /// Returns `true` for the [`Item::Object`] variant.
    pub fn is_object(&self) -> bool {
        matches!(self, Item::Object(_))
    }

    /// The object payload, if this is an [`Item::Object`].
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Item::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Scalar(kind) => kind.as_str(),
            Item::Array(_) => "array",
            Item::Object(_) => "object",
        }
    }
}

/// Reads the `type` marker of a descriptor, creates the matching item and
/// parses it.
pub(crate) fn parse_item(
    path: &str,
    depth: usize,
    is_root: bool,
    raw: &Map<String, Value>,
) -> Result<Item> {
    let raw_type = raw
        .get("type")
        .ok_or_else(|| SchemaError::MissingField(path.to_string()))?;
    let mut item = Item::create(raw_type).map_err(|e| e.context(format!("property {path}")))?;
    item.parse(path, depth, is_root, raw)?;
    debug!(path, depth, kind = item.kind_name(), "parsed item");
    Ok(item)
}
