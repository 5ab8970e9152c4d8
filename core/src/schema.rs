//! Top-level schema documents.
//!
//! A [`Schema`] is parsed from one decoded document:
//!
//! ```yaml
//! id: port
//! parent: device
//! extends: [base]
//! schema:
//!   type: object
//!   properties:
//!     name:
//!       type: string
//! ```
//!
//! Parsing validates the document in a fixed order and stops at the first
//! problem. A non-empty `parent` injects a `<parent>_id` string field.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::item::Object;
use crate::naming::join_name;
use crate::property::Property;
use crate::set::{Named, NamedSet};

/// One parsed schema: id, relations and the root object property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    id: String,
    parent: Option<String>,
    extends: Vec<String>,
    title: Option<String>,
    description: Option<String>,
    root: Property,
}

impl Schema {
    /// Parses and validates one schema document.
    ///
    /// Every error is wrapped with `invalid schema <id>`, or
    /// `invalid schema unknown` when the id itself is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use structgen_core::Schema;
    ///
    /// let raw = json!({
    ///     "id": "port",
    ///     "parent": "device",
    ///     "schema": {
    ///         "type": "object",
    ///         "properties": {"name": {"type": "string"}}
    ///     }
    /// });
    /// let schema = Schema::parse(raw.as_object().unwrap()).unwrap();
    /// assert_eq!(schema.id(), "port");
    /// assert_eq!(
    ///     schema.properties().names().collect::<Vec<_>>(),
    ///     vec!["name", "device_id"]
    /// );
    /// ```
    pub fn parse(raw: &Map<String, Value>) -> Result<Self> {
        let id = match raw.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(SchemaError::MissingField("id".to_string())
                    .context("invalid schema unknown"));
            }
        };
        Self::parse_body(&id, raw).map_err(|e| e.context(format!("invalid schema {id}")))
    }

    fn parse_body(id: &str, raw: &Map<String, Value>) -> Result<Self> {
        let parent = optional_string(raw, "parent")?.filter(|parent| !parent.is_empty());
        let extends = read_bases(raw)?;
        let title = optional_string(raw, "title")?;
        let description = optional_string(raw, "description")?;

        let default_body;
        let body = match raw.get("schema") {
            None => return Err(SchemaError::MissingField("schema".to_string())),
            Some(Value::Object(body)) if !body.is_empty() => body,
            Some(Value::Object(_)) | Some(Value::Null) => {
                default_body = default_schema_body();
                &default_body
            }
            Some(_) => {
                return Err(SchemaError::WrongFieldType {
                    field: "schema".to_string(),
                    expected: "a mapping",
                });
            }
        };

        let mut root = Property::parse(id, "", 0, true, body)?;
        if !root.is_object() {
            return Err(SchemaError::NotAnObject("schema".to_string()));
        }

        if let Some(parent) = &parent {
            let mut injected = NamedSet::new();
            injected.insert(Property::string(join_name(parent, "id")));
            root.add_properties(&injected, true)?;
        }

        debug!(schema = id, ?parent, bases = ?extends, "parsed schema");
        Ok(Self {
            id: id.to_string(),
            parent,
            extends,
            title,
            description,
            root,
        })
    }

    /// Unique schema id; also the root property's name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the referenced parent schema, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared base schema ids, in declaration order.
    pub fn bases(&self) -> &[String] {
        &self.extends
    }

    /// Optional human-readable title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Optional description, emitted as the struct's doc comment.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The root property, named after the schema id.
    pub fn root(&self) -> &Property {
        &self.root
    }

    /// The root object.
    pub fn object(&self) -> &Object {
        match self.root.as_object() {
            Some(object) => object,
            None => unreachable!("schema root is always an object"),
        }
    }

    /// Direct fields of the root object, in order.
    pub fn properties(&self) -> &NamedSet<Property> {
        self.object().properties()
    }

    /// See [`Property::collect_objects`]; errors carry the schema id.
    pub fn collect_objects(&self, limit: i32, offset: i32) -> Result<NamedSet<&Object>> {
        self.root
            .collect_objects(limit, offset)
            .map_err(|e| e.context(format!("invalid schema {}", self.id)))
    }

    /// See [`Property::collect_properties`]; errors carry the schema id.
    pub fn collect_properties(&self, limit: i32, offset: i32) -> Result<NamedSet<&Property>> {
        self.root
            .collect_properties(limit, offset)
            .map_err(|e| e.context(format!("invalid schema {}", self.id)))
    }

    /// Adds inherited fields; fields the schema already has win.
    pub(crate) fn inherit(&mut self, properties: &NamedSet<Property>) -> Result<()> {
        self.root
            .add_properties(properties, false)
            .map_err(|e| e.context(format!("schema {}", self.id)))
    }

    /// Flattened view of the schema: id and ordered fields with their type
    /// descriptors.
    pub fn summary(&self, suffix: &str) -> SchemaSummary {
        SchemaSummary {
            id: self.id.clone(),
            parent: self.parent.clone(),
            extends: self.extends.clone(),
            fields: self
                .properties()
                .iter()
                .map(|property| FieldSummary {
                    name: property.name().to_string(),
                    type_name: property.type_name(suffix),
                })
                .collect(),
        }
    }
}

impl Named for Schema {
    fn name(&self) -> &str {
        &self.id
    }
}

/// Serializable flattened view of a resolved schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    pub fields: Vec<FieldSummary>,
}

/// One flattened field: original name and type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Parses every document and rejects repeated ids.
///
/// Stops at the first document that fails.
pub fn parse_all(documents: &[Map<String, Value>]) -> Result<NamedSet<Schema>> {
    let mut schemas = NamedSet::new();
    for document in documents {
        let schema = Schema::parse(document)?;
        let id = schema.id().to_string();
        schemas
            .safe_insert(schema)
            .map_err(|_| SchemaError::DuplicateSchema(id))?;
    }
    Ok(schemas)
}

fn default_schema_body() -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("type".to_string(), json!("object"));
    body
}

fn optional_string(raw: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(SchemaError::WrongFieldType {
            field: key.to_string(),
            expected: "a string",
        }),
    }
}

fn read_bases(raw: &Map<String, Value>) -> Result<Vec<String>> {
    let bases = match raw.get("extends") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(bases)) => bases,
        Some(_) => {
            return Err(SchemaError::InvalidBase(
                "extends should be a sequence of schema ids".to_string(),
            ));
        }
    };
    bases
        .iter()
        .map(|base| {
            base.as_str().map(String::from).ok_or_else(|| {
                SchemaError::InvalidBase("one of the base schemas is not a string".to_string())
            })
        })
        .collect()
}
