//! Error types for schema parsing and inheritance resolution.
//!
//! Errors are raised where a violation is detected and wrapped with a
//! property path or schema id as they unwind, so the `Display` output reads
//! as a single diagnostic chain:
//!
//! ```text
//! invalid schema port: property port.config: unknown type: "map"
//! ```

use thiserror::Error;

/// Errors produced while parsing, resolving or emitting schemas.
///
/// Match on [`SchemaError::root_cause`] to inspect the underlying problem
/// without caring how much context was layered on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required key is absent. Holds the dotted location of the key.
    #[error("missing field {0}")]
    MissingField(String),
    /// A key is present but holds a value of the wrong shape.
    #[error("field {field} should be {expected}")]
    WrongFieldType {
        field: String,
        expected: &'static str,
    },
    /// The `type` marker is not one of the recognized kinds.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// An operation that needs an object was applied to something else.
    #[error("{0} should be an object")]
    NotAnObject(String),
    /// Two properties with the same name would end up in one object.
    #[error("multiple properties with the same name: {0}")]
    DuplicateProperty(String),
    /// Two object types would generate the same type name.
    #[error("multiple objects with the same name: {0}")]
    DuplicateObject(String),
    /// Two schemas share an id.
    #[error("multiple schemas with the same name: {0}")]
    DuplicateSchema(String),
    /// The `extends` list is malformed or names an unknown schema.
    #[error("invalid base schema: {0}")]
    InvalidBase(String),
    /// Two different bases contribute a field with the same name.
    #[error("multiple properties with the same name in bases of schema {schema}: {property}")]
    MultipleBasesSameProperty { schema: String, property: String },
    /// The `extends` relation contains a cycle. Holds the offending chain.
    #[error("cyclic inheritance: {0}")]
    CyclicInheritance(String),
    /// Wraps an inner error with a property path or schema id.
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Wraps this error with additional context.
    pub fn context(self, context: impl Into<String>) -> Self {
        SchemaError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every [`SchemaError::Context`]
    /// layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use structgen_core::SchemaError;
    ///
    /// let err = SchemaError::UnknownType("\"map\"".into())
    ///     .context("property port.config")
    ///     .context("invalid schema port");
    /// assert!(matches!(err.root_cause(), SchemaError::UnknownType(_)));
    /// assert_eq!(
    ///     err.to_string(),
    ///     "invalid schema port: property port.config: unknown type: \"map\""
    /// );
    /// ```
    pub fn root_cause(&self) -> &SchemaError {
        let mut current = self;
        while let SchemaError::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
