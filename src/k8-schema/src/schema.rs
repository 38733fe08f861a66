//!
//! # Schema Model
//!
//! Typed representation of the openAPIV3Schema subset used by plugin CRDs.
//! Object and array payloads live inside [`SchemaKind`] so `items` only exists
//! for arrays and `properties`/`required` only exist for objects.
//!
use serde_json::Map;
use serde_json::Value;
use tracing::trace;
use tracing::warn;

use crate::SchemaError;

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub description: Option<String>,
    pub format: Option<String>,
    pub default: Option<Value>,
    pub enum_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Object(ObjectSchema),
    Array(Box<SchemaNode>),
}

/// properties of object node, kept in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    properties: Vec<(String, SchemaNode)>,
    required: Vec<String>,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            format: None,
            default: None,
            enum_values: vec![],
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn object(object: ObjectSchema) -> Self {
        Self::new(SchemaKind::Object(object))
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(SchemaKind::Array(Box::new(items)))
    }

    /// builder style setter for explicit default
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SchemaKind::String => "string",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Object(_) => "object",
            SchemaKind::Array(_) => "array",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// parse openAPIV3Schema document
    pub fn from_openapi(doc: &Value) -> Result<Self, SchemaError> {
        Self::parse_at(doc, "")
    }

    pub(crate) fn parse_at(doc: &Value, at: &str) -> Result<Self, SchemaError> {
        let fields = doc.as_object().ok_or_else(|| SchemaError::NotAMapping {
            at: display_at(at),
        })?;

        let kind = match fields.get("type").and_then(Value::as_str) {
            Some("string") => SchemaKind::String,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some("object") => SchemaKind::Object(ObjectSchema::parse_fields(fields, at)?),
            Some("array") => SchemaKind::Array(Box::new(parse_items(fields, at)?)),
            Some(other) => {
                return Err(SchemaError::UnsupportedType {
                    type_name: other.to_owned(),
                    at: display_at(at),
                })
            }
            None if fields.contains_key("properties") => {
                SchemaKind::Object(ObjectSchema::parse_fields(fields, at)?)
            }
            None if fields.contains_key("items") => {
                SchemaKind::Array(Box::new(parse_items(fields, at)?))
            }
            // int-or-string and untyped leaves are edited as text
            None => SchemaKind::String,
        };

        let node = Self {
            kind,
            description: fields
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
            format: fields.get("format").and_then(Value::as_str).map(str::to_owned),
            default: fields.get("default").cloned(),
            enum_values: fields
                .get("enum")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        };
        trace!("schema node at '{}': {}", display_at(at), node.type_name());
        Ok(node)
    }
}

impl ObjectSchema {
    /// build object schema. required names without matching property are dropped
    pub fn new(properties: Vec<(String, SchemaNode)>, required: Vec<String>) -> Self {
        let required = required
            .into_iter()
            .filter(|name| {
                let known = properties.iter().any(|(property, _)| property == name);
                if !known {
                    warn!("required field '{}' has no property definition, ignoring", name);
                }
                known
            })
            .collect();
        Self {
            properties,
            required,
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.properties
            .iter()
            .map(|(name, node)| (name.as_str(), node))
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, node)| node)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// parse object schema, `doc` must be mapping
    pub fn from_openapi(doc: &Value) -> Result<Self, SchemaError> {
        Self::parse_object_at(doc, "")
    }

    pub(crate) fn parse_object_at(doc: &Value, at: &str) -> Result<Self, SchemaError> {
        let node = SchemaNode::parse_at(doc, at)?;
        match node.kind {
            SchemaKind::Object(object) => Ok(object),
            _ => Err(SchemaError::NotAnObject { at: display_at(at) }),
        }
    }

    fn parse_fields(fields: &Map<String, Value>, at: &str) -> Result<Self, SchemaError> {
        let mut properties = vec![];
        if let Some(declared) = fields.get("properties").and_then(Value::as_object) {
            for (name, property) in declared {
                let node = SchemaNode::parse_at(property, &join_at(at, name))?;
                properties.push((name.to_owned(), node));
            }
        }

        let required = fields
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self::new(properties, required))
    }
}

fn parse_items(fields: &Map<String, Value>, at: &str) -> Result<SchemaNode, SchemaError> {
    match fields.get("items") {
        Some(items) => SchemaNode::parse_at(items, &format!("{}[]", at)),
        None => {
            warn!("array at '{}' has no items, treating items as string", display_at(at));
            Ok(SchemaNode::string())
        }
    }
}

fn join_at(at: &str, name: &str) -> String {
    if at.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", at, name)
    }
}

fn display_at(at: &str) -> String {
    if at.is_empty() {
        "<root>".to_owned()
    } else {
        at.to_owned()
    }
}
