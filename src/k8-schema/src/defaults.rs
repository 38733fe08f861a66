use serde_json::Map;
use serde_json::Value;

use crate::ObjectSchema;
use crate::SchemaKind;
use crate::SchemaNode;

impl SchemaNode {
    /// starting value for form field.
    /// numbers start unset (`null`) so 0 stays a real user value
    pub fn build_default(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match &self.kind {
            SchemaKind::String => Value::String(String::new()),
            SchemaKind::Integer | SchemaKind::Number => Value::Null,
            SchemaKind::Boolean => Value::Bool(false),
            SchemaKind::Array(_) => Value::Array(vec![]),
            SchemaKind::Object(object) => object.build_default(),
        }
    }
}

impl ObjectSchema {
    pub fn build_default(&self) -> Value {
        let mut fields = Map::new();
        for (name, node) in self.properties() {
            fields.insert(name.to_owned(), node.build_default());
        }
        Value::Object(fields)
    }
}

pub fn build_default(node: &SchemaNode) -> Value {
    node.build_default()
}
