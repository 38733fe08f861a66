//!
//! # Form state
//!
//! Field values edited by create and edit views. Values live in one spec
//! document addressed by dotted field paths; on submit the document is
//! stripped of empty values and checked against the schema `required` sets.
//!
use serde_json::Map;
use serde_json::Value;

use k8_schema::layout::FieldGroup;
use k8_schema::InstanceMeta;
use k8_schema::ObjectSchema;
use k8_schema::SchemaNode;

use crate::ViewError;

#[derive(Debug, Clone)]
pub struct FormState {
    schema: ObjectSchema,
    groups: Vec<FieldGroup>,
    namespaced: bool,
    pub name: String,
    pub namespace: String,
    values: Value,
}

impl FormState {
    pub fn new(
        schema: &ObjectSchema,
        groups: Vec<FieldGroup>,
        namespaced: bool,
        values: Value,
    ) -> Self {
        Self {
            schema: schema.clone(),
            groups,
            namespaced,
            name: String::new(),
            namespace: String::new(),
            values,
        }
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    /// value at dotted path such as `tls.secretName`
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.values, |value, key| value.get(key))
    }

    /// set value at dotted path, creating intermediate objects
    pub fn set(&mut self, path: &str, value: Value) {
        let keys: Vec<&str> = path.split('.').collect();
        set_at(&mut self.values, &keys, value);
    }

    /// spec document as it will be written
    pub fn spec(&self) -> Value {
        strip_empty(&self.values).unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn metadata(&self) -> InstanceMeta {
        let namespace = if self.namespaced {
            Some(self.namespace.trim().to_owned())
        } else {
            None
        };
        InstanceMeta::new(self.name.trim().to_owned(), namespace)
    }

    pub fn validate(&self) -> Result<(), ViewError> {
        let mut problems = vec![];
        if self.name.trim().is_empty() {
            problems.push("name is required".to_owned());
        }
        if self.namespaced && self.namespace.trim().is_empty() {
            problems.push("namespace is required".to_owned());
        }
        missing_required(&self.schema, &self.spec(), "", &mut problems);

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ViewError::Validation(problems))
        }
    }
}

fn set_at(target: &mut Value, keys: &[&str], value: Value) {
    let (key, rest) = match keys.split_first() {
        Some(split) => split,
        None => {
            *target = value;
            return;
        }
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(fields) = target {
        let slot = fields.entry(key.to_string()).or_insert(Value::Null);
        set_at(slot, rest, value);
    }
}

/// nested objects are checked only when they hold content
fn missing_required(schema: &ObjectSchema, values: &Value, prefix: &str, problems: &mut Vec<String>) {
    for (name, node) in schema.properties() {
        let path = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{}", prefix, name)
        };
        match values.get(name) {
            None => {
                if schema.is_required(name) {
                    problems.push(format!("{} is required", path));
                }
            }
            Some(value) => nested_required(node, value, &path, problems),
        }
    }
}

/// walk into objects and array items, elements are addressed as `ports[0]`
fn nested_required(node: &SchemaNode, value: &Value, path: &str, problems: &mut Vec<String>) {
    if let Some(object) = node.as_object() {
        missing_required(object, value, path, problems);
    } else if let (Some(items), Value::Array(elements)) = (node.items(), value) {
        for (idx, element) in elements.iter().enumerate() {
            nested_required(items, element, &format!("{}[{}]", path, idx), problems);
        }
    }
}

/// drop empty strings, nulls, empty arrays and objects left empty after
/// stripping their members. `None` if nothing remains
pub fn strip_empty(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::Array(items) => {
            let kept: Vec<Value> = items.iter().filter_map(strip_empty).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Array(kept))
            }
        }
        Value::Object(fields) => {
            let mut kept = Map::new();
            for (name, field) in fields {
                if let Some(field) = strip_empty(field) {
                    kept.insert(name.clone(), field);
                }
            }
            if kept.is_empty() {
                None
            } else {
                Some(Value::Object(kept))
            }
        }
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_schema::layout::read_groups;
    use k8_schema::ObjectSchema;
    use k8_schema::SchemaNode;

    use super::strip_empty;
    use super::FormState;
    use crate::fixture::registry;

    fn widget_form() -> FormState {
        let registry = registry();
        let widget = registry.get_kind("widgets", "Widget").expect("widget");
        let plugin = registry.get("widgets").expect("plugin");
        let groups = read_groups(&widget.spec_schema, plugin.hints("Widget"));
        FormState::new(
            &widget.spec_schema,
            groups,
            widget.is_namespaced(),
            widget.spec_schema.build_default(),
        )
    }

    #[test]
    fn test_strip_empty() {
        let values = json!({
            "size": "small",
            "color": "",
            "replicas": null,
            "internal": false,
            "count": 0,
            "hosts": [],
            "names": ["", "a", null],
            "tls": { "secretName": "", "hosts": [] },
            "labels": {},
            "nested": { "inner": { "leaf": "" }, "keep": "x" }
        });
        assert_eq!(
            strip_empty(&values),
            Some(json!({
                "size": "small",
                "internal": false,
                "count": 0,
                "names": ["a"],
                "nested": { "keep": "x" }
            }))
        );
        assert_eq!(strip_empty(&json!({ "a": { "b": [] } })), None);
    }

    #[test]
    fn test_dotted_get_set() {
        let mut form = widget_form();
        assert_eq!(form.get("color"), Some(&json!("blue")));
        assert_eq!(form.get("tls.secretName"), Some(&json!("")));
        assert_eq!(form.get("tls.missing"), None);

        form.set("tls.secretName", json!("widget-tls"));
        form.set("extra.deep.value", json!(3));
        assert_eq!(form.get("tls.secretName"), Some(&json!("widget-tls")));
        assert_eq!(form.get("extra.deep.value"), Some(&json!(3)));

        // scalar on the way is replaced by an object
        form.set("color.shade", json!("dark"));
        assert_eq!(form.get("color.shade"), Some(&json!("dark")));
    }

    #[test]
    fn test_validate_required_fields() {
        let mut form = widget_form();
        let err = form.validate().expect_err("empty form");
        assert_eq!(
            err.problems(),
            &[
                "name is required".to_owned(),
                "namespace is required".to_owned(),
                "size is required".to_owned()
            ]
        );

        form.name = "w1".to_owned();
        form.namespace = "default".to_owned();
        form.set("size", json!("small"));
        assert!(form.validate().is_ok());

        // nested required checked once tls holds content
        form.set("tls.hosts", json!(["a.example.io"]));
        let err = form.validate().expect_err("tls without secret");
        assert_eq!(err.to_string(), "tls.secretName is required");

        form.set("tls.secretName", json!("widget-tls"));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validate_required_in_array_items() {
        let port = ObjectSchema::new(
            vec![
                ("name".to_owned(), SchemaNode::string()),
                ("port".to_owned(), SchemaNode::integer()),
            ],
            vec!["name".to_owned()],
        );
        let schema = ObjectSchema::new(
            vec![(
                "ports".to_owned(),
                SchemaNode::array(SchemaNode::object(port)),
            )],
            vec![],
        );
        let mut form = FormState::new(&schema, vec![], false, json!({}));
        form.name = "svc".to_owned();
        assert!(form.validate().is_ok());

        form.set("ports", json!([{ "name": "http", "port": 80 }, { "port": 443 }]));
        let err = form.validate().expect_err("second port has no name");
        assert_eq!(err.to_string(), "ports[1].name is required");

        form.set("ports", json!([{ "name": "http", "port": 80 }, { "name": "https", "port": 443 }]));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_spec_keeps_zero_and_false() {
        let mut form = widget_form();
        form.set("size", json!("large"));
        form.set("replicas", json!(0));
        assert_eq!(
            form.spec(),
            json!({ "size": "large", "color": "blue", "replicas": 0, "internal": false })
        );
    }
}
