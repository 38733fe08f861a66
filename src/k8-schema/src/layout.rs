//!
//! # Field Layout
//!
//! Partition spec fields into ordered groups following plugin form groups,
//! with hidden fields removed.
//!
use std::collections::HashSet;

use crate::FormGroup;
use crate::ObjectSchema;
use crate::UiHints;

pub const OTHER_GROUP: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    /// `None` for the implicit group when no form groups are declared
    pub name: Option<String>,
    pub fields: Vec<String>,
}

impl FieldGroup {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

pub fn group_fields(
    schema: &ObjectSchema,
    form_groups: &[FormGroup],
    hidden_fields: &[String],
) -> Vec<FieldGroup> {
    let hidden: HashSet<&str> = hidden_fields.iter().map(String::as_str).collect();
    let visible: Vec<&str> = schema
        .field_names()
        .filter(|name| !hidden.contains(name))
        .collect();

    if form_groups.is_empty() {
        return vec![FieldGroup {
            name: None,
            fields: visible.into_iter().map(str::to_owned).collect(),
        }];
    }

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut groups = vec![];
    for group in form_groups {
        let mut fields = vec![];
        for field in &group.fields {
            let field = field.as_str();
            // first group claiming a field keeps it
            if visible.contains(&field) && claimed.insert(field) {
                fields.push(field.to_owned());
            }
        }
        if !fields.is_empty() {
            groups.push(FieldGroup {
                name: Some(group.name.clone()),
                fields,
            });
        }
    }

    let rest: Vec<String> = visible
        .into_iter()
        .filter(|name| !claimed.contains(name))
        .map(str::to_owned)
        .collect();
    if !rest.is_empty() {
        groups.push(FieldGroup {
            name: Some(OTHER_GROUP.to_owned()),
            fields: rest,
        });
    }
    groups
}

/// layout for detail and create views
pub fn read_groups(schema: &ObjectSchema, hints: &UiHints) -> Vec<FieldGroup> {
    group_fields(schema, &hints.form_groups, &hints.hidden_fields)
}

/// fields hidden from edit view. an editable allow list replaces hidden fields
pub fn edit_hidden_fields(schema: &ObjectSchema, hints: &UiHints) -> Vec<String> {
    match &hints.editable_fields {
        Some(editable) => schema
            .field_names()
            .filter(|name| !editable.iter().any(|allowed| allowed == name))
            .map(str::to_owned)
            .collect(),
        None => hints.hidden_fields.clone(),
    }
}

pub fn edit_groups(schema: &ObjectSchema, hints: &UiHints) -> Vec<FieldGroup> {
    group_fields(schema, &hints.form_groups, &edit_hidden_fields(schema, hints))
}
