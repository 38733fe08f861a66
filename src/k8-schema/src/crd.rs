//!
//! # CRD Definition
//!
//! Parse CustomResourceDefinition documents shipped inside plugin bundles
//! into a [`ResourceKindDefinition`] built from the storage version.
//!
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::ObjectSchema;
use crate::PathExpr;
use crate::SchemaError;

pub const CRD_KIND: &str = "CustomResourceDefinition";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Namespaced,
    Cluster,
}

/// printer column value type
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Date,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CrdDocument {
    #[serde(default)]
    kind: Option<String>,
    spec: CrdSpec,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CrdSpec {
    group: String,
    names: CrdNames,
    #[serde(default)]
    scope: Scope,
    #[serde(default)]
    versions: Vec<CrdVersion>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CrdNames {
    kind: String,
    plural: String,
    #[serde(default)]
    singular: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CrdVersion {
    name: String,
    #[serde(default)]
    served: bool,
    #[serde(default)]
    storage: bool,
    #[serde(default)]
    additional_printer_columns: Vec<PrinterColumn>,
    schema: Option<CrdValidation>,
}

#[derive(Deserialize, Debug, Clone)]
struct CrdValidation {
    #[serde(rename = "openAPIV3Schema")]
    open_api_v3_schema: Value,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct PrinterColumn {
    name: String,
    json_path: String,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListColumn {
    pub label: String,
    pub path: PathExpr,
    pub value_type: ColumnType,
}

impl ListColumn {
    pub fn new(label: impl Into<String>, path: PathExpr, value_type: ColumnType) -> Self {
        Self {
            label: label.into(),
            path,
            value_type,
        }
    }
}

/// one custom resource type contributed by plugin
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceKindDefinition {
    pub group: String,
    pub kind: String,
    pub plural: String,
    pub singular: String,
    pub scope: Scope,
    /// selected storage version
    pub version: String,
    pub list_columns: Vec<ListColumn>,
    pub spec_schema: ObjectSchema,
    pub status_schema: Option<ObjectSchema>,
}

impl ResourceKindDefinition {
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope == Scope::Namespaced
    }

    /// parse CRD document
    pub fn parse(raw: &Value) -> Result<Self, SchemaError> {
        let doc: CrdDocument = serde_json::from_value(raw.clone())?;
        if let Some(kind) = &doc.kind {
            if kind != CRD_KIND {
                return Err(SchemaError::UnexpectedKind {
                    expected: CRD_KIND,
                    found: kind.to_owned(),
                });
            }
        }

        let spec = doc.spec;
        let kind = spec.names.kind;
        let version = spec
            .versions
            .into_iter()
            .find(|version| version.storage)
            .ok_or_else(|| SchemaError::NoStorageVersion { kind: kind.clone() })?;

        if !version.served {
            warn!("{}: storage version {} is not served", kind, version.name);
        }

        let root = version
            .schema
            .map(|schema| schema.open_api_v3_schema)
            .ok_or_else(|| SchemaError::MissingSchema {
                kind: kind.clone(),
                version: version.name.clone(),
            })?;

        let properties = root.get("properties");
        let spec_schema = match properties.and_then(|props| props.get("spec")) {
            Some(doc) => ObjectSchema::parse_object_at(doc, "spec")?,
            None => ObjectSchema::default(),
        };
        let status_schema = match properties.and_then(|props| props.get("status")) {
            Some(doc) => Some(ObjectSchema::parse_object_at(doc, "status")?),
            None => None,
        };

        let list_columns = version
            .additional_printer_columns
            .into_iter()
            .filter_map(|column| match PathExpr::parse(&column.json_path) {
                Ok(path) => Some(ListColumn::new(column.name, path, column.column_type)),
                Err(err) => {
                    warn!("{}: dropping printer column {}: {}", kind, column.name, err);
                    None
                }
            })
            .collect();

        debug!(
            "parsed resource kind {}.{} version {}",
            kind, spec.group, version.name
        );

        Ok(Self {
            group: spec.group,
            singular: spec
                .names
                .singular
                .unwrap_or_else(|| kind.to_lowercase()),
            plural: spec.names.plural,
            kind,
            scope: spec.scope,
            version: version.name,
            list_columns,
            spec_schema,
            status_schema,
        })
    }
}
