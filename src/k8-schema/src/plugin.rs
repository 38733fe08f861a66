//!
//! # Plugin Definition
//!
//! A plugin bundle is a `PluginDefinition` document: metadata, menu placement,
//! per kind ui hints, custom component overrides and the embedded CRDs.
//!
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::format::scalar_text;
use crate::PathExpr;
use crate::ResourceKindDefinition;
use crate::SchemaError;

pub const PLUGIN_DEFINITION_KIND: &str = "PluginDefinition";

/// hints used when plugin declares nothing for a kind
static NO_HINTS: UiHints = UiHints {
    form_groups: Vec::new(),
    hidden_fields: Vec::new(),
    editable_fields: None,
    status_mapping: None,
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginMetadata {
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuScope {
    Organization,
    Project,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginMenu {
    pub organization: Vec<MenuEntry>,
    pub project: Vec<MenuEntry>,
}

impl PluginMenu {
    pub fn entries(&self, scope: MenuScope) -> &[MenuEntry] {
        match scope {
            MenuScope::Organization => &self.organization,
            MenuScope::Project => &self.project,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub detail: bool,
    #[serde(default)]
    pub create: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FormGroup {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub class: String,
    pub label: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusMapping {
    pub path: String,
    #[serde(default)]
    pub values: HashMap<String, Badge>,
}

impl StatusMapping {
    /// true if column path selects the same value as the mapping path
    pub fn applies_to(&self, path: &PathExpr) -> bool {
        match PathExpr::parse(&self.path) {
            Ok(own) => own == *path,
            Err(_) => false,
        }
    }

    pub fn badge_for(&self, value: &Value) -> Option<&Badge> {
        scalar_text(value).and_then(|text| self.values.get(&text))
    }

    /// resolve mapping path against instance document and map it to badge
    pub fn badge_of(&self, doc: &Value) -> Option<&Badge> {
        crate::resolve(doc, &self.path).and_then(|value| self.badge_for(value))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiHints {
    pub form_groups: Vec<FormGroup>,
    pub hidden_fields: Vec<String>,
    /// exhaustive allow list for edit view
    pub editable_fields: Option<Vec<String>>,
    pub status_mapping: Option<StatusMapping>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    List,
    Detail,
    Create,
    Edit,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::Create => "create",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "detail" => Ok(Self::Detail),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            other => Err(format!("unknown view kind: {}", other)),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BundleDocument {
    #[serde(default)]
    api_version: Option<String>,
    kind: String,
    metadata: PluginMetadata,
    #[serde(default)]
    menu: PluginMenu,
    #[serde(default)]
    ui_hints: HashMap<String, UiHints>,
    #[serde(default)]
    custom_components: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    crds: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluginDefinition {
    pub api_version: Option<String>,
    pub metadata: PluginMetadata,
    pub menu: PluginMenu,
    ui_hints: HashMap<String, UiHints>,
    custom_components: HashMap<String, HashMap<ViewKind, String>>,
    kinds: Vec<ResourceKindDefinition>,
}

impl PluginDefinition {
    /// parse bundle text (yaml or json)
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let raw: Value = serde_yaml::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, SchemaError> {
        let doc: BundleDocument = serde_json::from_value(raw)?;
        if doc.kind != PLUGIN_DEFINITION_KIND {
            return Err(SchemaError::UnexpectedKind {
                expected: PLUGIN_DEFINITION_KIND,
                found: doc.kind,
            });
        }

        let mut kinds: Vec<ResourceKindDefinition> = vec![];
        for crd in &doc.crds {
            let definition = ResourceKindDefinition::parse(crd)?;
            if kinds
                .iter()
                .any(|known| known.kind == definition.kind || known.plural == definition.plural)
            {
                return Err(SchemaError::DuplicateKind(definition.kind));
            }
            kinds.push(definition);
        }

        let plugin = doc.metadata.name.clone();
        let mut custom_components = HashMap::new();
        for (kind, views) in doc.custom_components {
            let mut overrides = HashMap::new();
            for (view, component) in views {
                match view.parse::<ViewKind>() {
                    Ok(view) => {
                        overrides.insert(view, component);
                    }
                    Err(err) => warn!("{}: custom component for {}: {}", plugin, kind, err),
                }
            }
            custom_components.insert(kind, overrides);
        }

        let definition = Self {
            api_version: doc.api_version,
            metadata: doc.metadata,
            menu: doc.menu,
            ui_hints: doc.ui_hints,
            custom_components,
            kinds,
        };
        definition.report_dangling_kinds();
        debug!(
            "parsed plugin {} with {} kinds",
            definition.name(),
            definition.kinds.len()
        );
        Ok(definition)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn kinds(&self) -> &[ResourceKindDefinition] {
        &self.kinds
    }

    pub fn kind(&self, kind: &str) -> Option<&ResourceKindDefinition> {
        self.kinds.iter().find(|definition| definition.kind == kind)
    }

    pub fn kind_by_plural(&self, plural: &str) -> Option<&ResourceKindDefinition> {
        self.kinds.iter().find(|definition| definition.plural == plural)
    }

    /// lookup by kind name, then by plural path segment
    pub fn kind_by_name_or_plural(&self, name: &str) -> Option<&ResourceKindDefinition> {
        self.kind(name).or_else(|| self.kind_by_plural(name))
    }

    /// ui hints of kind, empty hints if none declared
    pub fn hints(&self, kind: &str) -> &UiHints {
        self.ui_hints.get(kind).unwrap_or(&NO_HINTS)
    }

    /// override name declared for kind and view.
    /// references to kinds the plugin doesn't define are ignored
    pub fn custom_component(&self, kind: &str, view: ViewKind) -> Option<&str> {
        self.kind(kind)?;
        self.custom_components
            .get(kind)
            .and_then(|views| views.get(&view))
            .map(String::as_str)
    }

    fn report_dangling_kinds(&self) {
        let menu = self.menu.organization.iter().chain(self.menu.project.iter());
        for entry in menu {
            if self.kind(&entry.kind).is_none() {
                warn!("{}: menu references unknown kind {}", self.name(), entry.kind);
            }
        }
        for kind in self.custom_components.keys().chain(self.ui_hints.keys()) {
            if self.kind(kind).is_none() {
                warn!("{}: hints reference unknown kind {}", self.name(), kind);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test {

    use serde_json::json;

    use super::MenuScope;
    use super::PluginDefinition;
    use super::ViewKind;
    use crate::PathExpr;
    use crate::SchemaError;

    pub(crate) const WIDGET_BUNDLE: &str = r#"
apiVersion: console.k8s.io/v1
kind: PluginDefinition
metadata:
  name: widgets
  displayName: Widget Factory
  version: 1.2.0
  description: Widgets for everyone
menu:
  organization:
    - kind: Widget
      list: true
      detail: true
      create: true
    - kind: Gadget
      list: true
  project:
    - kind: Widget
      label: Project Widgets
      list: false
uiHints:
  Widget:
    formGroups:
      - name: Basics
        fields: [size, color]
    hiddenFields: [internal]
    editableFields: [size, replicas]
    statusMapping:
      path: .status.phase
      values:
        Ready: { class: success, label: Ready }
        Failed: { class: danger, label: Failed }
customComponents:
  Widget:
    list: CustomWidgetList
    sideways: Nope
  Gadget:
    detail: GadgetDetail
crds:
  - apiVersion: apiextensions.k8s.io/v1
    kind: CustomResourceDefinition
    spec:
      group: widgets.example.io
      names:
        kind: Widget
        plural: widgets
        singular: widget
      scope: Namespaced
      versions:
        - name: v1
          served: true
          storage: true
          additionalPrinterColumns:
            - name: Phase
              type: string
              jsonPath: .status.phase
          schema:
            openAPIV3Schema:
              type: object
              properties:
                spec:
                  type: object
                  required: [size]
                  properties:
                    size:
                      type: string
                      enum: [small, large]
                    color:
                      type: string
                    replicas:
                      type: integer
                    internal:
                      type: boolean
                    tls:
                      type: object
                      properties:
                        secretName:
                          type: string
                status:
                  type: object
                  properties:
                    phase:
                      type: string
"#;

    #[test]
    fn test_parse_bundle() {
        let plugin = PluginDefinition::parse(WIDGET_BUNDLE).expect("parse");
        assert_eq!(plugin.name(), "widgets");
        assert_eq!(plugin.metadata.title(), "Widget Factory");
        assert_eq!(plugin.kinds().len(), 1);
        assert!(plugin.kind("Widget").is_some());
        assert!(plugin.kind_by_plural("widgets").is_some());
        assert!(plugin.kind_by_name_or_plural("widgets").is_some());
        assert!(plugin.kind("Gadget").is_none());

        let fields: Vec<&str> = plugin
            .kind("Widget")
            .unwrap()
            .spec_schema
            .field_names()
            .collect();
        assert_eq!(fields, vec!["size", "color", "replicas", "internal", "tls"]);

        assert_eq!(plugin.menu.entries(MenuScope::Organization).len(), 2);
        assert_eq!(
            plugin.menu.entries(MenuScope::Project)[0].label.as_deref(),
            Some("Project Widgets")
        );

        let hints = plugin.hints("Widget");
        assert_eq!(hints.form_groups[0].fields, vec!["size", "color"]);
        assert_eq!(hints.hidden_fields, vec!["internal"]);
        assert!(plugin.hints("Unknown").form_groups.is_empty());
    }

    #[test]
    fn test_custom_components() {
        let plugin = PluginDefinition::parse(WIDGET_BUNDLE).expect("parse");
        assert_eq!(
            plugin.custom_component("Widget", ViewKind::List),
            Some("CustomWidgetList")
        );
        assert_eq!(plugin.custom_component("Widget", ViewKind::Detail), None);
        // Gadget is referenced but never defined
        assert_eq!(plugin.custom_component("Gadget", ViewKind::Detail), None);
    }

    #[test]
    fn test_status_mapping() {
        let plugin = PluginDefinition::parse(WIDGET_BUNDLE).expect("parse");
        let mapping = plugin.hints("Widget").status_mapping.as_ref().expect("mapping");
        let column: PathExpr = "status.phase".parse().expect("path");
        assert!(mapping.applies_to(&column));

        let doc = json!({ "status": { "phase": "Failed" } });
        let badge = mapping.badge_of(&doc).expect("badge");
        assert_eq!(badge.class, "danger");
        assert!(mapping.badge_of(&json!({ "status": { "phase": "Pending" } })).is_none());
    }

    #[test]
    fn test_reject_other_document_kind() {
        let text = WIDGET_BUNDLE.replace("kind: PluginDefinition", "kind: ConfigMap");
        assert!(matches!(
            PluginDefinition::parse(&text),
            Err(SchemaError::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn test_bad_crd_fails_bundle() {
        let text = WIDGET_BUNDLE.replace("storage: true", "storage: false");
        assert!(matches!(
            PluginDefinition::parse(&text),
            Err(SchemaError::NoStorageVersion { .. })
        ));
    }

    #[test]
    fn test_json_bundle() {
        let text = r#"{"kind":"PluginDefinition","metadata":{"name":"empty"}}"#;
        let plugin = PluginDefinition::parse(text).expect("parse");
        assert_eq!(plugin.metadata.title(), "empty");
        assert!(plugin.kinds().is_empty());
    }
}
