use serde::Serialize;

use k8_schema::MenuScope;
use k8_schema::PluginDefinition;

use crate::PluginRegistry;

/// one listable resource kind in navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub plugin: String,
    pub kind: String,
    pub plural: String,
    pub label: String,
    /// instances may be opened in detail view
    pub detail: bool,
    /// create action is offered
    pub create: bool,
}

/// navigation entries contributed by one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub plugin: String,
    pub title: String,
    pub items: Vec<NavItem>,
}

impl NavGroup {
    /// group for plugin menu scope, absent if no entry survives filtering
    pub fn from_plugin(plugin: &PluginDefinition, scope: MenuScope) -> Option<Self> {
        let items: Vec<NavItem> = plugin
            .menu
            .entries(scope)
            .iter()
            .filter(|entry| entry.list)
            .filter_map(|entry| {
                let definition = plugin.kind(&entry.kind)?;
                Some(NavItem {
                    plugin: plugin.name().to_owned(),
                    kind: definition.kind.clone(),
                    plural: definition.plural.clone(),
                    label: entry
                        .label
                        .clone()
                        .unwrap_or_else(|| definition.kind.clone()),
                    detail: entry.detail,
                    create: entry.create,
                })
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        Some(Self {
            plugin: plugin.name().to_owned(),
            title: plugin.metadata.title().to_owned(),
            items,
        })
    }
}

impl PluginRegistry {
    pub fn nav(&self, scope: MenuScope) -> Vec<NavGroup> {
        self.plugins()
            .iter()
            .filter_map(|plugin| NavGroup::from_plugin(plugin, scope))
            .collect()
    }

    pub fn organization_nav(&self) -> Vec<NavGroup> {
        self.nav(MenuScope::Organization)
    }

    pub fn project_nav(&self) -> Vec<NavGroup> {
        self.nav(MenuScope::Project)
    }
}
