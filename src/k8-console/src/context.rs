use k8_plugin_registry::KindRef;
use k8_plugin_registry::PluginRegistry;
use k8_plugin_registry::SharedRegistry;
use k8_resource_store::ResourceStore;
use k8_resource_store::SharedStore;

use crate::RouteContext;
use crate::ViewError;

/// collaborators shared by all views
pub struct ConsoleContext<S> {
    registry: SharedRegistry,
    store: SharedStore<S>,
}

impl<S> Clone for ConsoleContext<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S> ConsoleContext<S>
where
    S: ResourceStore,
{
    pub fn new(registry: SharedRegistry, store: SharedStore<S>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// find resource kind named by route, by kind name or plural
    pub fn resolve_kind(&self, route: &RouteContext) -> Result<KindRef, ViewError> {
        if self.registry.get(&route.plugin).is_none() {
            return Err(ViewError::PluginNotFound(route.plugin.clone()));
        }
        self.registry
            .get_kind_by_name_or_plural(&route.plugin, &route.kind)
            .ok_or_else(|| ViewError::KindNotFound {
                plugin: route.plugin.clone(),
                kind: route.kind.clone(),
            })
    }
}
