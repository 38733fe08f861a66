use std::sync::Arc;

use serde_json::Value;

use k8_plugin_registry::PluginRegistry;
use k8_resource_store::InMemoryStore;
use k8_resource_store::ResourceStore;
use k8_schema::InstanceMeta;
use k8_schema::PluginDefinition;
use k8_schema::ResourceInstance;

use crate::ConsoleContext;

pub(crate) const WIDGETS_BUNDLE: &str = include_str!("../data/widgets.yaml");

pub(crate) fn registry() -> Arc<PluginRegistry> {
    let plugin = PluginDefinition::parse(WIDGETS_BUNDLE).expect("widgets bundle");
    Arc::new(PluginRegistry::with_plugins(vec![plugin]))
}

pub(crate) fn context() -> ConsoleContext<InMemoryStore> {
    ConsoleContext::new(registry(), Arc::new(InMemoryStore::new()))
}

/// store widget directly, bypassing views
pub(crate) async fn seed_widget<S: ResourceStore>(
    ctx: &ConsoleContext<S>,
    name: &str,
    spec: Value,
    status: Option<Value>,
) -> String {
    let definition = ctx
        .registry()
        .get_kind("widgets", "Widget")
        .expect("widget kind");
    let mut instance = ResourceInstance::new(
        &definition,
        InstanceMeta::new(name, Some("default")),
        spec,
    );
    instance.status = status;
    ctx.store()
        .create("widgets", "Widget", instance)
        .await
        .expect("seed widget")
}
