use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::join_all;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use k8_plugin_config::ConfigError;
use k8_plugin_config::ConsoleConfig;
use k8_schema::PluginDefinition;
use k8_schema::ResourceKindDefinition;

use crate::sources_from_config;
use crate::BundleError;
use crate::BundleSource;

/// resource kind together with the plugin that defines it
#[derive(Debug, Clone)]
pub struct KindRef {
    plugin: Arc<PluginDefinition>,
    index: usize,
}

impl KindRef {
    fn find<F>(plugin: Arc<PluginDefinition>, matcher: F) -> Option<Self>
    where
        F: Fn(&ResourceKindDefinition) -> bool,
    {
        let index = plugin.kinds().iter().position(matcher)?;
        Some(Self { plugin, index })
    }

    pub fn plugin(&self) -> &PluginDefinition {
        &self.plugin
    }

    pub fn definition(&self) -> &ResourceKindDefinition {
        &self.plugin.kinds()[self.index]
    }
}

impl Deref for KindRef {
    type Target = ResourceKindDefinition;

    fn deref(&self) -> &Self::Target {
        self.definition()
    }
}

type PluginSet = Vec<Arc<PluginDefinition>>;

/// load once, read many cache of plugin definitions.
/// readers see either no plugins or the complete loaded set
pub struct PluginRegistry {
    sources: Vec<Arc<dyn BundleSource>>,
    loaded: RwLock<Option<Arc<PluginSet>>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|source| source.name()).collect();
        f.debug_struct("PluginRegistry")
            .field("sources", &names)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl PluginRegistry {
    pub fn new(sources: Vec<Arc<dyn BundleSource>>) -> Self {
        Self {
            sources,
            loaded: RwLock::new(None),
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(sources_from_config(config)?))
    }

    /// registry already loaded with given plugins
    pub fn with_plugins(plugins: Vec<PluginDefinition>) -> Self {
        let set: PluginSet = plugins.into_iter().map(Arc::new).collect();
        Self {
            sources: vec![],
            loaded: RwLock::new(Some(Arc::new(set))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// fetch and parse all sources concurrently.
    /// failed sources are logged and left out. no-op once loaded
    #[instrument(skip(self))]
    pub async fn load(&self) {
        if self.is_loaded() {
            debug!("plugin registry already loaded");
            return;
        }

        let outcomes = join_all(
            self.sources
                .iter()
                .map(|source| load_source(source.as_ref())),
        )
        .await;

        let mut plugins: PluginSet = vec![];
        for (source, outcome) in self.sources.iter().zip(outcomes) {
            match outcome {
                Ok(plugin) => {
                    if plugins.iter().any(|known| known.name() == plugin.name()) {
                        warn!(
                            "{}: plugin {} already loaded, skipping",
                            source.name(),
                            plugin.name()
                        );
                        continue;
                    }
                    plugins.push(Arc::new(plugin));
                }
                Err(err) => warn!("{}: dropping bundle: {}", source.name(), err),
            }
        }

        info!(
            "loaded {} of {} plugin bundles",
            plugins.len(),
            self.sources.len()
        );

        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        if loaded.is_none() {
            *loaded = Some(Arc::new(plugins));
        }
    }

    fn snapshot(&self) -> Arc<PluginSet> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    /// loaded plugins in source order
    pub fn plugins(&self) -> Vec<Arc<PluginDefinition>> {
        self.snapshot().iter().cloned().collect()
    }

    pub fn get(&self, plugin: &str) -> Option<Arc<PluginDefinition>> {
        self.snapshot()
            .iter()
            .find(|definition| definition.name() == plugin)
            .cloned()
    }

    pub fn get_kind(&self, plugin: &str, kind: &str) -> Option<KindRef> {
        KindRef::find(self.get(plugin)?, |definition| definition.kind == kind)
    }

    pub fn get_kind_by_plural(&self, plugin: &str, plural: &str) -> Option<KindRef> {
        KindRef::find(self.get(plugin)?, |definition| definition.plural == plural)
    }

    /// route segment may carry kind name or plural
    pub fn get_kind_by_name_or_plural(&self, plugin: &str, name: &str) -> Option<KindRef> {
        self.get_kind(plugin, name)
            .or_else(|| self.get_kind_by_plural(plugin, name))
    }
}

async fn load_source(source: &dyn BundleSource) -> Result<PluginDefinition, BundleError> {
    let text = source.fetch().await?;
    Ok(PluginDefinition::parse(&text)?)
}
