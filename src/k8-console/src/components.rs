use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use k8_schema::ViewKind;

use crate::RouteContext;

/// view implementation supplied in place of a generic view
pub trait CustomComponent: Send + Sync {
    /// name the component was registered under
    fn name(&self) -> &str;

    fn view(&self) -> ViewKind;

    fn route(&self) -> &RouteContext;
}

/// factory for custom component, invoked once per navigation
pub trait ComponentLoader: Send + Sync {
    fn load(&self, view: ViewKind, route: RouteContext) -> Box<dyn CustomComponent>;
}

impl<F> ComponentLoader for F
where
    F: Fn(ViewKind, RouteContext) -> Box<dyn CustomComponent> + Send + Sync,
{
    fn load(&self, view: ViewKind, route: RouteContext) -> Box<dyn CustomComponent> {
        self(view, route)
    }
}

/// named custom components. only registered names can ever be loaded
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    loaders: HashMap<String, Arc<dyn ComponentLoader>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("components", &names)
            .finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// register loader under name, replacing previous registration
    pub fn register<N, L>(&mut self, name: N, loader: L)
    where
        N: Into<String>,
        L: ComponentLoader + 'static,
    {
        let name = name.into();
        debug!("registering component {}", name);
        if self.loaders.insert(name.clone(), Arc::new(loader)).is_some() {
            warn!("component {} registered twice, keeping last", name);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ComponentLoader>> {
        self.loaders.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}
