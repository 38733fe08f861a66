use std::sync::Arc;

use tracing::debug;
use tracing::instrument;

use k8_resource_store::ResourceStore;
use k8_schema::ViewKind;

use crate::ComponentRegistry;
use crate::ConsoleContext;
use crate::CreateView;
use crate::CustomComponent;
use crate::DetailView;
use crate::EditView;
use crate::ListView;
use crate::RouteContext;
use crate::ViewError;

/// which implementation serves a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSelection {
    Generic,
    Custom(String),
}

pub enum GenericView<S> {
    List(ListView<S>),
    Detail(DetailView<S>),
    Create(CreateView<S>),
    Edit(EditView<S>),
}

impl<S> GenericView<S> {
    pub fn view(&self) -> ViewKind {
        match self {
            Self::List(_) => ViewKind::List,
            Self::Detail(_) => ViewKind::Detail,
            Self::Create(_) => ViewKind::Create,
            Self::Edit(_) => ViewKind::Edit,
        }
    }
}

pub enum ResolvedView<S> {
    Generic(GenericView<S>),
    Custom(Box<dyn CustomComponent>),
}

impl<S> ResolvedView<S> {
    pub fn view(&self) -> ViewKind {
        match self {
            Self::Generic(generic) => generic.view(),
            Self::Custom(component) => component.view(),
        }
    }

    /// name of custom component, `None` for generic view
    pub fn component_name(&self) -> Option<&str> {
        match self {
            Self::Generic(_) => None,
            Self::Custom(component) => Some(component.name()),
        }
    }
}

/// choose between generic view and plugin declared custom component
pub struct Dispatcher<S> {
    ctx: ConsoleContext<S>,
    components: Arc<ComponentRegistry>,
}

impl<S> Dispatcher<S>
where
    S: ResourceStore,
{
    pub fn new(ctx: ConsoleContext<S>, components: Arc<ComponentRegistry>) -> Self {
        Self { ctx, components }
    }

    pub fn context(&self) -> &ConsoleContext<S> {
        &self.ctx
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// override is used only when declared by plugin and registered
    pub fn select(&self, route: &RouteContext, view: ViewKind) -> Result<ViewSelection, ViewError> {
        let kind = self.ctx.resolve_kind(route)?;
        match kind.plugin().custom_component(&kind.kind, view) {
            Some(name) if self.components.has(name) => Ok(ViewSelection::Custom(name.to_owned())),
            Some(name) => {
                debug!(
                    "{}/{}: component {} is not registered, using generic {} view",
                    route.plugin, kind.kind, name, view
                );
                Ok(ViewSelection::Generic)
            }
            None => Ok(ViewSelection::Generic),
        }
    }

    #[instrument(skip(self))]
    pub async fn open(&self, route: RouteContext, view: ViewKind) -> Result<ResolvedView<S>, ViewError> {
        if let ViewSelection::Custom(name) = self.select(&route, view)? {
            if let Some(loader) = self.components.resolve(&name) {
                debug!("loading component {} for {}", name, route);
                return Ok(ResolvedView::Custom(loader.load(view, route)));
            }
        }

        let ctx = self.ctx.clone();
        let generic = match view {
            ViewKind::List => GenericView::List(ListView::open(ctx, route).await?),
            ViewKind::Detail => GenericView::Detail(DetailView::open(ctx, route).await?),
            ViewKind::Create => GenericView::Create(CreateView::open(ctx, route).await?),
            ViewKind::Edit => GenericView::Edit(EditView::open(ctx, route).await?),
        };
        Ok(ResolvedView::Generic(generic))
    }
}
