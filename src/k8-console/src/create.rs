use tracing::debug;
use tracing::instrument;

use k8_plugin_registry::KindRef;
use k8_resource_store::ResourceStore;
use k8_schema::layout::read_groups;
use k8_schema::ResourceInstance;

use crate::ConsoleContext;
use crate::FormState;
use crate::RouteContext;
use crate::ViewError;
use crate::ViewMessage;

/// form for new instance, seeded with schema defaults
pub struct CreateView<S> {
    ctx: ConsoleContext<S>,
    route: RouteContext,
    kind: KindRef,
    form: FormState,
    message: Option<ViewMessage>,
}

impl<S> CreateView<S>
where
    S: ResourceStore,
{
    #[instrument(skip(ctx))]
    pub async fn open(ctx: ConsoleContext<S>, route: RouteContext) -> Result<Self, ViewError> {
        let kind = ctx.resolve_kind(&route)?;
        let hints = kind.plugin().hints(&kind.kind);
        let form = FormState::new(
            &kind.spec_schema,
            read_groups(&kind.spec_schema, hints),
            kind.is_namespaced(),
            kind.spec_schema.build_default(),
        );
        Ok(Self {
            ctx,
            route,
            kind,
            form,
            message: None,
        })
    }

    pub fn kind(&self) -> &KindRef {
        &self.kind
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn message(&self) -> Option<&ViewMessage> {
        self.message.as_ref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// validate and store new instance. returns list route to navigate to.
    /// form state is kept on failure
    pub async fn submit(&mut self) -> Result<RouteContext, ViewError> {
        match self.try_submit().await {
            Ok(identity) => {
                debug!("{}: created {}", self.kind.kind, identity);
                self.message = None;
                Ok(self.route.list())
            }
            Err(err) => {
                self.message = Some(ViewMessage::from(&err));
                Err(err)
            }
        }
    }

    async fn try_submit(&self) -> Result<String, ViewError> {
        self.form.validate()?;
        let instance = ResourceInstance::new(&self.kind, self.form.metadata(), self.form.spec());
        self.ctx
            .store()
            .create(&self.kind.plugin().metadata.name, &self.kind.kind, instance)
            .await
            .map_err(ViewError::store)
    }
}
