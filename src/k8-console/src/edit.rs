use tracing::debug;
use tracing::instrument;

use k8_plugin_registry::KindRef;
use k8_resource_store::ResourceStore;
use k8_schema::layout::edit_groups;
use k8_schema::ResourceInstance;

use crate::ConsoleContext;
use crate::FormState;
use crate::RouteContext;
use crate::ViewError;
use crate::ViewMessage;

/// form over existing instance. edits a copy of the stored spec
pub struct EditView<S> {
    ctx: ConsoleContext<S>,
    route: RouteContext,
    kind: KindRef,
    original: ResourceInstance,
    form: FormState,
    message: Option<ViewMessage>,
}

impl<S> EditView<S>
where
    S: ResourceStore,
{
    #[instrument(skip(ctx))]
    pub async fn open(ctx: ConsoleContext<S>, route: RouteContext) -> Result<Self, ViewError> {
        let kind = ctx.resolve_kind(&route)?;
        let identity = route.identity().ok_or(ViewError::MissingIdentity("edit"))?;
        let original = ctx
            .store()
            .get(&kind.plugin().metadata.name, &kind.kind, identity)
            .await
            .map_err(ViewError::store)?
            .ok_or_else(|| ViewError::InstanceNotFound {
                kind: kind.kind.clone(),
                identity: identity.to_owned(),
            })?;

        let hints = kind.plugin().hints(&kind.kind);
        let mut form = FormState::new(
            &kind.spec_schema,
            edit_groups(&kind.spec_schema, hints),
            kind.is_namespaced(),
            original.spec.clone(),
        );
        form.name = original.metadata.name.clone();
        form.namespace = original.metadata.namespace.clone().unwrap_or_default();

        Ok(Self {
            ctx,
            route,
            kind,
            original,
            form,
            message: None,
        })
    }

    pub fn kind(&self) -> &KindRef {
        &self.kind
    }

    pub fn original(&self) -> &ResourceInstance {
        &self.original
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

    /// validate and write edited spec. returns list route to navigate to
    pub async fn submit(&mut self) -> Result<RouteContext, ViewError> {
        match self.try_submit().await {
            Ok(()) => {
                debug!("{}: updated {}", self.kind.kind, self.original.identity());
                self.message = None;
                Ok(self.route.list())
            }
            Err(err) => {
                self.message = Some(ViewMessage::from(&err));
                Err(err)
            }
        }
    }

    /// name and namespace identify the instance and are read only here
    fn renamed(&self) -> Vec<String> {
        let mut problems = vec![];
        if self.form.name.trim() != self.original.metadata.name {
            problems.push("name cannot be changed".to_owned());
        }
        let namespace = self.original.metadata.namespace.as_deref().unwrap_or_default();
        if self.form.is_namespaced() && self.form.namespace.trim() != namespace {
            problems.push("namespace cannot be changed".to_owned());
        }
        problems
    }

    async fn try_submit(&self) -> Result<(), ViewError> {
        let renamed = self.renamed();
        if !renamed.is_empty() {
            return Err(ViewError::Validation(renamed));
        }
        self.form.validate()?;
        let mut instance = self.original.clone();
        instance.spec = self.form.spec();
        self.ctx
            .store()
            .update(
                &self.kind.plugin().metadata.name,
                &self.kind.kind,
                self.original.identity(),
                instance,
            )
            .await
            .map_err(ViewError::store)
    }
}

#[cfg(test)]
mod test {

    use fluvio_future::test_async;
    use serde_json::json;

    use k8_resource_store::ResourceStore;

    use super::EditView;
    use crate::fixture::context;
    use crate::fixture::seed_widget;
    use crate::RouteContext;
    use crate::ViewError;

    #[test_async]
    async fn test_edit_widget() -> Result<(), ViewError> {
        let ctx = context();
        let identity = seed_widget(
            &ctx,
            "alpha",
            json!({ "size": "small", "color": "red", "internal": true }),
            None,
        )
        .await;

        let route = RouteContext::new("widgets", "widgets").with_identity(identity.clone());
        let mut view = EditView::open(ctx.clone(), route).await?;

        // editable fields replace hidden fields
        let fields: Vec<&str> = view
            .form()
            .groups()
            .iter()
            .flat_map(|group| group.fields.iter().map(String::as_str))
            .collect();
        assert_eq!(fields, vec!["size", "tls", "replicas"]);

        view.form_mut().set("size", json!("large"));
        view.form_mut().set("replicas", json!(2));
        // copy is edited, not stored instance
        assert_eq!(view.original().spec["size"], json!("small"));

        view.submit().await?;
        let stored = ctx
            .store()
            .get("widgets", "Widget", &identity)
            .await
            .map_err(ViewError::store)?
            .expect("stored");
        assert_eq!(
            stored.spec,
            json!({ "size": "large", "color": "red", "internal": true, "replicas": 2 })
        );
        assert_eq!(stored.identity(), identity);
        Ok(())
    }

    #[test_async]
    async fn test_edit_validation_skips_store() -> Result<(), ViewError> {
        let ctx = context();
        let identity = seed_widget(&ctx, "alpha", json!({ "size": "small" }), None).await;
        let route = RouteContext::new("widgets", "Widget").with_identity(identity.clone());
        let mut view = EditView::open(ctx.clone(), route).await?;

        view.form_mut().set("size", json!(""));
        let err = view.submit().await.expect_err("size required");
        assert_eq!(err.to_string(), "size is required");
        assert_eq!(view.message().expect("message").text, "size is required");

        let stored = ctx
            .store()
            .get("widgets", "Widget", &identity)
            .await
            .map_err(ViewError::store)?
            .expect("stored");
        assert_eq!(stored.spec, json!({ "size": "small" }));
        Ok(())
    }

    #[test_async]
    async fn test_edit_rejects_rename() -> Result<(), ViewError> {
        let ctx = context();
        let identity = seed_widget(&ctx, "alpha", json!({ "size": "small" }), None).await;
        let route = RouteContext::new("widgets", "widgets").with_identity(identity.clone());
        let mut view = EditView::open(ctx.clone(), route).await?;

        view.form_mut().name = "beta".to_owned();
        view.form_mut().namespace = "other".to_owned();
        view.form_mut().set("size", json!("large"));
        let err = view.submit().await.expect_err("rename");
        assert_eq!(
            err.problems(),
            &[
                "name cannot be changed".to_owned(),
                "namespace cannot be changed".to_owned()
            ]
        );

        let stored = ctx
            .store()
            .get("widgets", "Widget", &identity)
            .await
            .map_err(ViewError::store)?
            .expect("stored");
        assert_eq!(stored.metadata.name, "alpha");
        assert_eq!(stored.spec, json!({ "size": "small" }));
        Ok(())
    }

    #[test_async]
    async fn test_edit_missing_instance() -> Result<(), ()> {
        let ctx = context();
        let missing = EditView::open(
            ctx.clone(),
            RouteContext::new("widgets", "widgets").with_identity("nope"),
        )
        .await;
        assert!(matches!(missing, Err(ViewError::InstanceNotFound { .. })));

        let no_identity = EditView::open(ctx, RouteContext::new("widgets", "widgets")).await;
        assert!(matches!(no_identity, Err(ViewError::MissingIdentity(_))));
        Ok(())
    }
}
