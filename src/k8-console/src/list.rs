use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use tracing::instrument;

use k8_plugin_registry::KindRef;
use k8_resource_store::ResourceStore;
use k8_schema::format::format_value;
use k8_schema::Badge;
use k8_schema::ColumnType;
use k8_schema::ListColumn;
use k8_schema::PathExpr;
use k8_schema::ResourceInstance;

use crate::ConsoleContext;
use crate::RouteContext;
use crate::ViewError;
use crate::ViewMessage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub identity: String,
    pub name: String,
    pub namespace: Option<String>,
    pub cells: Vec<ListCell>,
}

/// columns shown when kind declares none
fn builtin_columns() -> Result<Vec<ListColumn>, ViewError> {
    let column = |label: &str, path: &str, value_type| -> Result<ListColumn, ViewError> {
        Ok(ListColumn::new(label, PathExpr::parse(path)?, value_type))
    };
    Ok(vec![
        column("Name", ".metadata.name", ColumnType::String)?,
        column("Age", ".metadata.creationTimestamp", ColumnType::Date)?,
    ])
}

fn build_row(
    kind: &KindRef,
    columns: &[ListColumn],
    instance: &ResourceInstance,
    now: DateTime<Utc>,
) -> Result<ListRow, ViewError> {
    let doc = instance.to_document()?;
    let mapping = kind.plugin().hints(&kind.kind).status_mapping.as_ref();
    let cells = columns
        .iter()
        .map(|column| {
            let value = column.path.resolve(&doc);
            let badge = match (mapping, value) {
                (Some(mapping), Some(value)) if mapping.applies_to(&column.path) => {
                    mapping.badge_for(value).cloned()
                }
                _ => None,
            };
            ListCell {
                text: format_value(value, column.value_type, now),
                badge,
            }
        })
        .collect();

    Ok(ListRow {
        identity: instance.identity().to_owned(),
        name: instance.name().to_owned(),
        namespace: instance.metadata.namespace.clone(),
        cells,
    })
}

/// table of all instances of one kind
pub struct ListView<S> {
    ctx: ConsoleContext<S>,
    route: RouteContext,
    kind: KindRef,
    columns: Vec<ListColumn>,
    rows: Vec<ListRow>,
    pending_delete: Option<String>,
    message: Option<ViewMessage>,
}

impl<S> ListView<S>
where
    S: ResourceStore,
{
    #[instrument(skip(ctx))]
    pub async fn open(ctx: ConsoleContext<S>, route: RouteContext) -> Result<Self, ViewError> {
        let kind = ctx.resolve_kind(&route)?;
        let columns = if kind.list_columns.is_empty() {
            builtin_columns()?
        } else {
            kind.list_columns.clone()
        };

        let mut view = Self {
            ctx,
            route,
            kind,
            columns,
            rows: vec![],
            pending_delete: None,
            message: None,
        };
        view.refresh().await;
        Ok(view)
    }

    pub fn route(&self) -> &RouteContext {
        &self.route
    }

    pub fn kind(&self) -> &KindRef {
        &self.kind
    }

    pub fn columns(&self) -> &[ListColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn message(&self) -> Option<&ViewMessage> {
        self.message.as_ref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// reload rows from store. on failure previous rows stay
    pub async fn refresh(&mut self) {
        if let Err(err) = self.load_rows().await {
            self.message = Some(ViewMessage::from(&err));
        }
    }

    async fn load_rows(&mut self) -> Result<(), ViewError> {
        let instances = self
            .ctx
            .store()
            .list(&self.kind.plugin().metadata.name, &self.kind.kind)
            .await
            .map_err(ViewError::store)?;
        let now = Utc::now();
        let rows = instances
            .iter()
            .map(|instance| build_row(&self.kind, &self.columns, instance, now))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("{}: listed {} rows", self.kind.kind, rows.len());
        self.rows = rows;
        Ok(())
    }

    /// first step of delete, waits for confirmation
    pub fn request_delete(&mut self, identity: &str) -> Result<(), ViewError> {
        if !self.rows.iter().any(|row| row.identity == identity) {
            return Err(ViewError::InstanceNotFound {
                kind: self.kind.kind.clone(),
                identity: identity.to_owned(),
            });
        }
        self.pending_delete = Some(identity.to_owned());
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// delete instance awaiting confirmation. nothing happens if none pending
    pub async fn confirm_delete(&mut self) -> Result<(), ViewError> {
        let identity = match self.pending_delete.take() {
            Some(identity) => identity,
            None => return Ok(()),
        };

        let deleted = self
            .ctx
            .store()
            .delete(&self.kind.plugin().metadata.name, &self.kind.kind, &identity)
            .await
            .map_err(ViewError::store);
        match deleted {
            Ok(()) => {
                self.rows.retain(|row| row.identity != identity);
                self.message = Some(ViewMessage::info(format!("{} deleted", self.kind.kind)));
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                self.message = Some(ViewMessage::from(&err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use fluvio_future::test_async;
    use serde_json::json;

    use k8_resource_store::DoNothingStore;

    use super::ListView;
    use crate::fixture::context;
    use crate::fixture::registry;
    use crate::fixture::seed_widget;
    use crate::ConsoleContext;
    use crate::RouteContext;
    use crate::ViewError;

    #[test_async]
    async fn test_list_columns_and_badges() -> Result<(), ViewError> {
        let ctx = context();
        seed_widget(
            &ctx,
            "alpha",
            json!({ "size": "small", "replicas": 3 }),
            Some(json!({
                "phase": "Ready",
                "conditions": [{ "type": "Ready", "status": "true" }]
            })),
        )
        .await;
        seed_widget(&ctx, "beta", json!({ "size": "large" }), None).await;

        let view = ListView::open(ctx, RouteContext::new("widgets", "widgets")).await?;
        let labels: Vec<&str> = view.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Size", "Replicas", "Ready", "Phase", "Age"]);

        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "alpha");
        let texts: Vec<&str> = rows[0].cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts[..4], ["small", "3", "Yes", "Ready"]);
        assert!(rows[0].cells[4].text.ends_with('s'));
        assert_eq!(rows[0].cells[3].badge.as_ref().expect("badge").class, "success");
        assert!(rows[0].cells[0].badge.is_none());

        // absent values
        let texts: Vec<&str> = rows[1].cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts[..4], ["large", "-", "-", "-"]);
        assert!(rows[1].cells[3].badge.is_none());
        Ok(())
    }

    #[test_async]
    async fn test_builtin_columns() -> Result<(), ViewError> {
        let ctx = context();
        let view = ListView::open(ctx, RouteContext::new("widgets", "Gizmo")).await?;
        let labels: Vec<&str> = view.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Name", "Age"]);
        assert!(view.rows().is_empty());
        Ok(())
    }

    #[test_async]
    async fn test_delete_needs_confirmation() -> Result<(), ViewError> {
        let ctx = context();
        let first = seed_widget(&ctx, "alpha", json!({ "size": "small" }), None).await;
        seed_widget(&ctx, "beta", json!({ "size": "small" }), None).await;

        let mut view = ListView::open(ctx, RouteContext::new("widgets", "widgets")).await?;
        view.request_delete(&first)?;
        view.cancel_delete();
        view.confirm_delete().await?;
        assert_eq!(view.rows().len(), 2);

        view.request_delete(&first)?;
        assert_eq!(view.pending_delete(), Some(first.as_str()));
        view.confirm_delete().await?;
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].name, "beta");
        assert!(!view.message().expect("message").is_error());

        assert!(matches!(
            view.request_delete("unknown"),
            Err(ViewError::InstanceNotFound { .. })
        ));
        Ok(())
    }

    #[test_async]
    async fn test_store_failure_is_message() -> Result<(), ViewError> {
        let ctx = ConsoleContext::new(registry(), Arc::new(DoNothingStore::default()));
        let mut view = ListView::open(ctx, RouteContext::new("widgets", "widgets")).await?;
        assert!(view.rows().is_empty());
        let message = view.message().expect("message");
        assert!(message.is_error());
        assert!(message.text.contains("unavailable"));

        view.dismiss_message();
        assert!(view.message().is_none());
        Ok(())
    }

    #[test_async]
    async fn test_unknown_route() -> Result<(), ()> {
        let missing_plugin = ListView::open(context(), RouteContext::new("nope", "widgets")).await;
        assert!(matches!(missing_plugin, Err(ViewError::PluginNotFound(_))));
        let missing_kind = ListView::open(context(), RouteContext::new("widgets", "sprockets")).await;
        assert!(matches!(missing_kind, Err(ViewError::KindNotFound { .. })));
        Ok(())
    }
}
