use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use k8_plugin_registry::KindRef;
use k8_resource_store::ResourceStore;
use k8_schema::format::scalar_text;
use k8_schema::format::EMPTY_CELL;
use k8_schema::layout::read_groups;
use k8_schema::Badge;
use k8_schema::ResourceInstance;

use crate::ConsoleContext;
use crate::RouteContext;
use crate::ViewError;
use crate::ViewMessage;

/// read only rendering of a document value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DisplayValue {
    Empty,
    Scalar(String),
    List(Vec<DisplayValue>),
    Fields(Vec<DetailField>),
}

impl DisplayValue {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Array(items) => Self::List(items.iter().map(Self::from_value).collect()),
            Value::Object(fields) => Self::Fields(
                fields
                    .iter()
                    .map(|(name, field)| DetailField::new(name, field))
                    .collect(),
            ),
            scalar => Self::Scalar(scalar_text(scalar).unwrap_or_default()),
        }
    }

    /// one line summary, composites are not flattened
    pub fn text(&self) -> &str {
        match self {
            Self::Scalar(text) => text,
            _ => EMPTY_CELL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub name: String,
    pub value: DisplayValue,
}

impl DetailField {
    fn new(name: &str, value: &Value) -> Self {
        Self {
            name: name.to_owned(),
            value: DisplayValue::from_value(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailGroup {
    pub name: Option<String>,
    pub fields: Vec<DetailField>,
}

/// read only page of one instance
pub struct DetailView<S> {
    ctx: ConsoleContext<S>,
    route: RouteContext,
    kind: KindRef,
    instance: ResourceInstance,
    spec: Vec<DetailGroup>,
    status: Vec<DetailField>,
    badge: Option<Badge>,
    message: Option<ViewMessage>,
}

impl<S> DetailView<S>
where
    S: ResourceStore,
{
    #[instrument(skip(ctx))]
    pub async fn open(ctx: ConsoleContext<S>, route: RouteContext) -> Result<Self, ViewError> {
        let kind = ctx.resolve_kind(&route)?;
        let identity = route
            .identity()
            .ok_or(ViewError::MissingIdentity("detail"))?
            .to_owned();
        let instance = fetch(&ctx, &kind, &identity).await?;

        let mut view = Self {
            ctx,
            route,
            kind,
            instance,
            spec: vec![],
            status: vec![],
            badge: None,
            message: None,
        };
        view.render()?;
        Ok(view)
    }

    fn render(&mut self) -> Result<(), ViewError> {
        let hints = self.kind.plugin().hints(&self.kind.kind);
        let spec = &self.instance.spec;
        self.spec = read_groups(&self.kind.spec_schema, hints)
            .into_iter()
            .map(|group| DetailGroup {
                fields: group
                    .fields
                    .iter()
                    .map(|name| DetailField::new(name, spec.get(name).unwrap_or(&Value::Null)))
                    .collect(),
                name: group.name,
            })
            .collect();

        self.status = match &self.instance.status {
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(name, value)| DetailField::new(name, value))
                .collect(),
            _ => vec![],
        };

        let doc = self.instance.to_document()?;
        self.badge = hints
            .status_mapping
            .as_ref()
            .and_then(|mapping| mapping.badge_of(&doc))
            .cloned();
        Ok(())
    }

    pub fn route(&self) -> &RouteContext {
        &self.route
    }

    pub fn kind(&self) -> &KindRef {
        &self.kind
    }

    pub fn instance(&self) -> &ResourceInstance {
        &self.instance
    }

    pub fn spec_groups(&self) -> &[DetailGroup] {
        &self.spec
    }

    pub fn status_fields(&self) -> &[DetailField] {
        &self.status
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    pub fn message(&self) -> Option<&ViewMessage> {
        self.message.as_ref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// reload instance. on failure the last rendering stays
    pub async fn refresh(&mut self) {
        let fetched = fetch(&self.ctx, &self.kind, self.instance.identity()).await;
        let reloaded = match fetched {
            Ok(instance) => {
                self.instance = instance;
                self.render()
            }
            Err(err) => Err(err),
        };
        if let Err(err) = reloaded {
            self.message = Some(ViewMessage::from(&err));
        }
    }
}

async fn fetch<S: ResourceStore>(
    ctx: &ConsoleContext<S>,
    kind: &KindRef,
    identity: &str,
) -> Result<ResourceInstance, ViewError> {
    ctx.store()
        .get(&kind.plugin().metadata.name, &kind.kind, identity)
        .await
        .map_err(ViewError::store)?
        .ok_or_else(|| ViewError::InstanceNotFound {
            kind: kind.kind.clone(),
            identity: identity.to_owned(),
        })
}
