use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use k8_resource_store::StoreError;
use k8_schema::PathError;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("plugin {0} not found")]
    PluginNotFound(String),
    #[error("resource kind {kind} not found in plugin {plugin}")]
    KindNotFound { plugin: String, kind: String },
    #[error("route for {0} view has no instance identity")]
    MissingIdentity(&'static str),
    #[error("{kind} {identity} not found")]
    InstanceNotFound { kind: String, identity: String },
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("store error: {0}")]
    Store(String),
    #[error("Json error: {0}")]
    Json(#[from] SerdeJsonError),
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

impl ViewError {
    pub fn store<E: StoreError>(err: E) -> Self {
        Self::Store(err.to_string())
    }

    /// problems found by form validation
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Validation(problems) => problems,
            _ => &[],
        }
    }
}
