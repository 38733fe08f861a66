use std::fmt;

use serde::Serialize;

/// route parameters handed to generic views and custom components alike
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteContext {
    pub plugin: String,
    /// plural path segment or kind name
    pub kind: String,
    pub identity: Option<String>,
}

impl RouteContext {
    pub fn new<P: Into<String>, K: Into<String>>(plugin: P, kind: K) -> Self {
        Self {
            plugin: plugin.into(),
            kind: kind.into(),
            identity: None,
        }
    }

    pub fn with_identity<I: Into<String>>(mut self, identity: I) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// route of the list view for same plugin and kind
    pub fn list(&self) -> Self {
        Self::new(self.plugin.clone(), self.kind.clone())
    }
}

impl fmt::Display for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.identity {
            Some(identity) => write!(f, "/{}/{}/{}", self.plugin, self.kind, identity),
            None => write!(f, "/{}/{}", self.plugin, self.kind),
        }
    }
}
