use serde::Serialize;

use crate::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Error,
}

/// dismissible notice shown at the top of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl ViewMessage {
    pub fn info<S: Into<String>>(text: S) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == MessageLevel::Error
    }
}

impl From<&ViewError> for ViewMessage {
    fn from(err: &ViewError) -> Self {
        Self::error(err.to_string())
    }
}
