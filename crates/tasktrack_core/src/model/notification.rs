//! Notification domain model.

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// Opaque notification identifier.
pub type NotificationId = String;

/// Notification severity, serialized as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Timestamp,
    pub read: bool,
}

impl Notification {
    /// Creates an unread notification.
    pub fn new(
        id: impl Into<NotificationId>,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            message: message.into(),
            created_at,
            read: false,
        }
    }
}
