use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::Content;
use super::custom_content::{Attachment, CustomContent};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message as the gateway expects it
///
/// `custom_content` carries attachments (bucket references) alongside the
/// message body and is left off the wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_content: Option<CustomContent>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
            custom_content: None,
        }
    }

    /// Create system message
    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create user message
    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create assistant message
    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_custom_content(mut self, custom_content: CustomContent) -> Self {
        self.custom_content = Some(custom_content);
        self
    }

    pub fn with_attachments(self, attachments: Vec<Attachment>) -> Self {
        self.with_custom_content(CustomContent { attachments })
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.custom_content
            .as_ref()
            .map(|c| c.attachments.as_slice())
            .unwrap_or_default()
    }
}
