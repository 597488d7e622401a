use serde::{Deserialize, Serialize};

/// Reference to a binary payload stored outside the message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub title: String,

    pub url: String,

    /// MIME type, e.g. `image/png`
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Attachment {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Out-of-band content carried on a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomContent {
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl CustomContent {
    pub fn new(attachments: Vec<Attachment>) -> Self {
        Self { attachments }
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}
