use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Content that can be sent in messages
///
/// Either plain text or an ordered list of parts mixing text and images.
/// Parts are rendered to the gateway in the order they were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Simple text content
    Text(String),

    /// Multipart content (text + images)
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },

    ImageUrl {
        image_url: ImageUrl,
    },
}

/// Image reference, either a remote URL or an inline `data:` URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

impl ImageUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            detail: None,
        }
    }

    /// Encode raw image bytes as a `data:<mime>;base64,<payload>` URL
    pub fn inline(mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = general_purpose::STANDARD.encode(bytes);
        Self::new(format!("{DATA_URL_PREFIX}{mime_type}{BASE64_MARKER}{encoded}"))
    }

    pub fn with_detail(mut self, detail: ImageDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// True when the image travels inside the request body
    pub fn is_inline(&self) -> bool {
        self.url.starts_with(DATA_URL_PREFIX)
    }

    /// Decode an inline image back into `(mime_type, bytes)`
    ///
    /// Returns `None` for remote URLs and for malformed or non-base64 data URLs.
    pub fn decode_inline(&self) -> Option<(String, Vec<u8>)> {
        let body = self.url.strip_prefix(DATA_URL_PREFIX)?;
        let (mime_type, payload) = body.split_once(BASE64_MARKER)?;
        let bytes = general_purpose::STANDARD.decode(payload).ok()?;
        Some((mime_type.to_string(), bytes))
    }
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image referenced by a remote URL
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl::new(url),
        }
    }

    /// Image embedded in the request as base64 data
    pub fn inline_image(mime_type: &str, bytes: &[u8]) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl::inline(mime_type, bytes),
        }
    }
}

impl Content {
    /// Create text content
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Get as plain text (if possible)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Parts(parts) => match parts.as_slice() {
                [ContentPart::Text { text }] => Some(text),
                _ => None,
            },
        }
    }

    /// Image parts in order, skipping text
    pub fn images(&self) -> Vec<&ImageUrl> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::ImageUrl { image_url } => Some(image_url),
                    ContentPart::Text { .. } => None,
                })
                .collect(),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}
