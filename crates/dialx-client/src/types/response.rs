use super::custom_content::{Attachment, CustomContent};

/// Result of one completion call
///
/// Built once from the first choice of the gateway response and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    content: String,
    custom_content: Option<CustomContent>,
}

impl Response {
    pub fn new(content: impl Into<String>, custom_content: Option<CustomContent>) -> Self {
        Self {
            content: content.into(),
            custom_content,
        }
    }

    /// Assistant text (empty when the gateway sent `null`)
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn custom_content(&self) -> Option<&CustomContent> {
        self.custom_content.as_ref()
    }

    /// Attachments returned with the completion; empty when there are none
    pub fn attachments(&self) -> &[Attachment] {
        self.custom_content
            .as_ref()
            .map(|c| c.attachments.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_custom_content_yields_empty_attachments() {
        let response = Response::new("done", Some(CustomContent::default()));
        assert!(response.custom_content().is_some());
        assert!(response.attachments().is_empty());
    }

    #[test]
    fn test_absent_custom_content_yields_empty_attachments() {
        let response = Response::new("done", None);
        assert!(response.attachments().is_empty());
    }
}
