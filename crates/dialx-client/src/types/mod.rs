pub mod content;
pub mod custom_content;
pub mod message;
pub mod response;

pub use content::{Content, ContentPart, ImageDetail, ImageUrl};
pub use custom_content::{Attachment, CustomContent};
pub use message::{Message, Role};
pub use response::Response;
