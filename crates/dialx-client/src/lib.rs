pub mod bucket;
pub mod config;
pub mod error;
pub mod generation;
pub mod model;
pub mod types;

mod http;

pub use bucket::{BucketClient, FileReference};
pub use config::ClientConfig;
pub use error::{DialError, Result};
pub use generation::{
    AspectRatio, CustomFields, DalleParams, FieldValue, GenerationParams, ImageQuality,
    ImageSize, ImageStyle, ImagenParams, ProviderFamily,
};
pub use model::{ModelClient, ModelClientBuilder};
pub use types::{
    Attachment, Content, ContentPart, CustomContent, ImageDetail, ImageUrl, Message, Response,
    Role,
};
