//! Scenario tasks exercising the gateway
//!
//! - `inline_image`: image-to-text with the image embedded as base64
//! - `bucket_image`: image-to-text with the image uploaded to the bucket
//! - `text_to_image`: image generation across provider families

pub mod bucket_image;
pub mod inline_image;
pub mod text_to_image;

pub const DESCRIBE_PROMPT: &str = "What do you see on this picture? Describe it in detail.";

pub(crate) fn banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("{title}");
    println!("{}", "=".repeat(70));
}
