mod client;

pub use client::{BucketClient, FileReference};
