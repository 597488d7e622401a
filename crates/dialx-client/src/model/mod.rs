mod client;
mod wire;

pub use client::{ModelClient, ModelClientBuilder};
