#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
pub mod models;
pub mod plugin;
pub mod transform;

// --- Public API Re-exports ---

pub use client::OpenStackClient;
pub use error::OpenStackError;
pub use plugin::{OpenStackPlugin, PROVIDER_NAME};
pub use transform::OpenStackTransformer;
