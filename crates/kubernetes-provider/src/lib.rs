#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
pub mod models;
pub mod plugin;
pub mod transform;

// --- Public API Re-exports ---

pub use client::KubernetesClient;
pub use error::KubernetesError;
pub use plugin::{KubernetesPlugin, PROVIDER_NAME};
pub use transform::KubernetesTransformer;
