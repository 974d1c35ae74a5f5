#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod neo4j;
pub mod queries;
pub mod repository;
pub mod schema;
pub mod utils;

// --- Public API Re-exports ---

pub use config::GraphStoreConfig;
pub use error::GraphStoreError;
pub use neo4j::Neo4jRepository;
pub use queries::{GraphQueries, InstanceRecord, PodRecord};
pub use repository::GraphRepository;
pub use schema::{edge_rule, EdgeRule, MatchField, KNOWN_LABELS};
