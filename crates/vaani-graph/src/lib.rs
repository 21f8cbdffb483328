//! # Vaani Graph
//!
//! Neo4j store adapter for Vaani.
//!
//! [`GraphClient`] implements [`vaani_core::GraphStore`]: it runs bound
//! templates over a pooled session, decodes rows into column maps and
//! rebuilds the pool on transient failures. Schema setup and name search are
//! administrative helpers used by the CLI.

pub mod client;
pub mod schema;
pub mod search;

pub use client::{GraphClient, GraphConfig};
pub use schema::initialize_schema;
pub use search::{search_names, NameMatch};
