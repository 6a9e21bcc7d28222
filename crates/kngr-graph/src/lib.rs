//! # kngr-graph
//!
//! Entity/relation knowledge graph with JSON-file persistence.
//!
//! - [`GraphStore`]: in-memory graph, mutations, and queries; saves after
//!   every mutation
//! - [`PersistenceManager`]: load with corruption recovery, save with a
//!   one-time directory fallback
//! - [`PathResolver`]: ordered directory tiers for the graph file
//! - [`ProjectClassifier`]: tags fresh graphs as software, data science, or
//!   generic
//! - [`QueryEngine`]: substring search and exact-name subgraphs
//! - [`DiagramRenderer`]: Mermaid companion document written next to the graph
//!
//! ```no_run
//! use kngr_config::KngrConfig;
//! use kngr_core::requests::EntityInput;
//! use kngr_graph::{GraphStore, PathHints};
//!
//! let config = KngrConfig::load(None)?;
//! let mut store = GraphStore::from_config(&config, &PathHints::default());
//! store.create_entities(&[EntityInput::new("Alice", "person", &["likes tea"])])?;
//! let found = store.search_nodes("tea");
//! assert_eq!(found.entities.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod diagram;
pub mod error;
pub mod path;
pub mod persistence;
pub mod query;
pub mod store;

pub use classifier::{Classification, ProjectClassifier};
pub use diagram::{DiagramFooter, DiagramRenderer, DiagramReport, scan_footer};
pub use error::{GraphError, LoadFailure};
pub use path::{PathHints, PathResolver, PathSource, ResolvedPath};
pub use persistence::{PersistenceManager, SaveReport};
pub use query::QueryEngine;
pub use store::{GraphStore, StoreLocation};
