//! # kngr-core
//!
//! Core types and error types for the kngr knowledge graph.
//!
//! This crate provides the foundational types shared across all kngr crates:
//! - The persisted graph model (entities, relations, project classification)
//! - Request records accepted by graph operations, with boundary validation
//! - Response records returned by graph operations
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod graph;
pub mod requests;
pub mod responses;

pub use enums::ProjectType;
pub use errors::CoreError;
pub use graph::{Entity, KnowledgeGraph, MetadataValue, ProjectMetadata, Relation};
