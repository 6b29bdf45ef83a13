//! Core contracts for lineagen.
//!
//! This crate defines the column-type catalog, the schema model, the
//! transformation choice types, and the workflow collaborator contract
//! shared by the generation engine and the CLI.

pub mod catalog;
pub mod error;
pub mod ops;
pub mod schema;
pub mod workflow;

pub use catalog::{Category, ColumnTypeCatalog};
pub use error::{Error, Result};
pub use ops::{AggFunction, OpKind, OperationChoice};
pub use schema::{ColumnDef, Schema, SchemaTypeMapping};
pub use workflow::{ArtifactId, ArtifactSnapshot, Workflow, WorkflowError};

/// Current contract version for `workflow.json` lineage artifacts.
pub const LINEAGE_VERSION: &str = "0.1";
