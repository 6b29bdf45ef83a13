//! Random lineage generation for tabular-dataset versions.
//!
//! This crate grows a workflow of table artifacts by repeatedly picking a
//! source version, enumerating the transformations that are structurally
//! legal for it, and materializing one of them through a workflow backend.
//! The in-memory reference backend persists every table as CSV plus a
//! `workflow.json` lineage manifest.

pub mod choices;
pub mod errors;
pub mod model;
pub mod runner;
pub mod schema_gen;
pub mod table;
pub mod values;
pub mod workflow;

pub use choices::{SampleRange, ops_choices};
pub use errors::GenerationError;
pub use model::GenerateOptions;
pub use runner::{RunReport, TerminalState, generate_workflow};
pub use values::CellValue;
pub use workflow::{InMemoryArtifact, InMemoryWorkflow};
