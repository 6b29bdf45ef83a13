use rand::RngCore;
use thiserror::Error;

use crate::ops::{OpKind, OperationChoice};
use crate::schema::Schema;

/// Identifier of an artifact inside one workflow. Artifact storage is
/// append-only, so ids stay stable for the lifetime of a run.
pub type ArtifactId = usize;

/// Owned view of the artifact fields the generation loop reads. The
/// backend's storage representation stays opaque beyond these.
#[derive(Debug, Clone)]
pub struct ArtifactSnapshot {
    pub id: ArtifactId,
    pub label: String,
    pub schema: Schema,
    pub num_rows: u64,
}

/// Errors produced by workflow backends.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The backend cannot execute this operation kind. The loop recovers
    /// from this by excluding the (artifact, kind) pair and continuing.
    #[error("operation '{0}' is not supported by this workflow backend")]
    Unsupported(OpKind),
    /// The referenced artifact does not exist.
    #[error("unknown artifact id {0}")]
    UnknownArtifact(ArtifactId),
    /// Any other execution problem; fatal for the run.
    #[error("backend error: {0}")]
    Backend(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Backend collaborator that owns artifact storage and operation
/// execution. The generation loop drives it through this contract and
/// never mutates an artifact in place: every operation appends a new
/// version and history stays append-only.
pub trait Workflow {
    /// Create version 0 from a random schema of `num_columns` columns
    /// and `num_rows` rows.
    fn generate_base_artifact(
        &mut self,
        num_columns: usize,
        num_rows: u64,
        rng: &mut dyn RngCore,
    ) -> Result<ArtifactId, WorkflowError>;

    /// Pick a source artifact to extend, weighted by `branching_factor`.
    /// Weighting semantics are owned by the backend. Returns `None` only
    /// when the lineage is empty.
    fn select_random_artifact(
        &self,
        branching_factor: f64,
        rng: &mut dyn RngCore,
    ) -> Option<ArtifactId>;

    /// Snapshot of the fields the loop reads from an artifact.
    fn artifact(&self, id: ArtifactId) -> Option<ArtifactSnapshot>;

    /// Apply `choice` to the `source` artifact, appending the result as a
    /// new artifact.
    fn generate_artifact_from_operation(
        &mut self,
        source: ArtifactId,
        choice: &OperationChoice,
        rng: &mut dyn RngCore,
    ) -> Result<ArtifactId, WorkflowError>;

    /// Number of artifacts generated so far.
    fn artifact_count(&self) -> usize;

    /// Persist all artifacts and lineage metadata to durable storage.
    /// Idempotent; safe to call more than once within a run.
    fn serialize_workflow(&self) -> Result<(), WorkflowError>;
}
