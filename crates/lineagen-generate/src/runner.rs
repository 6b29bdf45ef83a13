use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use lineagen_core::{
    ArtifactId, ColumnTypeCatalog, OpKind, SchemaTypeMapping, Workflow, WorkflowError,
};

use crate::choices::ops_choices;
use crate::model::GenerateOptions;

/// How a run ended. Fatal failures are returned as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// The target version count was reached.
    Completed,
    /// No legal transformation remained anywhere reachable.
    Exhausted,
}

/// Summary of one lineage-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub terminal: TerminalState,
    pub versions_generated: usize,
    pub op_usage: BTreeMap<String, u64>,
    pub unsupported_skips: u64,
    pub empty_schema_skips: u64,
    pub duration_ms: u64,
}

#[derive(Default)]
struct RunStats {
    op_usage: BTreeMap<String, u64>,
    unsupported_skips: u64,
    empty_schema_skips: u64,
}

/// Grow `workflow` by random transformations until `target_versions`
/// artifacts exist or no legal transformation remains.
///
/// `serialize_workflow` runs exactly once on every exit path, including
/// the error path, so partial lineage is always preserved for inspection.
pub fn generate_workflow<W, R>(
    workflow: &mut W,
    catalog: &ColumnTypeCatalog,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<RunReport, WorkflowError>
where
    W: Workflow,
    R: Rng,
{
    let run_id = uuid::Uuid::new_v4().to_string();
    let start = Instant::now();
    info!(
        run_id = %run_id,
        target = options.target_versions,
        branching_factor = options.branching_factor,
        "lineage generation started"
    );

    let mut stats = RunStats::default();
    let outcome = run_loop(workflow, catalog, options, rng, &mut stats);

    // Finalize-and-persist runs on every exit path; a failure while
    // persisting must not mask the original error.
    let persisted = workflow.serialize_workflow();

    let terminal = match outcome {
        Ok(state) => {
            persisted?;
            state
        }
        Err(err) => {
            if let Err(persist_err) = persisted {
                error!(error = %persist_err, "failed to persist partial lineage");
            }
            error!(error = %err, "generation failed, partial lineage persisted");
            return Err(err);
        }
    };

    let report = RunReport {
        run_id,
        terminal,
        versions_generated: workflow.artifact_count(),
        op_usage: stats.op_usage,
        unsupported_skips: stats.unsupported_skips,
        empty_schema_skips: stats.empty_schema_skips,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        run_id = %report.run_id,
        terminal = ?report.terminal,
        versions = report.versions_generated,
        duration_ms = report.duration_ms,
        "lineage generation finished"
    );
    Ok(report)
}

fn run_loop<W, R>(
    workflow: &mut W,
    catalog: &ColumnTypeCatalog,
    options: &GenerateOptions,
    rng: &mut R,
    stats: &mut RunStats,
) -> Result<TerminalState, WorkflowError>
where
    W: Workflow,
    R: Rng,
{
    if workflow.artifact_count() == 0 {
        workflow.generate_base_artifact(options.base_columns, options.base_rows, rng)?;
    }

    // Operation kinds a backend already rejected for a given artifact are
    // never offered again, so every unsupported failure shrinks the
    // future choice space and the loop keeps making progress.
    let mut denied: HashSet<(ArtifactId, OpKind)> = HashSet::new();
    let mut stalled = 0_u64;

    while workflow.artifact_count() < options.target_versions {
        if stalled >= options.max_stalled_iterations {
            warn!(stalled, "no progress within the stall budget, stopping");
            return Ok(TerminalState::Exhausted);
        }

        let Some(source_id) = workflow.select_random_artifact(options.branching_factor, rng)
        else {
            return Err(WorkflowError::Backend(
                "no artifact available for selection".to_string(),
            ));
        };
        let source = workflow
            .artifact(source_id)
            .ok_or(WorkflowError::UnknownArtifact(source_id))?;

        if source.schema.is_empty() {
            debug!(artifact = %source.label, "skipping artifact with empty schema");
            stats.empty_schema_skips += 1;
            stalled += 1;
            continue;
        }

        let mapping = SchemaTypeMapping::derive(&source.schema, catalog);
        let mut choices = ops_choices(&mapping, source.num_rows, options.sample_range, rng);
        choices.retain(|choice| !denied.contains(&(source_id, choice.kind())));

        if choices.is_empty() {
            info!(artifact = %source.label, "no legal operation left, stopping");
            return Ok(TerminalState::Exhausted);
        }

        let choice = &choices[rng.random_range(0..choices.len())];
        info!(
            source = %source.label,
            op = %choice.kind(),
            target = workflow.artifact_count(),
            "applying operation"
        );

        match workflow.generate_artifact_from_operation(source_id, choice, rng) {
            Ok(_) => {
                stalled = 0;
                *stats.op_usage.entry(choice.kind().to_string()).or_insert(0) += 1;
            }
            Err(WorkflowError::Unsupported(kind)) => {
                warn!(
                    artifact = %source.label,
                    op = %kind,
                    "operation not supported by this backend, skipping"
                );
                denied.insert((source_id, kind));
                stats.unsupported_skips += 1;
                stalled += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(TerminalState::Completed)
}
