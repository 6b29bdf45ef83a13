use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::{debug, info};

use lineagen_core::{
    ArtifactId, ArtifactSnapshot, ColumnTypeCatalog, LINEAGE_VERSION, OperationChoice, Schema,
    Workflow, WorkflowError,
};

use crate::schema_gen::generate_schema;
use crate::table::{Table, generate_table, groupby, pivot, sample};

/// One versioned table snapshot plus its lineage pointers.
#[derive(Debug, Clone)]
pub struct InMemoryArtifact {
    pub label: String,
    pub schema: Schema,
    pub table: Table,
    pub parents: Vec<String>,
    pub produced_by: Option<OperationChoice>,
}

/// Reference workflow backend: every artifact lives in memory and
/// `serialize_workflow` writes one CSV per artifact plus a
/// `workflow.json` lineage manifest into the output directory.
#[derive(Debug)]
pub struct InMemoryWorkflow<'a> {
    name: String,
    out_dir: PathBuf,
    catalog: &'a ColumnTypeCatalog,
    artifacts: Vec<InMemoryArtifact>,
}

impl<'a> InMemoryWorkflow<'a> {
    pub fn new(
        name: impl Into<String>,
        out_dir: impl Into<PathBuf>,
        catalog: &'a ColumnTypeCatalog,
    ) -> Self {
        Self {
            name: name.into(),
            out_dir: out_dir.into(),
            catalog,
            artifacts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn out_dir(&self) -> &PathBuf {
        &self.out_dir
    }

    pub fn artifacts(&self) -> &[InMemoryArtifact] {
        &self.artifacts
    }

    fn push(&mut self, artifact: InMemoryArtifact) -> ArtifactId {
        self.artifacts.push(artifact);
        self.artifacts.len() - 1
    }

    fn write_artifact_csv(&self, artifact: &InMemoryArtifact) -> Result<(), WorkflowError> {
        let path = self.out_dir.join(format!("{}.csv", artifact.label));
        let writer = BufWriter::new(File::create(&path)?);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        let header: Vec<&str> = artifact.schema.column_names().collect();
        writer
            .write_record(&header)
            .map_err(|err| WorkflowError::Backend(err.to_string()))?;

        for row in artifact.table.rows() {
            let record: Vec<String> = row.iter().map(|cell| cell.to_csv()).collect();
            writer
                .write_record(&record)
                .map_err(|err| WorkflowError::Backend(err.to_string()))?;
        }

        writer
            .flush()
            .map_err(|err| WorkflowError::Backend(err.to_string()))?;
        Ok(())
    }
}

impl Workflow for InMemoryWorkflow<'_> {
    fn generate_base_artifact(
        &mut self,
        num_columns: usize,
        num_rows: u64,
        rng: &mut dyn RngCore,
    ) -> Result<ArtifactId, WorkflowError> {
        let schema = generate_schema(num_columns, self.catalog, rng);
        let table = generate_table(&schema, num_rows, rng)
            .map_err(|err| WorkflowError::Backend(err.to_string()))?;
        info!(columns = schema.len(), rows = num_rows, "generated base artifact");

        Ok(self.push(InMemoryArtifact {
            label: "artifact_0".to_string(),
            schema,
            table,
            parents: Vec::new(),
            produced_by: None,
        }))
    }

    fn select_random_artifact(
        &self,
        branching_factor: f64,
        rng: &mut dyn RngCore,
    ) -> Option<ArtifactId> {
        if self.artifacts.is_empty() {
            return None;
        }

        // Geometric recency bias: artifact i weighs branching_factor^i,
        // so 1.0 is uniform and larger factors favor recent versions.
        // Weights are normalized by the largest one, keeping the total
        // finite on long lineages where a raw power would overflow.
        let factor = if branching_factor > 0.0 {
            branching_factor
        } else {
            1.0
        };
        let top = if factor >= 1.0 {
            (self.artifacts.len() - 1) as i32
        } else {
            0
        };
        let weights: Vec<f64> = (0..self.artifacts.len())
            .map(|i| factor.powi(i as i32 - top))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut draw = rng.random::<f64>() * total;
        for (index, weight) in weights.iter().enumerate() {
            if draw < *weight {
                return Some(index);
            }
            draw -= weight;
        }
        Some(self.artifacts.len() - 1)
    }

    fn artifact(&self, id: ArtifactId) -> Option<ArtifactSnapshot> {
        self.artifacts.get(id).map(|artifact| ArtifactSnapshot {
            id,
            label: artifact.label.clone(),
            schema: artifact.schema.clone(),
            num_rows: artifact.table.num_rows(),
        })
    }

    fn generate_artifact_from_operation(
        &mut self,
        source: ArtifactId,
        choice: &OperationChoice,
        rng: &mut dyn RngCore,
    ) -> Result<ArtifactId, WorkflowError> {
        let src = self
            .artifacts
            .get(source)
            .ok_or(WorkflowError::UnknownArtifact(source))?;

        let (schema, table) = match choice {
            OperationChoice::Groupby {
                group_columns,
                agg_columns,
                agg_function,
            } => groupby(&src.schema, &src.table, group_columns, agg_columns, *agg_function)
                .map_err(|err| WorkflowError::Backend(err.to_string()))?,
            OperationChoice::Pivot {
                index_column,
                pivot_column,
                value_column,
                agg_function,
            } => pivot(
                &src.schema,
                &src.table,
                index_column,
                pivot_column,
                value_column,
                *agg_function,
            )
            .map_err(|err| WorkflowError::Backend(err.to_string()))?,
            OperationChoice::Sample { fraction } => {
                (src.schema.clone(), sample(&src.table, *fraction, rng))
            }
        };

        let parents = vec![src.label.clone()];
        let label = format!("artifact_{}", self.artifacts.len());
        debug!(
            source = %parents[0],
            target = %label,
            op = %choice.kind(),
            rows = table.num_rows(),
            "materialized artifact"
        );

        Ok(self.push(InMemoryArtifact {
            label,
            schema,
            table,
            parents,
            produced_by: Some(choice.clone()),
        }))
    }

    fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    fn serialize_workflow(&self) -> Result<(), WorkflowError> {
        std::fs::create_dir_all(&self.out_dir)?;

        for artifact in &self.artifacts {
            self.write_artifact_csv(artifact)?;
        }

        let manifest = WorkflowManifest {
            lineage_version: LINEAGE_VERSION,
            name: &self.name,
            generated_at: chrono::Utc::now().to_rfc3339(),
            artifacts: self
                .artifacts
                .iter()
                .map(|artifact| ManifestArtifact {
                    label: &artifact.label,
                    schema: &artifact.schema,
                    num_rows: artifact.table.num_rows(),
                    parents: &artifact.parents,
                    produced_by: artifact.produced_by.as_ref(),
                })
                .collect(),
        };
        let path = self.out_dir.join("workflow.json");
        std::fs::write(&path, serde_json::to_vec_pretty(&manifest)?)?;

        info!(
            path = %self.out_dir.display(),
            artifacts = self.artifacts.len(),
            "workflow serialized"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct WorkflowManifest<'a> {
    lineage_version: &'a str,
    name: &'a str,
    generated_at: String,
    artifacts: Vec<ManifestArtifact<'a>>,
}

#[derive(Serialize)]
struct ManifestArtifact<'a> {
    label: &'a str,
    schema: &'a Schema,
    num_rows: u64,
    parents: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    produced_by: Option<&'a OperationChoice>,
}
