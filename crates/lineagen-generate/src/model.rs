use serde::{Deserialize, Serialize};

use crate::choices::SampleRange;

/// Options for one lineage-generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Stop once this many artifacts exist.
    pub target_versions: usize,
    /// Columns in the base artifact's schema.
    pub base_columns: usize,
    /// Rows in the base artifact.
    pub base_rows: u64,
    /// Bias applied when the backend selects a source artifact.
    pub branching_factor: f64,
    /// Bounds for the sample-fraction draw.
    pub sample_range: SampleRange,
    /// Consecutive no-progress iterations tolerated before the loop stops
    /// gracefully.
    pub max_stalled_iterations: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            target_versions: 10,
            base_columns: 10,
            base_rows: 1000,
            branching_factor: 1.0,
            sample_range: SampleRange::default(),
            max_stalled_iterations: 64,
        }
    }
}
