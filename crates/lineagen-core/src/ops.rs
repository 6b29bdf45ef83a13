use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregation functions available to groupby and pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunction {
    Min,
    Max,
    Sum,
    Mean,
    Count,
}

impl AggFunction {
    pub const ALL: [AggFunction; 5] = [
        AggFunction::Min,
        AggFunction::Max,
        AggFunction::Sum,
        AggFunction::Mean,
        AggFunction::Count,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Sum => "sum",
            AggFunction::Mean => "mean",
            AggFunction::Count => "count",
        }
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of transformation, without its bound arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Groupby,
    Pivot,
    Sample,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Groupby => "groupby",
            OpKind::Pivot => "pivot",
            OpKind::Sample => "sample",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully-parameterized candidate transformation, ready to execute
/// against a specific artifact. Immutable once produced; consumed exactly
/// once by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "lowercase")]
pub enum OperationChoice {
    Groupby {
        group_columns: Vec<String>,
        agg_columns: Vec<String>,
        agg_function: AggFunction,
    },
    Pivot {
        index_column: String,
        pivot_column: String,
        value_column: String,
        agg_function: AggFunction,
    },
    Sample {
        fraction: f64,
    },
}

impl OperationChoice {
    pub fn kind(&self) -> OpKind {
        match self {
            OperationChoice::Groupby { .. } => OpKind::Groupby,
            OperationChoice::Pivot { .. } => OpKind::Pivot,
            OperationChoice::Sample { .. } => OpKind::Sample,
        }
    }
}
