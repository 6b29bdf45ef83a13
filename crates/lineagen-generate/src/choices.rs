use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

use lineagen_core::{AggFunction, Category, OperationChoice, SchemaTypeMapping};

use crate::values::round2;

/// Minimum row count before `sample` becomes legal.
pub const SAMPLE_MIN_ROWS: u64 = 10;

/// Most group columns a groupby will draw.
const MAX_GROUP_COLUMNS: usize = 2;

/// Bounds for the sample-fraction draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SampleRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 0.99,
        }
    }
}

/// Draw `count` distinct columns of `category` without replacement.
///
/// Returns `None` when fewer than `count` columns are available — never a
/// partial result; the caller skips the candidate transformation.
pub fn select_rand_columns<R: Rng + ?Sized>(
    mapping: &SchemaTypeMapping,
    count: usize,
    category: Category,
    rng: &mut R,
) -> Option<Vec<String>> {
    let options = mapping.columns(category);
    if options.len() < count {
        warn!(
            category = %category,
            requested = count,
            available = options.len(),
            "not enough columns to select"
        );
        return None;
    }
    Some(options.choose_multiple(rng, count).cloned().collect())
}

/// One aggregation function, drawn uniformly.
pub fn select_rand_aggregate<R: Rng + ?Sized>(rng: &mut R) -> AggFunction {
    *AggFunction::ALL.choose(rng).unwrap_or(&AggFunction::Count)
}

/// Uniform fraction inside `range`, rounded to two decimals.
pub fn rand_fraction<R: Rng + ?Sized>(range: SampleRange, rng: &mut R) -> f64 {
    round2((range.max - range.min) * rng.random::<f64>() + range.min)
}

/// Enumerate the transformations that are structurally legal for a table
/// with this type mapping and row count, each with fully-bound arguments.
///
/// An empty result is not an error: the caller treats the table as
/// exhausted. A category missing from the mapping simply disables every
/// choice depending on it.
pub fn ops_choices<R: Rng + ?Sized>(
    mapping: &SchemaTypeMapping,
    num_rows: u64,
    sample_range: SampleRange,
    rng: &mut R,
) -> Vec<OperationChoice> {
    let mut choices = Vec::new();

    if mapping.has(Category::Numeric) {
        let numeric_columns = mapping.columns(Category::Numeric);
        // one numeric pick, shared with the pivot candidate below
        let value_column = numeric_columns.choose(rng).cloned();

        if mapping.has(Category::Groupable) {
            let groupable = mapping.columns(Category::Groupable);

            let wanted = rng.random_range(1..=MAX_GROUP_COLUMNS).min(groupable.len());
            if let Some(group_columns) =
                select_rand_columns(mapping, wanted, Category::Groupable, rng)
            {
                choices.push(OperationChoice::Groupby {
                    group_columns,
                    agg_columns: numeric_columns.to_vec(),
                    agg_function: select_rand_aggregate(rng),
                });
            }

            if groupable.len() >= 2 {
                let pair = select_rand_columns(mapping, 2, Category::Groupable, rng);
                if let (Some(pair), Some(value_column)) = (pair, value_column) {
                    let mut pair = pair.into_iter();
                    if let (Some(index_column), Some(pivot_column)) = (pair.next(), pair.next()) {
                        choices.push(OperationChoice::Pivot {
                            index_column,
                            pivot_column,
                            value_column,
                            agg_function: select_rand_aggregate(rng),
                        });
                    }
                }
            }
        }
    }

    if num_rows >= SAMPLE_MIN_ROWS {
        choices.push(OperationChoice::Sample {
            fraction: rand_fraction(sample_range, rng),
        });
    }

    choices
}
