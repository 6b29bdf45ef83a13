use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};

use lineagen_core::{Category, ColumnTypeCatalog, Schema};

const PREFIX_LEN: usize = 5;

/// Random alphanumeric token that keeps generated column names unique.
pub fn generate_prefix<R: Rng + ?Sized>(rng: &mut R) -> String {
    Alphanumeric.sample_string(rng, PREFIX_LEN)
}

/// Build a random schema of `num_columns` columns.
///
/// When the width allows, every category contributes at least one label
/// and the remaining slots are distributed randomly across categories;
/// narrower schemas draw labels uniformly from the whole catalog. Column
/// names are `{prefix}__{label}` with a fresh prefix per column.
pub fn generate_schema<R: Rng + ?Sized>(
    num_columns: usize,
    catalog: &ColumnTypeCatalog,
    rng: &mut R,
) -> Schema {
    let mut labels: Vec<String> = Vec::with_capacity(num_columns);

    if num_columns < Category::ALL.len() {
        let all = catalog.all_labels();
        for _ in 0..num_columns {
            labels.push(all[rng.random_range(0..all.len())].to_string());
        }
    } else {
        let mut counts = [1_usize; Category::ALL.len()];
        let mut total = Category::ALL.len();
        while total < num_columns {
            counts[rng.random_range(0..counts.len())] += 1;
            total += 1;
        }
        for (category, count) in Category::ALL.iter().zip(counts) {
            let pool = catalog.labels(*category);
            for _ in 0..count {
                labels.push(pool[rng.random_range(0..pool.len())].clone());
            }
        }
    }

    let mut schema = Schema::new();
    for label in labels {
        loop {
            let name = format!("{}__{}", generate_prefix(rng), label);
            if !schema.contains(&name) {
                schema.push(name, label.as_str());
                break;
            }
        }
    }
    schema
}
