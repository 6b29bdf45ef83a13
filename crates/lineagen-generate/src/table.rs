use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use lineagen_core::{AggFunction, Schema};

use crate::errors::GenerationError;
use crate::values::{CellValue, value_for_label};

/// In-memory row store, aligned with a schema's column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn num_rows(&self) -> u64 {
        self.rows.len() as u64
    }
}

/// Fill a table of synthetic values for `schema`.
pub fn generate_table<R: Rng + ?Sized>(
    schema: &Schema,
    num_rows: u64,
    rng: &mut R,
) -> Result<Table, GenerationError> {
    let mut rows = Vec::with_capacity(num_rows as usize);
    for _ in 0..num_rows {
        let mut row = Vec::with_capacity(schema.len());
        for column in schema.iter() {
            row.push(value_for_label(&column.label, rng)?);
        }
        rows.push(row);
    }
    Ok(Table::new(rows))
}

/// Group rows by the distinct combinations of `group_columns` and
/// aggregate every `agg_columns` entry with `agg_function`. Output rows
/// follow the sorted order of the group keys so results are deterministic.
pub fn groupby(
    schema: &Schema,
    table: &Table,
    group_columns: &[String],
    agg_columns: &[String],
    agg_function: AggFunction,
) -> Result<(Schema, Table), GenerationError> {
    let group_idx = resolve_columns(schema, group_columns)?;
    let agg_idx = resolve_columns(schema, agg_columns)?;

    let mut groups: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
    for (row_index, row) in table.rows().iter().enumerate() {
        let key: Vec<String> = group_idx.iter().map(|&i| row[i].group_key()).collect();
        groups.entry(key).or_default().push(row_index);
    }

    let mut out_schema = Schema::new();
    for &i in group_idx.iter().chain(agg_idx.iter()) {
        if let Some(column) = schema.column(i) {
            out_schema.push(column.name.as_str(), column.label.as_str());
        }
    }

    let mut rows = Vec::with_capacity(groups.len());
    for members in groups.values() {
        let first = &table.rows()[members[0]];
        let mut row: Vec<CellValue> = group_idx.iter().map(|&i| first[i].clone()).collect();
        for &i in &agg_idx {
            let values: Vec<f64> = members
                .iter()
                .filter_map(|&r| table.rows()[r][i].as_f64())
                .collect();
            row.push(aggregate(agg_function, &values));
        }
        rows.push(row);
    }

    Ok((out_schema, Table::new(rows)))
}

/// Pivot the table: one output row per distinct index value, one output
/// column per distinct pivot value, cells holding the aggregated value
/// column. Combinations with no source rows become nulls.
pub fn pivot(
    schema: &Schema,
    table: &Table,
    index_column: &str,
    pivot_column: &str,
    value_column: &str,
    agg_function: AggFunction,
) -> Result<(Schema, Table), GenerationError> {
    let index_i = resolve_column(schema, index_column)?;
    let pivot_i = resolve_column(schema, pivot_column)?;
    let value_i = resolve_column(schema, value_column)?;
    let value_label = schema
        .label_of(value_column)
        .unwrap_or_default()
        .to_string();

    let mut pivot_keys: BTreeSet<String> = BTreeSet::new();
    let mut index_values: BTreeMap<String, CellValue> = BTreeMap::new();
    let mut cells: BTreeMap<String, BTreeMap<String, Vec<f64>>> = BTreeMap::new();

    for row in table.rows() {
        let index_key = row[index_i].group_key();
        let pivot_key = row[pivot_i].group_key();
        index_values
            .entry(index_key.clone())
            .or_insert_with(|| row[index_i].clone());
        pivot_keys.insert(pivot_key.clone());
        let bucket = cells.entry(index_key).or_default().entry(pivot_key).or_default();
        if let Some(value) = row[value_i].as_f64() {
            bucket.push(value);
        }
    }

    let mut out_schema = Schema::new();
    if let Some(column) = schema.column(index_i) {
        out_schema.push(column.name.as_str(), column.label.as_str());
    }
    for pivot_key in &pivot_keys {
        out_schema.push(pivot_key.as_str(), value_label.as_str());
    }

    let mut rows = Vec::with_capacity(index_values.len());
    for (index_key, index_value) in &index_values {
        let mut row = Vec::with_capacity(out_schema.len());
        row.push(index_value.clone());
        let by_pivot = cells.get(index_key);
        for pivot_key in &pivot_keys {
            match by_pivot.and_then(|map| map.get(pivot_key)) {
                Some(values) => row.push(aggregate(agg_function, values)),
                None => row.push(CellValue::Null),
            }
        }
        rows.push(row);
    }

    Ok((out_schema, Table::new(rows)))
}

/// Keep `round(fraction * num_rows)` rows, drawn without replacement,
/// preserving the original row order.
pub fn sample<R: Rng + ?Sized>(table: &Table, fraction: f64, rng: &mut R) -> Table {
    let total = table.rows().len();
    let amount = ((total as f64) * fraction).round() as usize;
    let amount = amount.min(total);

    let mut indices = rand::seq::index::sample(rng, total, amount).into_vec();
    indices.sort_unstable();
    Table::new(
        indices
            .into_iter()
            .map(|i| table.rows()[i].clone())
            .collect(),
    )
}

fn aggregate(function: AggFunction, values: &[f64]) -> CellValue {
    match function {
        AggFunction::Count => CellValue::Int(values.len() as i64),
        AggFunction::Sum => CellValue::Float(values.iter().sum()),
        AggFunction::Min => values
            .iter()
            .copied()
            .reduce(f64::min)
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        AggFunction::Max => values
            .iter()
            .copied()
            .reduce(f64::max)
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        AggFunction::Mean => {
            if values.is_empty() {
                CellValue::Null
            } else {
                CellValue::Float(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    }
}

fn resolve_column(schema: &Schema, name: &str) -> Result<usize, GenerationError> {
    schema
        .index_of(name)
        .ok_or_else(|| GenerationError::UnknownColumn(name.to_string()))
}

fn resolve_columns(schema: &Schema, names: &[String]) -> Result<Vec<usize>, GenerationError> {
    names
        .iter()
        .map(|name| resolve_column(schema, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn fixture() -> (Schema, Table) {
        let mut schema = Schema::new();
        schema.push("aa__city", "city");
        schema.push("bb__state", "state");
        schema.push("cc__int", "int");

        let rows = vec![
            vec![text("lyon"), text("a"), CellValue::Int(10)],
            vec![text("lyon"), text("b"), CellValue::Int(30)],
            vec![text("nice"), text("a"), CellValue::Int(5)],
        ];
        (schema, Table::new(rows))
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn groupby_aggregates_per_distinct_key() {
        let (schema, table) = fixture();
        let (out_schema, out) = groupby(
            &schema,
            &table,
            &["aa__city".to_string()],
            &["cc__int".to_string()],
            AggFunction::Mean,
        )
        .expect("groupby");

        assert_eq!(out_schema.len(), 2);
        assert_eq!(out.num_rows(), 2);
        // keys are sorted: lyon before nice
        assert_eq!(out.rows()[0][1], CellValue::Float(20.0));
        assert_eq!(out.rows()[1][1], CellValue::Float(5.0));
    }

    #[test]
    fn groupby_count_reports_group_sizes() {
        let (schema, table) = fixture();
        let (_, out) = groupby(
            &schema,
            &table,
            &["aa__city".to_string()],
            &["cc__int".to_string()],
            AggFunction::Count,
        )
        .expect("groupby");

        assert_eq!(out.rows()[0][1], CellValue::Int(2));
        assert_eq!(out.rows()[1][1], CellValue::Int(1));
    }

    #[test]
    fn pivot_builds_index_by_pivot_grid() {
        let (schema, table) = fixture();
        let (out_schema, out) = pivot(
            &schema,
            &table,
            "aa__city",
            "bb__state",
            "cc__int",
            AggFunction::Sum,
        )
        .expect("pivot");

        // index column plus one column per distinct pivot value
        assert_eq!(out_schema.len(), 3);
        assert_eq!(out.num_rows(), 2);

        // nice has no 'b' rows, so that cell is null
        let nice = &out.rows()[1];
        assert_eq!(nice[1], CellValue::Float(5.0));
        assert_eq!(nice[2], CellValue::Null);
    }

    #[test]
    fn pivot_columns_keep_the_value_label() {
        let (schema, table) = fixture();
        let (out_schema, _) = pivot(
            &schema,
            &table,
            "aa__city",
            "bb__state",
            "cc__int",
            AggFunction::Max,
        )
        .expect("pivot");

        for column in out_schema.iter().skip(1) {
            assert_eq!(column.label, "int");
        }
    }

    #[test]
    fn sample_keeps_the_requested_fraction() {
        let (schema, _) = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let table = generate_table(&schema, 100, &mut rng).expect("table");

        let sampled = sample(&table, 0.25, &mut rng);
        assert_eq!(sampled.num_rows(), 25);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let (schema, table) = fixture();
        let result = groupby(
            &schema,
            &table,
            &["missing".to_string()],
            &["cc__int".to_string()],
            AggFunction::Sum,
        );
        assert!(matches!(result, Err(GenerationError::UnknownColumn(_))));
    }
}
