use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lineagen_core::{Category, ColumnTypeCatalog, OpKind, OperationChoice, Schema, SchemaTypeMapping};
use lineagen_generate::choices::{rand_fraction, select_rand_columns, SAMPLE_MIN_ROWS};
use lineagen_generate::{ops_choices, SampleRange};

fn mapping_for(columns: &[(&str, &str)]) -> SchemaTypeMapping {
    let catalog = ColumnTypeCatalog::builtin();
    let schema: Schema = columns
        .iter()
        .map(|(name, label)| (name.to_string(), label.to_string()))
        .collect();
    SchemaTypeMapping::derive(&schema, &catalog)
}

fn kinds(choices: &[OperationChoice]) -> Vec<OpKind> {
    let mut kinds: Vec<OpKind> = choices.iter().map(|choice| choice.kind()).collect();
    kinds.sort_by_key(|kind| kind.to_string());
    kinds
}

#[test]
fn numeric_and_groupable_with_enough_rows_yields_groupby_and_sample() {
    let mapping = mapping_for(&[("a_int", "int"), ("b_city", "city")]);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let choices = ops_choices(&mapping, 50, SampleRange::default(), &mut rng);
    assert_eq!(kinds(&choices), vec![OpKind::Groupby, OpKind::Sample]);

    let groupby = choices
        .iter()
        .find(|choice| choice.kind() == OpKind::Groupby)
        .expect("groupby choice");
    match groupby {
        OperationChoice::Groupby {
            group_columns,
            agg_columns,
            ..
        } => {
            assert_eq!(group_columns, &vec!["b_city".to_string()]);
            assert_eq!(agg_columns, &vec!["a_int".to_string()]);
        }
        other => panic!("unexpected choice {other:?}"),
    }
}

#[test]
fn two_groupables_enable_pivot_with_distinct_index_and_pivot() {
    let mapping = mapping_for(&[("a_int", "int"), ("b_city", "city"), ("c_state", "state")]);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let choices = ops_choices(&mapping, 5, SampleRange::default(), &mut rng);
    assert_eq!(kinds(&choices), vec![OpKind::Groupby, OpKind::Pivot]);

    let pivot = choices
        .iter()
        .find(|choice| choice.kind() == OpKind::Pivot)
        .expect("pivot choice");
    match pivot {
        OperationChoice::Pivot {
            index_column,
            pivot_column,
            value_column,
            ..
        } => {
            let groupables = ["b_city", "c_state"];
            assert!(groupables.contains(&index_column.as_str()));
            assert!(groupables.contains(&pivot_column.as_str()));
            assert_ne!(index_column, pivot_column);
            assert_eq!(value_column, "a_int");
        }
        other => panic!("unexpected choice {other:?}"),
    }
}

#[test]
fn empty_schema_yields_no_choices() {
    let mapping = mapping_for(&[]);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let choices = ops_choices(&mapping, 1000, SampleRange::default(), &mut rng);
    assert!(choices.is_empty());
}

#[test]
fn text_only_schema_below_row_floor_yields_no_choices() {
    let mapping = mapping_for(&[("a_name", "name"), ("b_email", "email")]);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let choices = ops_choices(&mapping, SAMPLE_MIN_ROWS - 1, SampleRange::default(), &mut rng);
    assert!(choices.is_empty());
}

#[test]
fn groupable_without_numeric_yields_only_sample() {
    let mapping = mapping_for(&[("a_city", "city"), ("b_state", "state")]);
    let mut rng = ChaCha8Rng::seed_from_u64(19);

    let choices = ops_choices(&mapping, 100, SampleRange::default(), &mut rng);
    assert_eq!(kinds(&choices), vec![OpKind::Sample]);
}

#[test]
fn single_groupable_disables_pivot() {
    let mapping = mapping_for(&[("a_int", "int"), ("b_city", "city")]);
    let mut rng = ChaCha8Rng::seed_from_u64(23);

    for _ in 0..50 {
        let choices = ops_choices(&mapping, 100, SampleRange::default(), &mut rng);
        assert!(choices.iter().all(|choice| choice.kind() != OpKind::Pivot));
    }
}

#[test]
fn groupby_binds_at_most_two_group_columns() {
    let mapping = mapping_for(&[
        ("a_int", "int"),
        ("b_city", "city"),
        ("c_state", "state"),
        ("d_country", "country"),
        ("e_industry", "industry"),
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(29);

    for _ in 0..200 {
        let choices = ops_choices(&mapping, 100, SampleRange::default(), &mut rng);
        for choice in &choices {
            if let OperationChoice::Groupby { group_columns, .. } = choice {
                assert!(
                    (1..=2).contains(&group_columns.len()),
                    "groupby bound {} group columns",
                    group_columns.len()
                );
            }
        }
    }
}

#[test]
fn sample_fractions_stay_in_range_and_round_to_two_decimals() {
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    let range = SampleRange::default();

    for _ in 0..500 {
        let fraction = rand_fraction(range, &mut rng);
        assert!((range.min..=range.max).contains(&fraction), "fraction {fraction}");
        let scaled = fraction * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "fraction {fraction}");
    }
}

#[test]
fn select_rand_columns_refuses_partial_results() {
    let mapping = mapping_for(&[("a_city", "city"), ("b_state", "state")]);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    assert!(select_rand_columns(&mapping, 3, Category::Groupable, &mut rng).is_none());

    let picked = select_rand_columns(&mapping, 2, Category::Groupable, &mut rng)
        .expect("two groupable columns available");
    assert_eq!(picked.len(), 2);
    assert_ne!(picked[0], picked[1]);
}
