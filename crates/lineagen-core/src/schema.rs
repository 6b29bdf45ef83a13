use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ColumnTypeCatalog};

/// One column of a generated table: a unique name plus the generator
/// label describing what kind of synthetic value it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub label: String,
}

/// Column-name → generator-label schema for one table snapshot.
///
/// Column names are unique by construction (each carries a random prefix
/// assigned at creation). Insertion order is preserved but carries no
/// semantic meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.columns.push(ColumnDef {
            name: name.into(),
            label: label.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    pub fn label_of(&self, name: &str) -> Option<&str> {
        self.index_of(name)
            .map(|index| self.columns[index].label.as_str())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

impl FromIterator<(String, String)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, label) in iter {
            schema.push(name, label);
        }
        schema
    }
}

/// Category → columns of one schema whose label belongs to that category.
///
/// Derived, never stored; recomputed per table snapshot. A column appears
/// under every category its label maps to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTypeMapping {
    by_category: BTreeMap<Category, Vec<String>>,
}

impl SchemaTypeMapping {
    /// Pure derivation from one schema and the catalog's inverse mapping.
    /// An empty schema yields an empty mapping.
    pub fn derive(schema: &Schema, catalog: &ColumnTypeCatalog) -> Self {
        let mut by_category: BTreeMap<Category, Vec<String>> = BTreeMap::new();
        for column in schema.iter() {
            for category in catalog.categories(&column.label) {
                by_category
                    .entry(*category)
                    .or_default()
                    .push(column.name.clone());
            }
        }
        Self { by_category }
    }

    /// Columns satisfying `category`, in schema iteration order.
    pub fn columns(&self, category: Category) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, category: Category) -> bool {
        !self.columns(category).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(Vec::is_empty)
    }
}
