use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Semantic grouping of generator labels, used to decide which
/// transformations are legal for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Numeric,
    Groupable,
    Joinable,
    Text,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Numeric,
        Category::Groupable,
        Category::Joinable,
        Category::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Numeric => "numeric",
            Category::Groupable => "groupable",
            Category::Joinable => "joinable",
            Category::Text => "text",
        }
    }

    fn asset_name(&self) -> &'static str {
        match self {
            Category::Numeric => "numeric_cols.txt",
            Category::Groupable => "groupable_cols.txt",
            Category::Joinable => "joinable_cols.txt",
            Category::Text => "text_cols.txt",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping between categories and the generator labels that
/// belong to them, plus the inverse label → categories view.
///
/// Loaded once at process start; never mutated afterwards. A label may
/// belong to more than one category.
#[derive(Debug, Clone)]
pub struct ColumnTypeCatalog {
    by_category: BTreeMap<Category, Vec<String>>,
    by_label: BTreeMap<String, Vec<Category>>,
}

impl ColumnTypeCatalog {
    /// Catalog embedded in the crate, one asset file per category.
    pub fn builtin() -> Self {
        let sources = [
            (
                Category::Numeric,
                include_str!("../assets/numeric_cols.txt"),
            ),
            (
                Category::Groupable,
                include_str!("../assets/groupable_cols.txt"),
            ),
            (
                Category::Joinable,
                include_str!("../assets/joinable_cols.txt"),
            ),
            (Category::Text, include_str!("../assets/text_cols.txt")),
        ];

        let mut catalog = Self::empty();
        for (category, contents) in sources {
            for label in parse_lines(contents) {
                catalog.insert(category, label);
            }
        }
        catalog
    }

    /// Load a catalog from a directory holding the four per-category
    /// label files (`numeric_cols.txt`, `groupable_cols.txt`,
    /// `joinable_cols.txt`, `text_cols.txt`).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Self::empty();
        for category in Category::ALL {
            let path = dir.join(category.asset_name());
            let contents = fs::read_to_string(&path)?;
            let labels = parse_lines(&contents);
            if labels.is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "category '{}' has no labels in {}",
                    category,
                    path.display()
                )));
            }
            for label in labels {
                catalog.insert(category, label);
            }
        }
        Ok(catalog)
    }

    fn empty() -> Self {
        let mut by_category = BTreeMap::new();
        for category in Category::ALL {
            by_category.insert(category, Vec::new());
        }
        Self {
            by_category,
            by_label: BTreeMap::new(),
        }
    }

    fn insert(&mut self, category: Category, label: String) {
        let labels = self.by_category.entry(category).or_default();
        if labels.contains(&label) {
            return;
        }
        labels.push(label.clone());
        self.by_label.entry(label).or_default().push(category);
    }

    /// Labels belonging to `category`, in asset order.
    pub fn labels(&self, category: Category) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories a label belongs to; empty for unknown labels.
    pub fn categories(&self, label: &str) -> &[Category] {
        self.by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// Every distinct label in the catalog, sorted.
    pub fn all_labels(&self) -> Vec<&str> {
        self.by_label.keys().map(String::as_str).collect()
    }
}

fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_labels_for_every_category() {
        let catalog = ColumnTypeCatalog::builtin();
        for category in Category::ALL {
            assert!(
                !catalog.labels(category).is_empty(),
                "category '{category}' has no labels"
            );
        }
    }

    #[test]
    fn every_label_belongs_to_at_least_one_category() {
        let catalog = ColumnTypeCatalog::builtin();
        for label in catalog.all_labels() {
            assert!(!catalog.categories(label).is_empty());
        }
    }

    #[test]
    fn inverse_mapping_is_consistent() {
        let catalog = ColumnTypeCatalog::builtin();
        for category in Category::ALL {
            for label in catalog.labels(category) {
                assert!(
                    catalog.categories(label).contains(&category),
                    "label '{label}' missing inverse entry for '{category}'"
                );
            }
        }
    }

    #[test]
    fn labels_can_span_multiple_categories() {
        let catalog = ColumnTypeCatalog::builtin();
        let categories = catalog.categories("zip_code");
        assert!(categories.contains(&Category::Joinable));
        assert!(categories.contains(&Category::Text));
    }

    #[test]
    fn unknown_label_has_no_categories() {
        let catalog = ColumnTypeCatalog::builtin();
        assert!(catalog.categories("no_such_label").is_empty());
        assert!(!catalog.contains_label("no_such_label"));
    }
}
