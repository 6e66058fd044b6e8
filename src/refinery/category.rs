// * Category Inferencer
// * Matches free-text hints against the known category list, cheapest and most
// * precise match first so incidental words in descriptions don't win.

use serde::{Deserialize, Serialize};

/// A known deal category as stored by the back-office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedCategory {
    id: String,
    name_lower: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryInferencer {
    categories: Vec<IndexedCategory>,
}

impl CategoryInferencer {
    pub fn new(categories: &[Category]) -> Self {
        let categories = categories
            .iter()
            .filter_map(|c| {
                let name_lower = c.name.trim().to_lowercase();
                (!name_lower.is_empty()).then(|| IndexedCategory {
                    id: c.id.clone(),
                    name_lower,
                })
            })
            .collect();

        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns the id of the first matching category, or an empty string.
    ///
    /// Match order:
    /// 1. `hint` equals a category name (case-insensitive)
    /// 2. `hint` contains, or is contained in, a category name
    /// 3. a category name appears in `title` or `description`
    pub fn infer(&self, hint: &str, title: &str, description: &str) -> String {
        let hint = hint.trim().to_lowercase();

        if !hint.is_empty() {
            if let Some(hit) = self.categories.iter().find(|c| c.name_lower == hint) {
                return hit.id.clone();
            }

            if let Some(hit) = self
                .categories
                .iter()
                .find(|c| hint.contains(&c.name_lower) || c.name_lower.contains(&hint))
            {
                return hit.id.clone();
            }
        }

        let title = title.to_lowercase();
        let description = description.to_lowercase();

        self.categories
            .iter()
            .find(|c| title.contains(&c.name_lower) || description.contains(&c.name_lower))
            .map(|c| c.id.clone())
            .unwrap_or_default()
    }
}
