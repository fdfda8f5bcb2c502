//! Category forest flattening: every known category id maps to a grouping root, and
//! top-level roots map to their display names.

use crate::api::{ApiSession, CategoriesResponse, GlobalCategory, CATEGORIES_PATH};
use crate::error::FetchError;
use ahash::AHashMap;

/// Label for venues whose category cannot be resolved to a named root.
pub const UNKNOWN_FOLDER: &str = "Unknown";

/// `RootMap` (id -> root id) and `NameMap` (top-level id -> name).
#[derive(Clone, Debug, Default)]
pub struct CategoryMaps {
    pub roots: AHashMap<String, String>,
    pub names: AHashMap<String, String>,
}

impl CategoryMaps {
    pub fn root_of(&self, category_id: &str) -> Option<&str> {
        self.roots.get(category_id).map(String::as_str)
    }

    /// `NameMap[RootMap[id]]`, or `None` when either lookup misses.
    pub fn folder_label(&self, category_id: &str) -> Option<&str> {
        let root = self.root_of(category_id)?;
        self.names.get(root).map(String::as_str)
    }

    /// Folder label with the `Unknown` fallback applied.
    pub fn folder_label_or_unknown(&self, category_id: &str) -> &str {
        self.folder_label(category_id).unwrap_or(UNKNOWN_FOLDER)
    }
}

/// Fetch the category forest once and flatten it.
pub fn resolve_categories(session: &ApiSession<'_>) -> Result<CategoryMaps, FetchError> {
    let resp: CategoriesResponse = session.get(CATEGORIES_PATH, &session.common_query())?;
    let maps = flatten_categories(&resp.categories);
    tracing::info!(
        top_level = maps.names.len(),
        categories = maps.roots.len(),
        "resolved category forest"
    );
    Ok(maps)
}

/// Top-level nodes map to themselves and carry their name. Below that, each child maps
/// to the id of its *immediate* parent, so beyond depth two a category's root is not
/// a top-level id and its label lookup misses.
pub fn flatten_categories(forest: &[GlobalCategory]) -> CategoryMaps {
    let mut maps = CategoryMaps::default();
    for top in forest {
        maps.names.insert(top.id.clone(), top.name.clone());
        maps.roots.insert(top.id.clone(), top.id.clone());
        walk(top, &mut maps.roots);
    }
    maps
}

fn walk(parent: &GlobalCategory, roots: &mut AHashMap<String, String>) {
    for child in &parent.children {
        roots.insert(child.id.clone(), parent.id.clone());
        walk(child, roots);
    }
}
