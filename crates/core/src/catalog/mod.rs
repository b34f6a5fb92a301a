pub mod schema;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rusqlite::{params_from_iter, Connection, OpenFlags, Row};

use crate::domain::*;
use crate::error::{Error, Result};

/// Category ids exported to the viewer: ships and structures.
pub const SHIPS_CATEGORY_ID: i64 = 6;
pub const STRUCTURES_CATEGORY_ID: i64 = 65;

/// Stands in for a NULL `categoryID` or `groupID`. No vendor category or
/// group uses it, so the tree builder gives it a placeholder node.
pub const UNASSIGNED_ID: i64 = 0;

const BASE_SELECT: &str = "
    SELECT
        t.type_id,
        t.en_name,
        t.zh_name,
        t.categoryID,
        t.groupID,
        t.icon_filename,
        c.category_id AS joined_category_id,
        c.name AS category_name,
        c.icon_filename AS category_icon_name,
        g.group_id AS joined_group_id,
        g.name AS group_name,
        g.icon_filename AS group_icon_name
    FROM types t
    LEFT JOIN categories c ON t.categoryID = c.category_id
    LEFT JOIN groups g ON t.groupID = g.group_id";

/// Categories, groups and items for one language, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogData {
    pub categories: BTreeMap<i64, CatalogCategory>,
    pub groups: BTreeMap<i64, CatalogGroup>,
    pub items: BTreeMap<i64, CatalogItem>,
    /// Icon filenames referenced by items, categories and groups.
    pub icon_names: BTreeSet<String>,
}

/// Which extra ids the catalog query returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraLookup {
    pub found: Vec<i64>,
    pub missing: Vec<i64>,
}

/// Read-only handle on one localized vendor database.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open an existing catalog database read-only.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatabaseNotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection (for testing).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Load ships and structures, plus any `extra_ids` regardless of
    /// category or published flag.
    pub fn load(&self, language: Language, extra_ids: &[i64]) -> Result<(CatalogData, ExtraLookup)> {
        let mut sql = format!(
            "{BASE_SELECT} WHERE (t.categoryID IN ({SHIPS_CATEGORY_ID}, {STRUCTURES_CATEGORY_ID}) AND t.published = 1)"
        );
        if !extra_ids.is_empty() {
            let placeholders = (1..=extra_ids.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(",");
            sql.push_str(&format!(" OR t.type_id IN ({placeholders})"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(extra_ids.iter()))?;

        let mut data = CatalogData::default();
        while let Some(row) = rows.next()? {
            add_row(&mut data, row, language)?;
        }

        let (found, missing): (Vec<i64>, Vec<i64>) = extra_ids
            .iter()
            .partition(|id| data.items.contains_key(*id));
        let lookup = ExtraLookup { found, missing };

        tracing::info!(
            language = %language,
            items = data.items.len(),
            categories = data.categories.len(),
            groups = data.groups.len(),
            "Loaded catalog"
        );
        if !extra_ids.is_empty() {
            tracing::info!(language = %language, found = lookup.found.len(), "Extra ids found in catalog");
        }
        if !lookup.missing.is_empty() {
            tracing::warn!(language = %language, missing = ?lookup.missing, "Extra ids not found in catalog");
        }

        Ok((data, lookup))
    }
}

/// Localized name, falling back to the English field when null or empty.
fn pick_name(localized: Option<&str>, english: Option<&str>) -> String {
    localized
        .filter(|s| !s.is_empty())
        .or(english)
        .unwrap_or_default()
        .to_string()
}

fn add_row(data: &mut CatalogData, row: &Row<'_>, language: Language) -> Result<()> {
    let type_id: i64 = row.get("type_id")?;
    let en_name: Option<String> = row.get("en_name")?;
    let zh_name: Option<String> = row.get("zh_name")?;
    let category_id: Option<i64> = row.get("categoryID")?;
    let group_id: Option<i64> = row.get("groupID")?;
    let icon_name: Option<String> = row.get("icon_filename")?;
    if category_id.is_none() || group_id.is_none() {
        tracing::warn!(type_id, ?category_id, ?group_id, "Item has no category or group id");
    }
    let category_id = category_id.unwrap_or(UNASSIGNED_ID);
    let group_id = group_id.unwrap_or(UNASSIGNED_ID);

    let localized = match language {
        Language::Zh => zh_name.as_deref(),
        Language::En => en_name.as_deref(),
    };

    if let Some(icon) = icon_name.as_deref().filter(|s| !s.is_empty()) {
        data.icon_names.insert(icon.to_string());
    }
    data.items.entry(type_id).or_insert_with(|| CatalogItem {
        id: type_id,
        name: pick_name(localized, en_name.as_deref()),
        name_en: en_name.clone().unwrap_or_default(),
        name_zh: zh_name.clone().unwrap_or_default(),
        category_id,
        group_id,
        icon_name,
    });

    // A NULL joined id means the row has no metadata; the tree builder
    // synthesizes a placeholder for it.
    if row.get::<_, Option<i64>>("joined_category_id")?.is_some()
        && !data.categories.contains_key(&category_id)
    {
        let icon_name: Option<String> = row.get("category_icon_name")?;
        if let Some(icon) = icon_name.as_deref().filter(|s| !s.is_empty()) {
            data.icon_names.insert(icon.to_string());
        }
        data.categories.insert(
            category_id,
            CatalogCategory {
                id: category_id,
                name: row.get::<_, Option<String>>("category_name")?.unwrap_or_default(),
                icon_name,
            },
        );
    }

    if row.get::<_, Option<i64>>("joined_group_id")?.is_some()
        && !data.groups.contains_key(&group_id)
    {
        let icon_name: Option<String> = row.get("group_icon_name")?;
        if let Some(icon) = icon_name.as_deref().filter(|s| !s.is_empty()) {
            data.icon_names.insert(icon.to_string());
        }
        data.groups.insert(
            group_id,
            CatalogGroup {
                id: group_id,
                name: row.get::<_, Option<String>>("group_name")?.unwrap_or_default(),
                category_id,
                icon_name,
            },
        );
    }

    Ok(())
}
