use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A single model file found on disk, with its parsed identifier and digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFileRecord {
    pub item_id: i64,
    pub source_path: PathBuf,
    /// Path as referenced by the front-end, e.g. `./models/100_a.glb`.
    pub relative_path: String,
    pub content_digest: String,
    pub variant_code: Option<String>,
    pub filename: String,
}

impl AssetFileRecord {
    pub fn is_variant(&self) -> bool {
        self.variant_code.is_some()
    }
}

/// Item identifier → canonical relative asset path.
pub type AssetMapping = BTreeMap<i64, String>;

/// A row of the `types` table, localized for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: i64,
    /// Display name for the language the catalog was loaded in.
    pub name: String,
    pub name_en: String,
    pub name_zh: String,
    pub category_id: i64,
    pub group_id: i64,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCategory {
    pub id: i64,
    pub name: String,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub icon_name: Option<String>,
}

/// Catalog languages shipped with the vendor export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Zh,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// Suffix of the vendor database file (`item_db_<suffix>.sqlite`).
    pub fn db_suffix(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Suffix of the emitted index file. The front-end calls Chinese `cn`.
    pub fn index_suffix(self) -> &'static str {
        match self {
            Language::Zh => "cn",
            Language::En => "en",
        }
    }

    pub fn placeholder_category_name(self, id: i64) -> String {
        match self {
            Language::Zh => format!("分类 {id}"),
            Language::En => format!("Category {id}"),
        }
    }

    pub fn placeholder_group_name(self, id: i64) -> String {
        match self {
            Language::Zh => format!("组 {id}"),
            Language::En => format!("Group {id}"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_suffix())
    }
}

/// Counts reported after a successful build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub primary_records: usize,
    pub supplementary_records: usize,
    pub mapped_ids: usize,
    pub languages: Vec<LanguageSummary>,
    pub icons_copied: usize,
    pub icons_missing: usize,
    pub extra_found: Vec<i64>,
    pub extra_missing: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSummary {
    pub language: Language,
    pub categories: usize,
    pub groups: usize,
    pub items: usize,
}
