//! Category → group → item (→ variant) tree emitted per language.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::CatalogData;
use crate::domain::{AssetFileRecord, AssetMapping, CatalogItem, Language};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub icon_name: Option<String>,
    pub groups: Vec<GroupNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupNode {
    pub id: i64,
    pub name: String,
    pub icon_name: Option<String>,
    pub types: Vec<ItemNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemNode {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub name_zh: String,
    pub icon_name: Option<String>,
    /// Canonical asset path, or empty when the item has no model.
    pub model_path: String,
    /// Only present for items of the multi-variant group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantNode {
    /// Four-digit code, empty for the item's default model.
    pub code: String,
    pub name: String,
    pub model_path: String,
}

/// Inputs shared by every language's tree.
pub struct TreeInputs<'a> {
    pub mapping: &'a AssetMapping,
    /// Every scanned record, before reconciliation.
    pub records: &'a [AssetFileRecord],
    pub multi_variant_group: Option<i64>,
}

/// Totals of a built tree: (categories, groups, items).
pub fn tree_counts(tree: &[CategoryNode]) -> (usize, usize, usize) {
    let groups = tree.iter().map(|c| c.groups.len()).sum();
    let items = tree
        .iter()
        .flat_map(|c| &c.groups)
        .map(|g| g.types.len())
        .sum();
    (tree.len(), groups, items)
}

/// Assemble the tree. Every catalog item appears exactly once; missing
/// category or group metadata is replaced by a placeholder node.
pub fn build_category_tree(
    data: &CatalogData,
    inputs: &TreeInputs<'_>,
    language: Language,
) -> Vec<CategoryNode> {
    let mut records_by_id: BTreeMap<i64, Vec<&AssetFileRecord>> = BTreeMap::new();
    for record in inputs.records {
        records_by_id.entry(record.item_id).or_default().push(record);
    }

    let mut categories: BTreeMap<i64, (CategoryNode, BTreeMap<i64, GroupNode>)> = BTreeMap::new();
    for item in data.items.values() {
        let (_, groups) = categories
            .entry(item.category_id)
            .or_insert_with(|| (category_node(data, item.category_id, language), BTreeMap::new()));
        let group = groups
            .entry(item.group_id)
            .or_insert_with(|| group_node(data, item.group_id, language));

        let model_path = inputs.mapping.get(&item.id).cloned().unwrap_or_default();
        let variants = (inputs.multi_variant_group == Some(item.group_id)).then(|| {
            let records = records_by_id.get(&item.id).map(Vec::as_slice).unwrap_or(&[]);
            build_variants(item, &model_path, records)
        });

        group.types.push(ItemNode {
            id: item.id,
            name: item.name.clone(),
            name_en: item.name_en.clone(),
            name_zh: item.name_zh.clone(),
            icon_name: item.icon_name.clone(),
            model_path,
            variants,
        });
    }

    let mut tree: Vec<CategoryNode> = categories
        .into_values()
        .map(|(mut category, groups)| {
            category.groups = groups
                .into_values()
                .map(|mut group| {
                    group.types.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                    group
                })
                .collect();
            category
                .groups
                .sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            category
        })
        .collect();
    tree.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    tree
}

fn category_node(data: &CatalogData, id: i64, language: Language) -> CategoryNode {
    match data.categories.get(&id) {
        Some(category) => CategoryNode {
            id,
            name: category.name.clone(),
            icon_name: category.icon_name.clone(),
            groups: Vec::new(),
        },
        None => {
            tracing::info!(category_id = id, language = %language, "No category metadata, using placeholder");
            CategoryNode {
                id,
                name: language.placeholder_category_name(id),
                icon_name: None,
                groups: Vec::new(),
            }
        }
    }
}

fn group_node(data: &CatalogData, id: i64, language: Language) -> GroupNode {
    match data.groups.get(&id) {
        Some(group) => GroupNode {
            id,
            name: group.name.clone(),
            icon_name: group.icon_name.clone(),
            types: Vec::new(),
        },
        None => {
            tracing::info!(group_id = id, language = %language, "No group metadata, using placeholder");
            GroupNode {
                id,
                name: language.placeholder_group_name(id),
                icon_name: None,
                types: Vec::new(),
            }
        }
    }
}

/// Display name of a coded variant, the same in every language.
pub fn variant_name(item_name: &str, code: &str) -> String {
    format!("{item_name} ({code})")
}

/// One variant per file record of the item. The default record (first
/// without a code, else the lowest code) carries the item's canonical path.
fn build_variants(
    item: &CatalogItem,
    default_path: &str,
    records: &[&AssetFileRecord],
) -> Vec<VariantNode> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        a.variant_code
            .cmp(&b.variant_code)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });

    let mut variants: Vec<VariantNode> = sorted
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let code = record.variant_code.clone().unwrap_or_default();
            let name = if code.is_empty() {
                item.name.clone()
            } else {
                variant_name(&item.name, &code)
            };
            let model_path = if index == 0 && !default_path.is_empty() {
                default_path.to_string()
            } else {
                record.relative_path.clone()
            };
            VariantNode {
                code,
                name,
                model_path,
            }
        })
        .collect();

    variants.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.model_path.cmp(&b.model_path)));
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogCategory, CatalogGroup};
    use std::path::PathBuf;

    fn item(id: i64, name: &str, category_id: i64, group_id: i64) -> CatalogItem {
        CatalogItem {
            id,
            name: name.to_string(),
            name_en: name.to_string(),
            name_zh: String::new(),
            category_id,
            group_id,
            icon_name: None,
        }
    }

    fn record(id: i64, filename: &str, variant: Option<&str>) -> AssetFileRecord {
        AssetFileRecord {
            item_id: id,
            source_path: PathBuf::from(format!("docs/models/{filename}")),
            relative_path: format!("./models/{filename}"),
            content_digest: "same".to_string(),
            variant_code: variant.map(str::to_string),
            filename: filename.to_string(),
        }
    }

    fn catalog(items: Vec<CatalogItem>) -> CatalogData {
        let mut data = CatalogData::default();
        data.categories.insert(
            6,
            CatalogCategory {
                id: 6,
                name: "Ship".to_string(),
                icon_name: Some("ship.png".to_string()),
            },
        );
        data.groups.insert(
            25,
            CatalogGroup {
                id: 25,
                name: "Frigate".to_string(),
                category_id: 6,
                icon_name: None,
            },
        );
        data.groups.insert(
            29,
            CatalogGroup {
                id: 29,
                name: "Capsule".to_string(),
                category_id: 6,
                icon_name: None,
            },
        );
        for item in items {
            data.items.insert(item.id, item);
        }
        data
    }

    fn inputs<'a>(mapping: &'a AssetMapping, records: &'a [AssetFileRecord]) -> TreeInputs<'a> {
        TreeInputs {
            mapping,
            records,
            multi_variant_group: Some(29),
        }
    }

    #[test]
    fn test_items_sorted_by_name() {
        let data = catalog(vec![
            item(1, "Zeta", 6, 25),
            item(2, "Alpha", 6, 25),
            item(3, "Mu", 6, 25),
        ]);
        let mapping = AssetMapping::new();
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);

        let names: Vec<&str> = tree[0].groups[0].types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mu", "Zeta"]);
        assert_eq!(tree[0].icon_name.as_deref(), Some("ship.png"));
    }

    #[test]
    fn test_groups_and_categories_sorted_by_name() {
        let data = catalog(vec![item(1, "Pod", 6, 29), item(2, "Rifter", 6, 25)]);
        let mapping = AssetMapping::new();
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);

        let groups: Vec<&str> = tree[0].groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(groups, vec!["Capsule", "Frigate"]);
    }

    #[test]
    fn test_model_path_from_mapping() {
        let data = catalog(vec![item(100, "Rifter", 6, 25), item(200, "Slasher", 6, 25)]);
        let mut mapping = AssetMapping::new();
        mapping.insert(100, "./models/100_a.glb".to_string());
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);

        let types = &tree[0].groups[0].types;
        assert_eq!(types[0].model_path, "./models/100_a.glb");
        assert_eq!(types[1].model_path, "");
        assert!(types[0].variants.is_none());
    }

    #[test]
    fn test_missing_group_gets_placeholder() {
        let data = catalog(vec![item(9000, "Prototype", 6, 9999)]);
        let mapping = AssetMapping::new();

        let zh = build_category_tree(&data, &inputs(&mapping, &[]), Language::Zh);
        assert_eq!(zh[0].groups[0].name, "组 9999");
        assert_eq!(zh[0].groups[0].types[0].id, 9000);

        let en = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);
        assert_eq!(en[0].groups[0].name, "Group 9999");
        assert_eq!(en[0].groups[0].icon_name, None);
    }

    #[test]
    fn test_missing_category_gets_placeholder() {
        let data = catalog(vec![item(34, "Tritanium", 4, 18), item(1, "Rifter", 6, 25)]);
        let mapping = AssetMapping::new();
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);

        let names: Vec<&str> = tree.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Category 4", "Ship"]);
        assert_eq!(tree[0].groups[0].name, "Group 18");
        assert_eq!(tree_counts(&tree), (2, 2, 2));
    }

    #[test]
    fn test_variants_listed_per_record() {
        let data = catalog(vec![item(500, "Pod", 6, 29)]);
        let records = vec![
            record(500, "500_Foo2318.glb", Some("2318")),
            record(500, "500_Foo2312.glb", Some("2312")),
            record(500, "500.glb", None),
        ];
        let mut mapping = AssetMapping::new();
        mapping.insert(500, "./models/500.glb".to_string());
        let tree = build_category_tree(&data, &inputs(&mapping, &records), Language::En);

        let pod = &tree[0].groups[0].types[0];
        assert_eq!(pod.model_path, "./models/500.glb");
        let variants = pod.variants.as_ref().unwrap();
        assert_eq!(
            variants,
            &vec![
                VariantNode {
                    code: String::new(),
                    name: "Pod".to_string(),
                    model_path: "./models/500.glb".to_string(),
                },
                VariantNode {
                    code: "2312".to_string(),
                    name: "Pod (2312)".to_string(),
                    model_path: "./models/500_Foo2312.glb".to_string(),
                },
                VariantNode {
                    code: "2318".to_string(),
                    name: "Pod (2318)".to_string(),
                    model_path: "./models/500_Foo2318.glb".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_variants_without_default_record() {
        let data = catalog(vec![item(500, "Pod", 6, 29)]);
        let records = vec![
            record(500, "500_Foo2318.glb", Some("2318")),
            record(500, "500_Foo2312.glb", Some("2312")),
        ];
        let mut mapping = AssetMapping::new();
        mapping.insert(500, "./models/500_Foo2312.glb".to_string());
        let tree = build_category_tree(&data, &inputs(&mapping, &records), Language::En);

        let variants = tree[0].groups[0].types[0].variants.clone().unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].code, "2312");
        assert_eq!(variants[0].model_path, "./models/500_Foo2312.glb");
    }

    #[test]
    fn test_variant_names_same_in_every_language() {
        let data = catalog(vec![item(500, "Pod", 6, 29)]);
        let records = vec![record(500, "500_Foo2312.glb", Some("2312"))];
        let mapping = AssetMapping::new();

        for language in Language::ALL {
            let tree = build_category_tree(&data, &inputs(&mapping, &records), language);
            let variants = tree[0].groups[0].types[0].variants.clone().unwrap();
            assert_eq!(variants[0].name, "Pod (2312)");
        }
        assert_eq!(variant_name("裂谷级", "2318"), "裂谷级 (2318)");
    }

    #[test]
    fn test_multi_variant_item_without_models() {
        let data = catalog(vec![item(501, "Empty Pod", 6, 29)]);
        let mapping = AssetMapping::new();
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);
        assert_eq!(tree[0].groups[0].types[0].variants, Some(Vec::new()));
    }

    #[test]
    fn test_no_multi_variant_group_configured() {
        let data = catalog(vec![item(500, "Pod", 6, 29)]);
        let records = vec![record(500, "500_Foo2312.glb", Some("2312"))];
        let mapping = AssetMapping::new();
        let inputs = TreeInputs {
            mapping: &mapping,
            records: &records,
            multi_variant_group: None,
        };
        let tree = build_category_tree(&data, &inputs, Language::En);
        assert!(tree[0].groups[0].types[0].variants.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let data = catalog(vec![item(1, "Rifter", 6, 25)]);
        let mapping = AssetMapping::new();
        let tree = build_category_tree(&data, &inputs(&mapping, &[]), Language::En);
        let json = serde_json::to_value(&tree).unwrap();

        let rifter = &json[0]["groups"][0]["types"][0];
        assert_eq!(rifter["model_path"], "");
        assert!(rifter.get("variants").is_none());
        assert!(json[0]["groups"][0]["icon_name"].is_null());
    }
}
