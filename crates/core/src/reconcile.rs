//! Collapse byte-identical plain models onto one canonical path.
//!
//! Plain records sharing a content digest all map to the path of the record
//! with the smallest item id. Variant records always keep their own path and
//! never take part in digest grouping. No source file is touched.

use std::collections::{HashMap, HashSet};

use crate::domain::{AssetFileRecord, AssetMapping};

/// Group records by identical SHA-256 digest.
fn group_by_digest<'a>(
    records: &[&'a AssetFileRecord],
) -> HashMap<&'a str, Vec<&'a AssetFileRecord>> {
    let mut map: HashMap<&str, Vec<&AssetFileRecord>> = HashMap::new();
    for &record in records {
        map.entry(record.content_digest.as_str())
            .or_default()
            .push(record);
    }
    map
}

/// Smallest item id wins; ties broken by relative path.
fn elect_canonical<'a>(members: &[&'a AssetFileRecord]) -> Option<&'a AssetFileRecord> {
    members.iter().copied().min_by(|a, b| {
        a.item_id
            .cmp(&b.item_id)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    })
}

/// Build the item id → canonical path mapping over both directories' records.
///
/// When one id has several records, a plain record's canonical path takes
/// precedence over variant paths, and among variants the lowest code wins.
pub fn reconcile(records: &[AssetFileRecord]) -> AssetMapping {
    let (mut variants, mut plain): (Vec<&AssetFileRecord>, Vec<&AssetFileRecord>) =
        records.iter().partition(|r| r.is_variant());

    variants.sort_by(|a, b| {
        a.item_id
            .cmp(&b.item_id)
            .then_with(|| a.variant_code.cmp(&b.variant_code))
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
    plain.sort_by(|a, b| {
        a.item_id
            .cmp(&b.item_id)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });

    let mut mapping = AssetMapping::new();
    for record in &variants {
        mapping
            .entry(record.item_id)
            .or_insert_with(|| record.relative_path.clone());
    }

    let canonical: HashMap<&str, &AssetFileRecord> = group_by_digest(&plain)
        .into_iter()
        .filter_map(|(digest, members)| Some((digest, elect_canonical(&members)?)))
        .collect();

    let mut duplicates = 0usize;
    let mut assigned = HashSet::new();
    for record in &plain {
        let Some(representative) = canonical.get(record.content_digest.as_str()) else {
            continue;
        };
        if representative.relative_path != record.relative_path {
            duplicates += 1;
        }
        // First plain record per id (lowest relative path) decides.
        if assigned.insert(record.item_id) {
            mapping.insert(record.item_id, representative.relative_path.clone());
        }
    }

    tracing::info!(
        variants = variants.len(),
        plain = plain.len(),
        deduplicated = duplicates,
        mapped_ids = mapping.len(),
        "Reconciled model assets"
    );
    mapping
}
