use std::collections::BTreeMap;

use crate::domain::AssetFileRecord;
use crate::error::{Error, FilenameCollision, Result};

/// Find filenames present in both record lists, sorted by filename.
pub fn find_collisions(
    primary: &[AssetFileRecord],
    supplementary: &[AssetFileRecord],
) -> Vec<FilenameCollision> {
    let primary_by_name: BTreeMap<&str, &AssetFileRecord> = primary
        .iter()
        .map(|r| (r.filename.as_str(), r))
        .collect();

    let mut collisions: Vec<FilenameCollision> = supplementary
        .iter()
        .filter_map(|supp| {
            primary_by_name
                .get(supp.filename.as_str())
                .map(|prim| FilenameCollision {
                    filename: supp.filename.clone(),
                    primary: prim.source_path.clone(),
                    supplementary: supp.source_path.clone(),
                })
        })
        .collect();
    collisions.sort_by(|a, b| a.filename.cmp(&b.filename));
    collisions
}

/// Fail when any filename exists in both directories.
pub fn ensure_disjoint(
    primary: &[AssetFileRecord],
    supplementary: &[AssetFileRecord],
) -> Result<()> {
    let collisions = find_collisions(primary, supplementary);
    if collisions.is_empty() {
        Ok(())
    } else {
        Err(Error::FilenameCollision(collisions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(dir: &str, filename: &str) -> AssetFileRecord {
        AssetFileRecord {
            item_id: 700,
            source_path: PathBuf::from(format!("{dir}/{filename}")),
            relative_path: format!("./{dir}/{filename}"),
            content_digest: "d".to_string(),
            variant_code: None,
            filename: filename.to_string(),
        }
    }

    #[test]
    fn test_disjoint_sets_pass() {
        let a = vec![record("models", "700_x.glb")];
        let b = vec![record("extra", "700_y.glb")];
        assert!(ensure_disjoint(&a, &b).is_ok());
        assert!(ensure_disjoint(&a, &[]).is_ok());
    }

    #[test]
    fn test_collision_lists_both_paths() {
        let a = vec![record("models", "700_x.glb"), record("models", "800.glb")];
        let b = vec![record("extra", "800.glb"), record("extra", "700_x.glb")];

        let err = ensure_disjoint(&a, &b).unwrap_err();
        let Error::FilenameCollision(collisions) = &err else {
            panic!("expected collision error, got {err:?}");
        };
        assert_eq!(collisions.len(), 2);
        assert_eq!(collisions[0].filename, "700_x.glb");
        assert_eq!(collisions[0].primary, PathBuf::from("models/700_x.glb"));
        assert_eq!(collisions[0].supplementary, PathBuf::from("extra/700_x.glb"));

        let message = err.to_string();
        assert!(message.contains("700_x.glb"));
        assert!(message.contains("extra/800.glb"));
    }

    #[test]
    fn test_same_id_different_filename_is_not_a_collision() {
        let a = vec![record("models", "700_x.glb")];
        let b = vec![record("extra", "700_x2312.glb")];
        assert!(find_collisions(&a, &b).is_empty());
    }
}
