use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconReport {
    pub copied: usize,
    pub missing: Vec<String>,
}

/// Icon name as a relative path, or `None` if it is absolute or climbs
/// out of the icon root.
fn enclosed_icon_path(icon_name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(icon_name.replace('\\', "/"));
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then_some(path)
}

/// Resolve an icon name against the extracted icon set.
/// Returns `(source, destination-relative path)`; the path-preserving
/// location is tried first, then the bare filename. Unsafe names never
/// resolve.
pub fn resolve_icon(source_root: &Path, icon_name: &str) -> Option<(PathBuf, PathBuf)> {
    let relative = enclosed_icon_path(icon_name)?;
    let preserved = source_root.join(&relative);
    if preserved.is_file() {
        return Some((preserved, relative));
    }

    let basename = relative.file_name()?;
    let flat = source_root.join(basename);
    if flat.is_file() {
        return Some((flat, PathBuf::from(basename)));
    }
    None
}

/// Copy a file, creating parent directories as needed.
fn copy_icon(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    Ok(())
}

/// Copy every referenced icon from `source_root` into `dest_root`.
/// Missing icons are reported, not fatal.
pub fn extract_icons<'a>(
    icon_names: impl IntoIterator<Item = &'a String>,
    source_root: &Path,
    dest_root: &Path,
) -> Result<IconReport> {
    let mut report = IconReport::default();
    for name in icon_names {
        if name.is_empty() {
            continue;
        }
        if enclosed_icon_path(name).is_none() {
            tracing::warn!(icon = %name, "Icon name escapes the icon directory, skipping");
            report.missing.push(name.clone());
            continue;
        }
        match resolve_icon(source_root, name) {
            Some((source, relative)) => {
                copy_icon(&source, &dest_root.join(relative))?;
                report.copied += 1;
            }
            None => {
                tracing::warn!(icon = %name, "Icon not found in extracted icon set");
                report.missing.push(name.clone());
            }
        }
    }

    tracing::info!(copied = report.copied, missing = report.missing.len(), "Extracted icons");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_preserving_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(src.join("ui/ships")).unwrap();
        fs::write(src.join("ui/ships/rifter.png"), b"png").unwrap();

        let names = vec!["ui\\ships\\rifter.png".to_string()];
        let report = extract_icons(&names, &src, &dst).unwrap();
        assert_eq!(report.copied, 1);
        assert_eq!(fs::read(dst.join("ui/ships/rifter.png")).unwrap(), b"png");
    }

    #[test]
    fn test_basename_fallback_flattens() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("rifter.png"), b"png").unwrap();

        let names = vec!["res/ui/rifter.png".to_string()];
        let report = extract_icons(&names, &src, &dst).unwrap();
        assert_eq!(report.copied, 1);
        assert!(dst.join("rifter.png").is_file());
        assert!(!dst.join("res/ui/rifter.png").exists());
    }

    #[test]
    fn test_missing_icon_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let names = vec!["gone.png".to_string(), String::new()];
        let report = extract_icons(&names, tmp.path(), &tmp.path().join("dst")).unwrap();
        assert_eq!(report.copied, 0);
        assert_eq!(report.missing, vec!["gone.png".to_string()]);
    }

    #[test]
    fn test_unsafe_icon_names_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("ok.png"), b"png").unwrap();
        let outside = tmp.path().join("outside.png");
        fs::write(&outside, b"keep").unwrap();

        let names = vec![
            "../outside.png".to_string(),
            outside.to_string_lossy().to_string(),
            "ui\\..\\..\\outside.png".to_string(),
            "ok.png".to_string(),
        ];
        let report = extract_icons(&names, &src, &dst).unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(report.missing.len(), 3);
        assert_eq!(fs::read(&outside).unwrap(), b"keep");
        assert!(resolve_icon(&src, "../outside.png").is_none());
        assert!(dst.join("ok.png").is_file());
    }
}
