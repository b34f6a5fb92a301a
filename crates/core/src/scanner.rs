use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::AssetFileRecord;
use crate::error::Result;
use crate::filename::parse_model_stem;
use crate::hasher;

/// Extensions recognized as 3D models (compared case-insensitively).
pub const MODEL_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

/// A directory of model files and the prefix the front-end uses to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub dir: PathBuf,
    /// e.g. `./models`; joined with the filename to form `relative_path`.
    pub url_prefix: String,
}

impl ModelSource {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    fn relative_path(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), filename)
    }
}

fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            MODEL_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List model files directly inside `dir`, sorted by filename.
/// A missing directory yields an empty list.
pub fn discover_models(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::info!(dir = %dir.display(), "Model directory not present, nothing to scan");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_model_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Parse and hash one file. Unparseable names and unreadable files are
/// logged and yield `None`.
pub fn record_for(source: &ModelSource, path: &Path) -> Option<AssetFileRecord> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let stem = path.file_stem()?.to_string_lossy();

    let Some(parsed) = parse_model_stem(&stem) else {
        tracing::warn!(file = %filename, "Cannot parse item id from model filename, skipping");
        return None;
    };

    let content_digest = hasher::digest_model(path)?;

    Some(AssetFileRecord {
        item_id: parsed.item_id,
        source_path: path.to_path_buf(),
        relative_path: source.relative_path(&filename),
        content_digest,
        variant_code: parsed.variant_code,
        filename,
    })
}

/// Parse and hash already discovered files of one source.
/// `on_file` is invoked once per file, whether or not it was kept.
pub fn scan_files(
    source: &ModelSource,
    files: &[PathBuf],
    mut on_file: impl FnMut(&Path),
) -> Vec<AssetFileRecord> {
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        if let Some(record) = record_for(source, path) {
            records.push(record);
        }
        on_file(path);
    }

    tracing::info!(
        dir = %source.dir.display(),
        candidates = files.len(),
        records = records.len(),
        "Scanned model directory"
    );
    records
}
