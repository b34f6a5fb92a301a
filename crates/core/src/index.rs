use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{AssetMapping, Language};
use crate::error::Result;
use crate::tree::CategoryNode;

pub const AVAILABLE_MODELS_FILE: &str = "available_models.json";

pub fn index_file_name(language: Language) -> String {
    format!("resources_index_{}.json", language.index_suffix())
}

#[derive(Debug, Serialize)]
struct AvailableModels<'a> {
    available: &'a [i64],
}

/// Pretty-printed UTF-8 JSON with a trailing newline.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn write_index(output_dir: &Path, language: Language, tree: &[CategoryNode]) -> Result<PathBuf> {
    let path = output_dir.join(index_file_name(language));
    write_json(&path, tree)?;
    tracing::info!(language = %language, path = %path.display(), "Wrote resource index");
    Ok(path)
}

pub fn write_available_models(output_dir: &Path, mapping: &AssetMapping) -> Result<PathBuf> {
    let available: Vec<i64> = mapping.keys().copied().collect();
    let path = output_dir.join(AVAILABLE_MODELS_FILE);
    write_json(&path, &AvailableModels { available: &available })?;
    tracing::info!(count = available.len(), path = %path.display(), "Wrote available model list");
    Ok(path)
}
