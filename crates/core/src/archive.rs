use std::fs;
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::error::Result;

/// Extract every entry of `zip_path` into `dest`.
///
/// Returns `Ok(false)` when the archive does not exist; vendor archives are
/// optional and the caller continues without them. Entries whose names
/// would escape `dest` are skipped.
pub fn extract_zip(zip_path: &Path, dest: &Path) -> Result<bool> {
    if !zip_path.is_file() {
        tracing::warn!(archive = %zip_path.display(), "Archive not found, skipping extraction");
        return Ok(false);
    }

    let file = fs::File::open(zip_path)?;
    let mut archive = ZipArchive::new(io::BufReader::new(file))?;
    fs::create_dir_all(dest)?;

    let mut extracted = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "Unsafe path in archive, skipping entry");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        extracted += 1;
    }

    tracing::info!(archive = %zip_path.display(), files = extracted, "Extracted archive");
    Ok(true)
}
