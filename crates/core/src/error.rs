use std::fmt;
use std::path::PathBuf;

/// A model filename present in both the primary and supplementary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameCollision {
    pub filename: String,
    pub primary: PathBuf,
    pub supplementary: PathBuf,
}

impl fmt::Display for FilenameCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} vs {})",
            self.filename,
            self.primary.display(),
            self.supplementary.display()
        )
    }
}

fn list_collisions(collisions: &[FilenameCollision]) -> String {
    collisions
        .iter()
        .map(|c| format!("\n  {c}"))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("catalog database does not exist: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error(
        "{} model filename(s) exist in both model directories; rename or remove one copy:{}",
        .0.len(),
        list_collisions(.0)
    )]
    FilenameCollision(Vec<FilenameCollision>),
}

pub type Result<T> = std::result::Result<T, Error>;
