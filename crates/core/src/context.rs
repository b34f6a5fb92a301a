use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Language;
use crate::error::Result;
use crate::scanner::ModelSource;

/// Group whose items list each model file as a separate variant.
pub const DEFAULT_MULTI_VARIANT_GROUP: i64 = 29;

/// Input/output layout and build options. `Default` is the conventional
/// layout relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Holds `icons.zip`, `sde.zip` and, after extraction, `db/`.
    pub sde_dir: PathBuf,
    /// Site root; the output directory and model directories live here.
    pub docs_dir: PathBuf,
    pub statics_subdir: String,
    pub temp_icons_dir: PathBuf,
    pub primary_models_subdir: String,
    pub supplementary_models_subdir: String,
    pub multi_variant_group: Option<i64>,
    pub languages: Vec<Language>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sde_dir: PathBuf::from("sde"),
            docs_dir: PathBuf::from("docs"),
            statics_subdir: "statics".to_string(),
            temp_icons_dir: PathBuf::from("icons_temp"),
            primary_models_subdir: "models".to_string(),
            supplementary_models_subdir: "models_extra".to_string(),
            multi_variant_group: Some(DEFAULT_MULTI_VARIANT_GROUP),
            languages: Language::ALL.to_vec(),
        }
    }
}

/// Resolved paths for one run. Owned by the orchestrator and handed to
/// each stage.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config: BuildConfig,
    pub output_dir: PathBuf,
    pub icons_dir: PathBuf,
}

impl BuildContext {
    pub fn new(config: BuildConfig) -> Self {
        let output_dir = config.docs_dir.join(&config.statics_subdir);
        let icons_dir = output_dir.join("icons");
        Self {
            config,
            output_dir,
            icons_dir,
        }
    }

    pub fn icons_zip(&self) -> PathBuf {
        self.config.sde_dir.join("icons.zip")
    }

    pub fn sde_zip(&self) -> PathBuf {
        self.config.sde_dir.join("sde.zip")
    }

    pub fn database_path(&self, language: Language) -> PathBuf {
        self.config
            .sde_dir
            .join("db")
            .join(format!("item_db_{}.sqlite", language.db_suffix()))
    }

    pub fn temp_icons_dir(&self) -> &Path {
        &self.config.temp_icons_dir
    }

    pub fn primary_models(&self) -> ModelSource {
        let subdir = &self.config.primary_models_subdir;
        ModelSource::new(self.config.docs_dir.join(subdir), format!("./{subdir}"))
    }

    pub fn supplementary_models(&self) -> ModelSource {
        let subdir = &self.config.supplementary_models_subdir;
        ModelSource::new(self.config.docs_dir.join(subdir), format!("./{subdir}"))
    }

    /// Wipe and recreate the output tree. Called once per run.
    pub fn prepare(&self) -> Result<()> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.icons_dir)?;
        Ok(())
    }

    /// Recreate the temporary icon extraction directory.
    pub fn reset_temp_icons(&self) -> Result<()> {
        let dir = self.temp_icons_dir();
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;
        Ok(())
    }

    pub fn cleanup(&self) -> Result<()> {
        let dir = self.temp_icons_dir();
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
