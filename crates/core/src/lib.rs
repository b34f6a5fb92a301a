pub mod archive;
pub mod catalog;
pub mod conflicts;
pub mod context;
pub mod domain;
pub mod error;
pub mod filename;
pub mod hasher;
pub mod icons;
pub mod index;
pub mod reconcile;
pub mod scanner;
pub mod tree;

use std::collections::BTreeSet;
use std::path::PathBuf;

use catalog::Catalog;
use context::{BuildConfig, BuildContext};
use domain::*;
use error::Result;
use scanner::ModelSource;
use tree::{CategoryNode, TreeInputs};

/// Callback for reporting build progress.
pub enum BuildProgress {
    /// Starting scan of a model directory.
    SourceStart { source: String, file_count: usize },
    /// A model file has been parsed and hashed (or skipped).
    FileHashed { path: PathBuf },
    /// A pipeline phase completed.
    PhaseComplete { phase: String },
    /// An index file was written.
    IndexWritten { path: PathBuf },
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(BuildProgress)>;

fn report(progress_cb: &mut ProgressCallback<'_>, event: BuildProgress) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(event);
    }
}

/// Records scanned from both model directories.
#[derive(Debug, Clone, Default)]
pub struct ScannedModels {
    pub primary: Vec<AssetFileRecord>,
    pub supplementary: Vec<AssetFileRecord>,
}

impl ScannedModels {
    pub fn all(&self) -> Vec<AssetFileRecord> {
        self.primary
            .iter()
            .chain(&self.supplementary)
            .cloned()
            .collect()
    }

    /// Ids contributed by the supplementary directory, sorted and unique.
    pub fn extra_ids(&self) -> Vec<i64> {
        self.supplementary
            .iter()
            .map(|r| r.item_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The main entry point: one full rebuild of the viewer's static data.
pub struct Pipeline {
    ctx: BuildContext,
}

impl Pipeline {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            ctx: BuildContext::new(config),
        }
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    fn scan_source(
        &self,
        source: &ModelSource,
        progress_cb: &mut ProgressCallback<'_>,
    ) -> Result<Vec<AssetFileRecord>> {
        let files = scanner::discover_models(&source.dir)?;
        report(
            progress_cb,
            BuildProgress::SourceStart {
                source: source.dir.to_string_lossy().to_string(),
                file_count: files.len(),
            },
        );
        Ok(scanner::scan_files(source, &files, |path| {
            report(
                progress_cb,
                BuildProgress::FileHashed {
                    path: path.to_path_buf(),
                },
            )
        }))
    }

    /// Scan both model directories and reject filename collisions between them.
    pub fn scan_models(&self, mut progress_cb: ProgressCallback<'_>) -> Result<ScannedModels> {
        self.scan_models_reporting(&mut progress_cb)
    }

    fn scan_models_reporting(&self, progress_cb: &mut ProgressCallback<'_>) -> Result<ScannedModels> {
        let primary = self.scan_source(&self.ctx.primary_models(), progress_cb)?;
        let supplementary = self.scan_source(&self.ctx.supplementary_models(), progress_cb)?;
        conflicts::ensure_disjoint(&primary, &supplementary)?;
        Ok(ScannedModels {
            primary,
            supplementary,
        })
    }

    /// Run the whole pipeline. Index files are only written once every
    /// language's tree has been built. The temporary icon directory is
    /// removed whether or not the build succeeds.
    pub fn run(&self, mut progress_cb: ProgressCallback<'_>) -> Result<BuildSummary> {
        let built = self.build(&mut progress_cb);
        if let Err(err) = self.ctx.cleanup() {
            if built.is_ok() {
                return Err(err);
            }
            tracing::warn!(error = %err, "Failed to remove temporary icon directory");
        }
        let summary = built?;
        report(
            &mut progress_cb,
            BuildProgress::PhaseComplete {
                phase: "writing".to_string(),
            },
        );
        Ok(summary)
    }

    fn build(&self, progress_cb: &mut ProgressCallback<'_>) -> Result<BuildSummary> {
        let ctx = &self.ctx;
        ctx.prepare()?;

        ctx.reset_temp_icons()?;
        let icons_available = archive::extract_zip(&ctx.icons_zip(), ctx.temp_icons_dir())?;
        archive::extract_zip(&ctx.sde_zip(), &ctx.config.sde_dir)?;
        report(
            progress_cb,
            BuildProgress::PhaseComplete {
                phase: "extracting".to_string(),
            },
        );

        let catalogs = ctx
            .config
            .languages
            .iter()
            .map(|&language| Ok((language, Catalog::open(&ctx.database_path(language))?)))
            .collect::<Result<Vec<_>>>()?;

        let scanned = self.scan_models_reporting(progress_cb)?;
        report(
            progress_cb,
            BuildProgress::PhaseComplete {
                phase: "scanning".to_string(),
            },
        );

        let records = scanned.all();
        let mapping = reconcile::reconcile(&records);
        let extra_ids = scanned.extra_ids();

        let inputs = TreeInputs {
            mapping: &mapping,
            records: &records,
            multi_variant_group: ctx.config.multi_variant_group,
        };
        let mut trees: Vec<(Language, Vec<CategoryNode>)> = Vec::new();
        let mut icon_names = BTreeSet::new();
        let mut extra_found = BTreeSet::new();
        for (language, catalog) in catalogs {
            let (data, lookup) = catalog.load(language, &extra_ids)?;
            trees.push((language, tree::build_category_tree(&data, &inputs, language)));
            icon_names.extend(data.icon_names);
            extra_found.extend(lookup.found);
        }
        report(
            progress_cb,
            BuildProgress::PhaseComplete {
                phase: "catalog".to_string(),
            },
        );

        let icon_report = if icons_available {
            icons::extract_icons(&icon_names, ctx.temp_icons_dir(), &ctx.icons_dir)?
        } else {
            tracing::warn!(referenced = icon_names.len(), "Icon archive unavailable, no icons copied");
            icons::IconReport::default()
        };

        let mut languages = Vec::with_capacity(trees.len());
        for (language, tree) in &trees {
            let path = index::write_index(&ctx.output_dir, *language, tree)?;
            report(progress_cb, BuildProgress::IndexWritten { path });
            let (categories, groups, items) = tree::tree_counts(tree);
            languages.push(LanguageSummary {
                language: *language,
                categories,
                groups,
                items,
            });
        }
        let path = index::write_available_models(&ctx.output_dir, &mapping)?;
        report(progress_cb, BuildProgress::IndexWritten { path });

        Ok(BuildSummary {
            primary_records: scanned.primary.len(),
            supplementary_records: scanned.supplementary.len(),
            mapped_ids: mapping.len(),
            languages,
            icons_copied: icon_report.copied,
            icons_missing: icon_report.missing.len(),
            extra_missing: extra_ids
                .iter()
                .copied()
                .filter(|id| !extra_found.contains(id))
                .collect(),
            extra_found: extra_found.into_iter().collect(),
        })
    }
}
