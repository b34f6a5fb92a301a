mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hangar_core::context::{BuildConfig, DEFAULT_MULTI_VARIANT_GROUP};
use hangar_core::domain::Language;
use tracing_subscriber::EnvFilter;

/// Hangar: builds the static ship/structure index and model map for the viewer
#[derive(Parser)]
#[command(name = "hangar", version, about)]
struct Cli {
    /// Directory holding icons.zip, sde.zip and the extracted db/ folder
    #[arg(long, default_value = "sde")]
    sde: PathBuf,

    /// Site root containing the model directories; output goes to <docs>/statics
    #[arg(long, default_value = "docs")]
    docs: PathBuf,

    /// Temporary directory for the extracted icon set
    #[arg(long, default_value = "icons_temp")]
    temp_icons: PathBuf,

    /// Primary model directory, relative to the site root
    #[arg(long, default_value = "models")]
    models: String,

    /// Supplementary model directory, relative to the site root
    #[arg(long, default_value = "models_extra")]
    extra_models: String,

    /// Group whose items list every model file as a variant
    #[arg(long, default_value_t = DEFAULT_MULTI_VARIANT_GROUP)]
    multi_variant_group: i64,

    /// Do not build variant lists for any group
    #[arg(long)]
    no_variants: bool,
}

impl Cli {
    fn into_config(self) -> BuildConfig {
        BuildConfig {
            sde_dir: self.sde,
            docs_dir: self.docs,
            statics_subdir: "statics".to_string(),
            temp_icons_dir: self.temp_icons,
            primary_models_subdir: self.models,
            supplementary_models_subdir: self.extra_models,
            multi_variant_group: (!self.no_variants).then_some(self.multi_variant_group),
            languages: Language::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::build::run(cli.into_config())
}
