use anyhow::{Context, Result};
use hangar_core::context::BuildConfig;
use hangar_core::domain::BuildSummary;
use hangar_core::{BuildProgress, Pipeline};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

fn active_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "  {bar:30.cyan/blue} {spinner:.green} {pos:>5}/{len:<5} {prefix:.dim} {msg}",
    )
    .unwrap()
    .progress_chars("━╸─")
}

fn done_style() -> ProgressStyle {
    ProgressStyle::with_template("  {bar:30.green} {prefix:.green} {msg:.dim}").unwrap()
}

pub fn run(config: BuildConfig) -> Result<()> {
    tracing::debug!(?config, "starting build");
    let pipeline = Pipeline::new(config);
    let output_dir = pipeline.context().output_dir.clone();

    let mp = MultiProgress::new();
    let mut active_pb: Option<ProgressBar> = None;

    let summary = pipeline
        .run(Some(&mut |progress| match progress {
            BuildProgress::SourceStart { source, file_count } => {
                if let Some(pb) = active_pb.take() {
                    pb.set_style(done_style());
                    pb.set_prefix("done");
                    pb.finish();
                }
                mp.println(format!("  Scanning {source} ({file_count} files)")).ok();

                let pb = mp.add(ProgressBar::new(file_count as u64));
                pb.set_style(active_style());
                pb.set_prefix("Hashing");
                pb.enable_steady_tick(std::time::Duration::from_millis(80));
                active_pb = Some(pb);
            }
            BuildProgress::FileHashed { path } => {
                if let Some(ref pb) = active_pb {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    pb.set_message(name);
                    pb.inc(1);
                }
            }
            BuildProgress::PhaseComplete { phase } => {
                if let Some(pb) = active_pb.take() {
                    pb.set_style(done_style());
                    pb.set_prefix("done");
                    pb.finish_with_message(format!("Hashed {} files", pb.length().unwrap_or(0)));
                }
                mp.println(format!("  {phase} complete")).ok();
            }
            BuildProgress::IndexWritten { path } => {
                mp.println(format!("  -> {}", path.display())).ok();
            }
        }))
        .with_context(|| format!("build of {} failed", output_dir.display()))?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!();
    println!(
        "Models: {} primary, {} supplementary, {} ids mapped",
        summary.primary_records, summary.supplementary_records, summary.mapped_ids
    );
    for lang in &summary.languages {
        println!(
            "Index [{}]: {} categories, {} groups, {} items",
            lang.language, lang.categories, lang.groups, lang.items
        );
    }
    println!(
        "Icons: {} copied, {} missing",
        summary.icons_copied, summary.icons_missing
    );
    if !summary.extra_found.is_empty() || !summary.extra_missing.is_empty() {
        println!(
            "Extra ids: {} found, {} missing {:?}",
            summary.extra_found.len(),
            summary.extra_missing.len(),
            summary.extra_missing
        );
    }
    println!("Build complete.");
}
