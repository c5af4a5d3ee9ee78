//! Subcommand bodies. Each stage starts from published artifacts only.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use stayframe_core::{StayframeConfig, StayframeError, StayframeResult};
use stayframe_extract::{
    eligible_stays, load_cohort, CohortIndex, ExtractionStats, LoadedCohort,
    StreamingWindowedExtractor,
};
use stayframe_merge::{MergePlan, MergeReport, ProgressiveMerger};
use stayframe_storage::cleanup_orphaned_staging;

pub fn load_config(path: Option<&Path>, base_dir: Option<PathBuf>) -> Result<StayframeConfig> {
    let mut config = match path {
        Some(path) => StayframeConfig::load(path)
            .map_err(StayframeError::from)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StayframeConfig::default(),
    };
    if let Some(base_dir) = base_dir {
        config.paths.base_dir = base_dir;
    }
    config
        .validate()
        .map_err(StayframeError::from)
        .context("invalid configuration")?;
    Ok(config)
}

pub fn check(config: &StayframeConfig) -> Result<()> {
    let missing = config.missing_paths();
    let plan = MergePlan::from_config(config);

    println!("cohort:     {}", config.paths.cohort_path().display());
    for source in &config.sources {
        println!(
            "source:     {} ({}, {} variables)",
            source.name,
            config.source_path(source).display(),
            source.variables.len()
        );
    }
    println!("merge plan: {} columns", plan.len());
    println!("output:     {}", config.paths.output_path().display());

    if !missing.is_empty() {
        for path in &missing {
            eprintln!("missing: {}", path.display());
        }
        bail!("{} required input file(s) not found", missing.len());
    }
    println!("ok");
    Ok(())
}

/// Create directories and clear staging files left by an interrupted run.
fn prepare(config: &StayframeConfig) -> Result<()> {
    config
        .create_directories()
        .context("creating artifact directories")?;
    let temp_dir = config.paths.temp_dir_path();
    let mut cleaned = cleanup_orphaned_staging(&temp_dir);
    if let Some(parent) = config.paths.output_path().parent() {
        if parent != temp_dir {
            cleaned += cleanup_orphaned_staging(parent);
        }
    }
    tracing::debug!(cleaned, "startup cleanup done");
    Ok(())
}

fn cohort(config: &StayframeConfig) -> StayframeResult<LoadedCohort> {
    let stays_path = config.paths.stays_path();
    Ok(load_cohort(&config.paths.cohort_path(), stays_path.as_deref())?)
}

fn build_index(config: &StayframeConfig, loaded: &LoadedCohort) -> StayframeResult<CohortIndex> {
    let index = CohortIndex::build(&loaded.records, config.processing.window())?;
    println!(
        "cohort: {} encounters indexed across {} subjects ({} without admission time)",
        index.encounter_count(),
        index.subject_count(),
        index.build_stats().unparseable_admission
    );
    Ok(index)
}

fn cohort_context(config: &StayframeConfig) -> String {
    format!("loading cohort from {}", config.paths.cohort_path().display())
}

pub fn extract(config: &StayframeConfig, only: &[String]) -> Result<Vec<(String, ExtractionStats)>> {
    for name in only {
        if !config.sources.iter().any(|s| &s.name == name) {
            bail!("no source named `{name}` in the configuration");
        }
    }
    prepare(config)?;

    let loaded = cohort(config).with_context(|| cohort_context(config))?;
    let index = build_index(config, &loaded).context("building cohort index")?;
    let eligible = eligible_stays(&loaded.records);
    let extractor =
        StreamingWindowedExtractor::new(&index, &eligible, config.processing.batch_size);
    let temp_dir = config.paths.temp_dir_path();

    let mut results = Vec::new();
    for source in &config.sources {
        if !only.is_empty() && !only.contains(&source.name) {
            continue;
        }
        let source_path = config.source_path(source);
        let stats = extractor
            .run_source(source, &source_path, &temp_dir)
            .map_err(StayframeError::from)
            .with_context(|| format!("extracting source `{}`", source.name))?;
        println!(
            "{}: {} rows read, {} matched, {} discarded",
            source.name,
            stats.rows_read,
            stats.matched,
            stats.discarded()
        );
        results.push((source.name.clone(), stats));
    }
    Ok(results)
}

pub fn merge(config: &StayframeConfig) -> Result<MergeReport> {
    prepare(config)?;
    let loaded = cohort(config).with_context(|| cohort_context(config))?;
    let plan = MergePlan::from_config(config);
    let merger = ProgressiveMerger::new(config.paths.output_path(), config.processing.batch_size);

    let report = merger
        .run_plan(&plan, &config.paths.temp_dir_path(), &loaded.records)
        .map_err(StayframeError::from)
        .context("progressive merge")?;
    println!(
        "wide table: {} rows x {} columns ({} merged, {} skipped) -> {}",
        report.rows,
        report.columns.len(),
        report.merged.len(),
        report.skipped.len(),
        merger.path().display()
    );
    Ok(report)
}

pub fn run(config: &StayframeConfig) -> Result<()> {
    extract(config, &[])?;
    merge(config)?;
    Ok(())
}
