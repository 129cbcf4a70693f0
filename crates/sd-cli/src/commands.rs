use anyhow::{bail, Context, Result};
use sd_report::ReportBuilder;
use sd_services::{parse_smells_response, DirectoryScanner, EngineConfig};
use sd_types::{PortfolioStats, Report, Smell, SourceFile};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Smells from a bare JSON array or an analyzer response body
pub fn read_smells(path: &Path) -> Result<Vec<Smell>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let smells = match value {
        Value::Array(_) => serde_json::from_value(value)
            .with_context(|| format!("decoding smells in {}", path.display()))?,
        other => parse_smells_response(other)
            .with_context(|| format!("decoding analyzer response in {}", path.display()))?,
    };
    Ok(smells)
}

pub fn build_report(
    config: &EngineConfig,
    smells_path: &Path,
    total_files: Option<usize>,
    source_dir: Option<&Path>,
) -> Result<Report> {
    let smells = read_smells(smells_path)?;
    let total_files = match (total_files, source_dir) {
        (Some(n), _) => n,
        (None, Some(dir)) => scan(config, dir)?.len(),
        (None, None) => bail!("either --total-files or --source-dir is required"),
    };
    debug!(smells = smells.len(), total_files, "Building report from file");

    let catalog = config.build_catalog()?;
    let report = ReportBuilder::new(&catalog)
        .with_scoring(config.scoring.clone())
        .build(smells, total_files)?;
    Ok(report)
}

pub fn portfolio(paths: &[PathBuf]) -> Result<PortfolioStats> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let report: Report = serde_json::from_str(&raw)
            .with_context(|| format!("decoding report {}", path.display()))?;
        reports.push(report);
    }
    Ok(sd_portfolio::aggregate(&reports))
}

pub fn scan(config: &EngineConfig, dir: &Path) -> Result<Vec<SourceFile>> {
    let files = DirectoryScanner::from_config(&config.extractor).scan(dir)?;
    Ok(files)
}

pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
