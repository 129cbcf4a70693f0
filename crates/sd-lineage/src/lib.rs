//! Append-only version lineage for projects.
//!
//! A project holds one `latest_version` and a history in `previous_versions`,
//! oldest first. Version numbers run contiguously from 1. Every append
//! returns a fresh [`Project`] value; the input is never edited in place, so
//! a caller that fails to persist the result leaves no partial state behind.

use sd_types::{EngineError, EngineResult, Project, ProjectMeta, Report, SourceFile, Version};

/// Number given to the first version of every project
pub const FIRST_VERSION: u32 = 1;

/// What a new version is appended to
#[derive(Debug, Clone)]
pub enum LineageBase {
    /// A project that does not exist yet
    New(ProjectMeta),
    /// The current stored state of a project
    Existing(Project),
}

/// Append a version built from `report`.
///
/// Returns the new version together with the updated project, whose
/// `latest_version` is that same version.
pub fn append_version(
    base: LineageBase,
    report: Report,
    analyzed_files: Vec<SourceFile>,
) -> EngineResult<(Version, Project)> {
    let project = match base {
        LineageBase::New(meta) => {
            let version = Version {
                version_number: FIRST_VERSION,
                analyzed_files,
                report,
            };
            Project {
                total_smells: version.report.total_smells,
                quality_score: version.report.quality_score,
                meta,
                latest_version: version,
                previous_versions: Vec::new(),
            }
        }
        LineageBase::Existing(mut project) => {
            let next = project
                .latest_version
                .version_number
                .checked_add(1)
                .ok_or_else(|| {
                    EngineError::InvalidInput(format!(
                        "project {} has exhausted version numbers",
                        project.id()
                    ))
                })?;
            let version = Version {
                version_number: next,
                analyzed_files,
                report,
            };
            let previous = std::mem::replace(&mut project.latest_version, version);
            project.previous_versions.push(previous);
            sync_mirrors(&mut project);
            project
        }
    };

    sd_utils::log_version_appended!(
        project.id(),
        project.head_version(),
        project.previous_versions.len()
    );

    Ok((project.latest_version.clone(), project))
}

/// Start a lineage at version 1
pub fn create_project(
    meta: ProjectMeta,
    report: Report,
    analyzed_files: Vec<SourceFile>,
) -> EngineResult<Project> {
    append_version(LineageBase::New(meta), report, analyzed_files).map(|(_, project)| project)
}

fn sync_mirrors(project: &mut Project) {
    project.total_smells = project.latest_version.report.total_smells;
    project.quality_score = project.latest_version.report.quality_score;
}

/// Check the lineage invariants of a project loaded from storage
pub fn verify_lineage(project: &Project) -> EngineResult<()> {
    for (expected, version) in (FIRST_VERSION..).zip(project.versions()) {
        if version.version_number != expected {
            return Err(EngineError::StorageError(format!(
                "project {} has version {} where {} was expected",
                project.id(),
                version.version_number,
                expected
            )));
        }
    }

    let report = &project.latest_version.report;
    if project.total_smells != report.total_smells || project.quality_score != report.quality_score
    {
        return Err(EngineError::StorageError(format!(
            "project {} summary does not match version {}",
            project.id(),
            project.head_version()
        )));
    }

    Ok(())
}
