use crate::analyzer::SmellAnalyzer;
use crate::config::EngineConfig;
use crate::context::RequestContext;
use crate::extractor::{ArchiveExtractor, SourceArchive};
use sd_catalog::SmellCatalog;
use sd_db::ProjectStore;
use sd_lineage::{append_version, LineageBase};
use sd_report::ReportBuilder;
use sd_types::{
    AnalyzerError, EngineError, EngineResult, PortfolioStats, Project, ProjectId, ProjectMeta,
    RecentProject, Report, SourceFile, UserId,
};
use sd_utils::{NoOpProgressReporter, PipelineStage, ProgressReporter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Request to create a project from an uploaded archive
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub archive: Option<SourceArchive>,
}

/// Orchestrates extraction, analysis, report building, lineage and storage.
///
/// Every failure short-circuits before the store is written.
pub struct ProjectService<A, E, S> {
    analyzer: A,
    extractor: E,
    store: S,
    catalog: SmellCatalog,
    config: EngineConfig,
    progress: Arc<dyn ProgressReporter>,
}

impl<A, E, S> ProjectService<A, E, S>
where
    A: SmellAnalyzer,
    E: ArchiveExtractor,
    S: ProjectStore,
{
    pub fn new(analyzer: A, extractor: E, store: S, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let catalog = config.build_catalog()?;
        Ok(Self {
            analyzer,
            extractor,
            store,
            catalog,
            config,
            progress: Arc::new(NoOpProgressReporter),
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &SmellCatalog {
        &self.catalog
    }

    /// Create a project whose lineage starts at version 1
    #[instrument(skip(self, ctx, request), fields(user = %ctx.user, title = %request.title))]
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        request: NewProject,
    ) -> EngineResult<Project> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(EngineError::InvalidInput("project title is required".to_string()));
        }
        let archive = request.archive.ok_or(EngineError::MissingArchive)?;

        let (report, files) = self.run_analysis(&archive).await?;

        let mut meta = ProjectMeta::new(title, ctx.user.clone());
        meta.description = request.description.filter(|d| !d.trim().is_empty());
        let (_, project) = append_version(LineageBase::New(meta), report, files)?;

        self.progress.stage(PipelineStage::Persist);
        self.store.insert(project.clone()).await?;
        self.progress.complete(Some("Project created"));

        info!(project = %project.id(), total_smells = project.total_smells, "Project created");
        Ok(project)
    }

    /// Analyze a new archive and append it as the next version.
    ///
    /// A concurrent update that lands first turns this call into
    /// `EngineError::Conflict`; nothing is written in that case.
    #[instrument(skip(self, ctx, archive), fields(user = %ctx.user, project = %id))]
    pub async fn update_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
        archive: Option<SourceArchive>,
    ) -> EngineResult<Project> {
        let archive = archive.ok_or(EngineError::MissingArchive)?;
        let current = self.load_visible(ctx, id).await?;
        let expected_head = current.head_version();

        let (report, files) = self.run_analysis(&archive).await?;
        let (version, project) = append_version(LineageBase::Existing(current), report, files)?;

        self.progress.stage(PipelineStage::Persist);
        let project = match self.store.replace_if_head(expected_head, project).await {
            Ok(stored) => stored,
            Err(e) => {
                self.progress.error("Update not persisted", Some(&e));
                return Err(e);
            }
        };
        self.progress.complete(Some("Project updated"));

        info!(
            project = %id,
            version = version.version_number,
            total_smells = project.total_smells,
            "Project updated"
        );
        Ok(project)
    }

    /// Full project with its lineage; owner or member only
    pub async fn project_details(&self, ctx: &RequestContext, id: ProjectId) -> EngineResult<Project> {
        self.load_visible(ctx, id).await
    }

    /// Share a project with another user; owner only
    #[instrument(skip(self, ctx), fields(user = %ctx.user, project = %id))]
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
        member: UserId,
    ) -> EngineResult<Project> {
        let project = self
            .store
            .get(id)
            .await?
            .ok_or(EngineError::ProjectNotFound(id))?;
        if !project.is_owner(&ctx.user) {
            return Err(forbidden(ctx, id));
        }
        if project.is_owner(&member) {
            return Ok(project);
        }
        self.store.add_member(id, member).await
    }

    /// Portfolio statistics over every project the caller can see
    #[instrument(skip(self, ctx), fields(user = %ctx.user))]
    pub async fn dashboard(&self, ctx: &RequestContext) -> EngineResult<PortfolioStats> {
        let projects = self.store.list_visible_to(&ctx.user).await?;
        Ok(sd_portfolio::aggregate(&projects))
    }

    /// The newest projects the caller can see
    pub async fn recent_projects(&self, ctx: &RequestContext) -> EngineResult<Vec<RecentProject>> {
        let projects = self.store.list_visible_to(&ctx.user).await?;
        Ok(sd_portfolio::recent_projects(
            &projects,
            self.config.dashboard.recent_limit,
        ))
    }

    async fn load_visible(&self, ctx: &RequestContext, id: ProjectId) -> EngineResult<Project> {
        let project = self
            .store
            .get(id)
            .await?
            .ok_or(EngineError::ProjectNotFound(id))?;
        if !project.is_visible_to(&ctx.user) {
            return Err(forbidden(ctx, id));
        }
        Ok(project)
    }

    /// Extract, analyze and build; touches no storage
    async fn run_analysis(&self, archive: &SourceArchive) -> EngineResult<(Report, Vec<SourceFile>)> {
        self.progress.stage(PipelineStage::Extract);
        let files = self.extractor.extract(archive)?;
        if files.is_empty() {
            return Err(EngineError::NoSourceFiles(archive.file_name.clone()));
        }

        self.progress.stage(PipelineStage::Analyze);
        let smells = self.call_analyzer(archive).await?;

        self.progress.stage(PipelineStage::BuildReport);
        let report = ReportBuilder::new(&self.catalog)
            .with_scoring(self.config.scoring.clone())
            .build(smells, files.len())?;

        Ok((report, files))
    }

    async fn call_analyzer(&self, archive: &SourceArchive) -> EngineResult<Vec<sd_types::Smell>> {
        let timeout_secs = self.config.analyzer.timeout_secs;
        let result = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.analyzer.analyze(archive),
        )
        .await
        .unwrap_or(Err(AnalyzerError::Timeout(timeout_secs)));

        result.map_err(|e| {
            warn!(error = %e, "Analyzer call failed");
            self.progress.error("Analysis failed", Some(&e));
            EngineError::from(e)
        })
    }
}

fn forbidden(ctx: &RequestContext, project: ProjectId) -> EngineError {
    EngineError::Forbidden {
        user: ctx.user.to_string(),
        project,
    }
}
