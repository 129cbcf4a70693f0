use std::fmt;
use std::sync::Arc;

/// Stages of the analysis pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Extract,
    Analyze,
    BuildReport,
    Persist,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Extract,
        PipelineStage::Analyze,
        PipelineStage::BuildReport,
        PipelineStage::Persist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Extract => "extract",
            PipelineStage::Analyze => "analyze",
            PipelineStage::BuildReport => "build-report",
            PipelineStage::Persist => "persist",
        }
    }

    /// Completion percentage once this stage has started
    pub fn percentage(&self) -> f32 {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        (idx as f32 / Self::ALL.len() as f32) * 100.0
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for reporting progress of long-running operations
pub trait ProgressReporter: Send + Sync {
    /// Report progress with a message and percentage
    fn report(&self, message: &str, percentage: f32);

    /// Mark operation as complete
    fn complete(&self, message: Option<&str>);

    /// Report an error
    fn error(&self, message: &str, error: Option<&dyn std::error::Error>);

    fn stage(&self, stage: PipelineStage) {
        self.report(stage.as_str(), stage.percentage());
    }
}

/// No-op progress reporter for when progress reporting is not needed
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report(&self, _message: &str, _percentage: f32) {}
    fn complete(&self, _message: Option<&str>) {}
    fn error(&self, _message: &str, _error: Option<&dyn std::error::Error>) {}
}

/// Forwards progress events to `tracing`
pub struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn report(&self, message: &str, percentage: f32) {
        tracing::info!(percentage = percentage, "{}", message);
    }

    fn complete(&self, message: Option<&str>) {
        tracing::info!(percentage = 100.0, "{}", message.unwrap_or("Complete"));
    }

    fn error(&self, message: &str, error: Option<&dyn std::error::Error>) {
        match error {
            Some(err) => tracing::error!(error = %err, "{}", message),
            None => tracing::error!("{}", message),
        }
    }
}

/// Create an Arc-wrapped progress reporter
pub fn create_progress_reporter(log: bool) -> Arc<dyn ProgressReporter> {
    if log {
        Arc::new(TracingProgressReporter)
    } else {
        Arc::new(NoOpProgressReporter)
    }
}
