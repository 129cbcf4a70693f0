use crate::smell::{AffectedFile, ChartBucket, Smell};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable summary of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_files: usize,
    pub total_smells: usize,
    pub affected_file_count: usize,
    #[serde(default)]
    pub affected_files: Vec<AffectedFile>,
    pub smells: Vec<Smell>,
    pub chart_data: Vec<ChartBucket>,
    pub quality_score: f64,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.smells.is_empty()
    }

    /// Chart bucket for a category, if any smell of that category was found
    pub fn bucket(&self, category: &str) -> Option<&ChartBucket> {
        self.chart_data.iter().find(|b| b.category == category)
    }
}
