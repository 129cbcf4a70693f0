use crate::score::{quality_score, ScoringConfig};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sd_catalog::SmellCatalog;
use sd_types::{AffectedFile, ChartBucket, EngineError, EngineResult, Report, Smell};
use tracing::debug;

/// Turns a flat smell list into a [`Report`]
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    catalog: &'a SmellCatalog,
    scoring: ScoringConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(catalog: &'a SmellCatalog) -> Self {
        Self {
            catalog,
            scoring: ScoringConfig::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn catalog(&self) -> &SmellCatalog {
        self.catalog
    }

    /// Build a report stamped with the current time
    pub fn build(&self, smells: Vec<Smell>, total_files: usize) -> EngineResult<Report> {
        self.build_at(smells, total_files, Utc::now())
    }

    pub fn build_at(
        &self,
        smells: Vec<Smell>,
        total_files: usize,
        generated_at: DateTime<Utc>,
    ) -> EngineResult<Report> {
        validate_smells(&smells)?;
        debug!(smells = smells.len(), total_files, "Building report");

        let affected_files = affected_files(&smells);
        let chart_data = chart_data(&smells, self.catalog);
        let quality_score = quality_score(&smells, total_files, self.catalog, &self.scoring);

        sd_utils::log_report_built!(total_files, smells.len(), quality_score);

        Ok(Report {
            total_files,
            total_smells: smells.len(),
            affected_file_count: affected_files.len(),
            affected_files,
            smells,
            chart_data,
            quality_score,
            generated_at,
        })
    }
}

/// Reject smells the engine cannot group
pub fn validate_smells(smells: &[Smell]) -> EngineResult<()> {
    for (index, smell) in smells.iter().enumerate() {
        if smell.category.trim().is_empty() {
            return Err(EngineError::InvalidSmell {
                index,
                reason: "category must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

/// One entry per distinct file name, in first-seen order
pub fn affected_files(smells: &[Smell]) -> Vec<AffectedFile> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for smell in smells {
        *counts.entry(smell.file_name.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(file_name, total_occurrences)| AffectedFile {
            file_name: file_name.to_string(),
            total_occurrences,
        })
        .collect()
}

/// One bucket per distinct category, in first-seen order
pub fn chart_data(smells: &[Smell], catalog: &SmellCatalog) -> Vec<ChartBucket> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for smell in smells {
        *counts.entry(smell.category.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(category, value)| ChartBucket {
            category: category.to_string(),
            value,
            color: catalog.display_color(category),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_smells() -> Vec<Smell> {
        vec![
            Smell::new("Long Method", "A.java", "/src/A.java", 10),
            Smell::new("Long Method", "A.java", "/src/A.java", 42),
            Smell::new("Feature Envy", "B.java", "/src/B.java", 3),
            Smell::new("Feature Envy", "B.java", "/src/B.java", 15),
            Smell::new("Feature Envy", "B.java", "/src/B.java", 27),
        ]
    }

    #[test]
    fn test_sample_report() {
        let catalog = SmellCatalog::builtin();
        let report = ReportBuilder::new(&catalog).build(sample_smells(), 2).unwrap();

        assert_eq!(report.total_smells, 5);
        assert_eq!(report.total_files, 2);
        assert_eq!(report.affected_file_count, 2);

        let chart: Vec<(&str, usize)> = report
            .chart_data
            .iter()
            .map(|b| (b.category.as_str(), b.value))
            .collect();
        assert_eq!(chart, vec![("Long Method", 2), ("Feature Envy", 3)]);

        // impact 2 x 1.0 + 3 x 1.0 = 5 against a budget of 6
        let expected = 100.0 - (5.0 / 6.0) * 100.0;
        assert!((report.quality_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let catalog = SmellCatalog::builtin();
        let report = ReportBuilder::new(&catalog).build(Vec::new(), 7).unwrap();

        assert_eq!(report.total_smells, 0);
        assert_eq!(report.affected_file_count, 0);
        assert!(report.chart_data.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.quality_score, 100.0);
    }

    #[test]
    fn test_affected_file_counts() {
        let files = affected_files(&sample_smells());
        assert_eq!(
            files,
            vec![
                AffectedFile {
                    file_name: "A.java".into(),
                    total_occurrences: 2
                },
                AffectedFile {
                    file_name: "B.java".into(),
                    total_occurrences: 3
                },
            ]
        );
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let catalog = SmellCatalog::builtin();
        let smells = vec![
            Smell::new("Long Method", "A.java", "/a", 1),
            Smell::new("long method", "A.java", "/a", 2),
        ];
        assert_eq!(chart_data(&smells, &catalog).len(), 2);
    }

    #[test]
    fn test_bucket_colors_come_from_catalog() {
        let catalog = SmellCatalog::builtin();
        let buckets = chart_data(&sample_smells(), &catalog);
        assert_eq!(buckets[0].color, catalog.display_color("Long Method"));
        assert_eq!(buckets[1].color, catalog.display_color("Feature Envy"));
    }

    #[test]
    fn test_empty_category_rejected() {
        let catalog = SmellCatalog::builtin();
        let smells = vec![
            Smell::new("Long Method", "A.java", "/a", 1),
            Smell::new("  ", "A.java", "/a", 2),
        ];
        let err = ReportBuilder::new(&catalog).build(smells, 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSmell { index: 1, .. }));
    }

    #[test]
    fn test_build_at_uses_given_timestamp() {
        let catalog = SmellCatalog::builtin();
        let at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = ReportBuilder::new(&catalog)
            .build_at(sample_smells(), 2, at)
            .unwrap();
        assert_eq!(report.generated_at, at);
    }

    #[test]
    fn test_smells_json_accepts_legacy_field_name() {
        let raw = r#"[{"smellType":"Long Method","fileName":"A.java","filePath":"/a","lineNumber":4}]"#;
        let smells: Vec<Smell> = serde_json::from_str(raw).unwrap();
        assert_eq!(smells[0].category, "Long Method");
    }
}
