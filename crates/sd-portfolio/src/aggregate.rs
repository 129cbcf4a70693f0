use indexmap::IndexMap;
use sd_types::{BlendedScore, ChartBucket, PortfolioStats, Project, Report};

/// Anything that can stand in for a project on the dashboard
pub trait PortfolioEntry {
    /// Report of the latest version, if one is present
    fn latest_report(&self) -> Option<&Report>;

    /// Per-project quality score on a 0-100 scale
    fn quality_score(&self) -> f64;
}

impl PortfolioEntry for Project {
    fn latest_report(&self) -> Option<&Report> {
        Some(&self.latest_version.report)
    }

    fn quality_score(&self) -> f64 {
        self.quality_score
    }
}

/// A bare report counts as a single-version project
impl PortfolioEntry for Report {
    fn latest_report(&self) -> Option<&Report> {
        Some(self)
    }

    fn quality_score(&self) -> f64 {
        self.quality_score
    }
}

impl<T: PortfolioEntry + ?Sized> PortfolioEntry for &T {
    fn latest_report(&self) -> Option<&Report> {
        (**self).latest_report()
    }

    fn quality_score(&self) -> f64 {
        (**self).quality_score()
    }
}

/// Portfolio-wide statistics for the given projects, in input order
pub fn aggregate<P: PortfolioEntry>(projects: &[P]) -> PortfolioStats {
    let stats = PortfolioStats {
        total_projects: projects.len(),
        total_smells: total_smells(projects),
        quality_score: blended_quality_score(projects),
        chart_data: merge_chart_data(projects),
    };

    sd_utils::log_portfolio_aggregated!(
        stats.total_projects,
        stats.total_smells,
        stats.quality_score
    );
    stats
}

/// Sum of latest-report smell totals; projects without a report add nothing
pub fn total_smells<P: PortfolioEntry>(projects: &[P]) -> usize {
    projects
        .iter()
        .filter_map(|p| p.latest_report())
        .map(|r| r.total_smells)
        .sum()
}

/// Mean per-project score, computed as `sum / (n * 100) * 100`.
///
/// An empty portfolio scores 0.
pub fn blended_quality_score<P: PortfolioEntry>(projects: &[P]) -> BlendedScore {
    if projects.is_empty() {
        return BlendedScore(0.0);
    }

    let total_score = projects.len() as f64 * 100.0;
    let achieved: f64 = projects.iter().map(|p| p.quality_score()).sum();
    BlendedScore((achieved / total_score) * 100.0)
}

/// Merge chart buckets by category; the first color seen for a category wins
pub fn merge_chart_data<P: PortfolioEntry>(projects: &[P]) -> Vec<ChartBucket> {
    let mut merged: IndexMap<&str, ChartBucket> = IndexMap::new();

    for report in projects.iter().filter_map(|p| p.latest_report()) {
        for bucket in &report.chart_data {
            if bucket.category.is_empty() {
                continue;
            }
            merged
                .entry(bucket.category.as_str())
                .and_modify(|existing| existing.value += bucket.value)
                .or_insert_with(|| bucket.clone());
        }
    }

    merged.into_values().collect()
}
