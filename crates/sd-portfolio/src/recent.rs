use sd_types::{Project, RecentProject};

/// Default length of the recent-projects list
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Newest projects first, at most `limit` of them
pub fn recent_projects(projects: &[Project], limit: usize) -> Vec<RecentProject> {
    let mut ordered: Vec<&Project> = projects.iter().collect();
    // stable: equal timestamps keep input order
    ordered.sort_by(|a, b| b.meta.created_at.cmp(&a.meta.created_at));

    ordered
        .into_iter()
        .take(limit)
        .map(|p| RecentProject {
            id: p.id(),
            title: p.meta.title.clone(),
            total_smells: p.latest_version.report.total_smells,
            created_at: p.meta.created_at,
        })
        .collect()
}
