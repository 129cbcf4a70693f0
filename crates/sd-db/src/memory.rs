use crate::store::ProjectStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sd_lineage::verify_lineage;
use sd_types::{EngineError, EngineResult, Project, ProjectId, UserId};
use tracing::{debug, warn};

/// Process-local store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: DashMap<ProjectId, Project>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectStore for InMemoryProjectStore {
    async fn insert(&self, project: Project) -> EngineResult<()> {
        verify_lineage(&project)?;
        match self.projects.entry(project.id()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateProject(project.id())),
            Entry::Vacant(slot) => {
                debug!(project = %project.id(), "Project stored");
                slot.insert(project);
                Ok(())
            }
        }
    }

    async fn get(&self, id: ProjectId) -> EngineResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.value().clone()))
    }

    async fn replace_if_head(&self, expected_head: u32, project: Project) -> EngineResult<Project> {
        verify_lineage(&project)?;
        let id = project.id();
        let next_head = expected_head.checked_add(1).ok_or_else(|| {
            EngineError::InvalidInput(format!("project {} cannot grow past v{}", id, expected_head))
        })?;

        // the shard lock is held until the guard drops
        let mut current = self
            .projects
            .get_mut(&id)
            .ok_or(EngineError::ProjectNotFound(id))?;

        let found = current.head_version();
        if found != expected_head {
            warn!(project = %id, expected = expected_head, found, "Lineage head moved");
            return Err(EngineError::Conflict {
                project: id,
                expected: expected_head,
                found,
            });
        }
        if project.head_version() != next_head {
            return Err(EngineError::InvalidInput(format!(
                "replacement for project {} must be v{}, got v{}",
                id,
                next_head,
                project.head_version()
            )));
        }

        // metadata stays as stored so concurrent membership grants survive
        let Project {
            latest_version,
            previous_versions,
            total_smells,
            quality_score,
            ..
        } = project;
        current.latest_version = latest_version;
        current.previous_versions = previous_versions;
        current.total_smells = total_smells;
        current.quality_score = quality_score;

        debug!(project = %id, version = next_head, "Lineage replaced");
        Ok(current.clone())
    }

    async fn add_member(&self, id: ProjectId, user: UserId) -> EngineResult<Project> {
        let mut current = self
            .projects
            .get_mut(&id)
            .ok_or(EngineError::ProjectNotFound(id))?;
        current.meta.members.insert(user);
        Ok(current.clone())
    }

    async fn list_visible_to(&self, user: &UserId) -> EngineResult<Vec<Project>> {
        let mut visible: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| p.value().is_visible_to(user))
            .map(|p| p.value().clone())
            .collect();
        visible.sort_by(|a, b| {
            a.meta
                .created_at
                .cmp(&b.meta.created_at)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sd_lineage::{append_version, create_project, LineageBase};
    use sd_types::{ProjectMeta, Report};

    fn report(total_smells: usize) -> Report {
        Report {
            total_files: 1,
            total_smells,
            affected_file_count: 0,
            affected_files: Vec::new(),
            smells: Vec::new(),
            chart_data: Vec::new(),
            quality_score: 100.0,
            generated_at: Utc::now(),
        }
    }

    fn project(owner: &str) -> Project {
        create_project(ProjectMeta::new("p", UserId::new(owner)), report(0), Vec::new()).unwrap()
    }

    fn next(project: Project) -> Project {
        append_version(LineageBase::Existing(project), report(1), Vec::new())
            .unwrap()
            .1
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        let id = p.id();
        store.insert(p.clone()).await.unwrap();

        assert_eq!(store.get(id).await.unwrap(), Some(p));
        assert!(store.get(ProjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        store.insert(p.clone()).await.unwrap();
        let err = store.insert(p).await.unwrap_err();
        assert!(matches!(err, EngineError::DuplicateProject(_)));
    }

    #[tokio::test]
    async fn test_replace_requires_matching_head() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        store.insert(p.clone()).await.unwrap();

        let v2 = next(p.clone());
        store.replace_if_head(1, v2.clone()).await.unwrap();

        // a second writer that also started from v1
        let stale = next(p);
        let err = store.replace_if_head(1, stale).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Conflict {
                expected: 1,
                found: 2,
                ..
            }
        ));
        assert_eq!(store.get(v2.id()).await.unwrap().unwrap().head_version(), 2);
    }

    #[tokio::test]
    async fn test_replace_rejects_skipped_version() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        store.insert(p.clone()).await.unwrap();

        let v3 = next(next(p));
        let err = store.replace_if_head(1, v3).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_replace_missing_project() {
        let store = InMemoryProjectStore::new();
        let err = store.replace_if_head(1, next(project("alice"))).await.unwrap_err();
        assert!(matches!(err, EngineError::ProjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_visibility_filter() {
        let store = InMemoryProjectStore::new();
        let mut shared = project("alice");
        shared.meta.members.insert(UserId::new("bob"));
        store.insert(shared).await.unwrap();
        store.insert(project("alice")).await.unwrap();
        store.insert(project("carol")).await.unwrap();

        assert_eq!(store.list_visible_to(&UserId::new("alice")).await.unwrap().len(), 2);
        assert_eq!(store.list_visible_to(&UserId::new("bob")).await.unwrap().len(), 1);
        assert_eq!(store.list_visible_to(&UserId::new("dave")).await.unwrap().len(), 0);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_add_member_keeps_head() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        let id = p.id();
        store.insert(p).await.unwrap();

        let updated = store.add_member(id, UserId::new("bob")).await.unwrap();
        assert_eq!(updated.head_version(), 1);
        assert!(updated.is_visible_to(&UserId::new("bob")));
        assert_eq!(store.list_visible_to(&UserId::new("bob")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_stored_members() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        let id = p.id();
        store.insert(p.clone()).await.unwrap();

        // built from a snapshot taken before bob joined
        let v2 = next(p);
        store.add_member(id, UserId::new("bob")).await.unwrap();
        let stored = store.replace_if_head(1, v2).await.unwrap();

        assert_eq!(stored.head_version(), 2);
        assert!(stored.meta.members.contains(&UserId::new("bob")));
        assert_eq!(store.get(id).await.unwrap().unwrap(), stored);
    }

    #[tokio::test]
    async fn test_replace_at_max_head_is_rejected() {
        let store = InMemoryProjectStore::new();
        let p = project("alice");
        store.insert(p.clone()).await.unwrap();

        let err = store.replace_if_head(u32::MAX, next(p)).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
