use sd_types::{EngineResult, Project, ProjectId, UserId};

/// Persistence collaborator for whole project values.
///
/// Writes are all-or-nothing. `replace_if_head` is the only way to change a
/// stored lineage and acts as the per-project concurrency guard;
/// `add_member` changes metadata only. Neither overwrites the other's fields.
#[allow(async_fn_in_trait)]
pub trait ProjectStore: Send + Sync {
    /// Store a new project; fails if the id is taken
    async fn insert(&self, project: Project) -> EngineResult<()>;

    async fn get(&self, id: ProjectId) -> EngineResult<Option<Project>>;

    /// Install the lineage of `project` only if the stored head is still
    /// `expected_head`, keeping the stored metadata. Returns the stored project.
    ///
    /// Returns `EngineError::Conflict` when another writer got there first.
    async fn replace_if_head(&self, expected_head: u32, project: Project) -> EngineResult<Project>;

    /// Grant `user` membership without touching the lineage
    async fn add_member(&self, id: ProjectId, user: UserId) -> EngineResult<Project>;

    /// Projects owned by or shared with `user`, oldest first
    async fn list_visible_to(&self, user: &UserId) -> EngineResult<Vec<Project>>;
}
