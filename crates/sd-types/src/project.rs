use crate::report::Report;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Reference to a user account managed outside the engine
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A source file that took part in an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub name: String,
    pub path: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A report plus the file set it was computed over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version_number: u32,
    pub analyzed_files: Vec<SourceFile>,
    pub report: Report,
}

/// Descriptive fields fixed when a project is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub owner: UserId,
    #[serde(default)]
    pub members: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl ProjectMeta {
    pub fn new(title: impl Into<String>, owner: UserId) -> Self {
        Self {
            id: ProjectId::new(),
            title: title.into(),
            description: None,
            owner,
            members: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A project and its version lineage.
///
/// `previous_versions` is ordered oldest-first. `total_smells` and
/// `quality_score` mirror `latest_version.report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub meta: ProjectMeta,
    pub latest_version: Version,
    #[serde(default)]
    pub previous_versions: Vec<Version>,
    pub total_smells: usize,
    pub quality_score: f64,
}

impl Project {
    pub fn id(&self) -> ProjectId {
        self.meta.id
    }

    pub fn head_version(&self) -> u32 {
        self.latest_version.version_number
    }

    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.meta.owner == user
    }

    /// True when the user owns the project or is one of its members
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.is_owner(user) || self.meta.members.contains(user)
    }

    /// All versions, oldest first, ending with the latest
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.previous_versions
            .iter()
            .chain(std::iter::once(&self.latest_version))
    }

    pub fn version(&self, number: u32) -> Option<&Version> {
        self.versions().find(|v| v.version_number == number)
    }
}
