use crate::project::ProjectId;
use crate::smell::ChartBucket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Portfolio quality score, rendered with two decimals on the wire
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct BlendedScore(pub f64);

impl BlendedScore {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for BlendedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for BlendedScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlendedScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Self)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Dashboard statistics over every project visible to a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_projects: usize,
    pub total_smells: usize,
    pub quality_score: BlendedScore,
    pub chart_data: Vec<ChartBucket>,
}

/// Row of the "recent projects" dashboard list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentProject {
    pub id: ProjectId,
    pub title: String,
    pub total_smells: usize,
    pub created_at: DateTime<Utc>,
}
