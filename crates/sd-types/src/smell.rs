use serde::{Deserialize, Serialize};

/// A single finding reported by the smell analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Smell {
    #[serde(alias = "smellType")]
    pub category: String,
    pub file_name: String,
    pub file_path: String,
    pub line_number: u32,
}

impl Smell {
    pub fn new(
        category: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self {
            category: category.into(),
            file_name: file_name.into(),
            file_path: file_path.into(),
            line_number,
        }
    }
}

/// Per-file smell count within one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedFile {
    pub file_name: String,
    pub total_occurrences: usize,
}

/// One slice of the category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBucket {
    #[serde(alias = "codeSmellName")]
    pub category: String,
    pub value: usize,
    pub color: String,
}
