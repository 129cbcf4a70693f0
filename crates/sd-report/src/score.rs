use sd_catalog::SmellCatalog;
use sd_types::Smell;
use serde::{Deserialize, Serialize};

/// Score of a report with no smells
pub const MAX_SCORE: f64 = 100.0;
/// Saturated score, reached once the smell impact exceeds the file budget
pub const MIN_SCORE: f64 = 1.0;
/// Impact each analyzed file can absorb
pub const IMPACT_PER_FILE: f64 = 3.0;

/// Tunables for the quality score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_impact_per_file")]
    pub impact_per_file: f64,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            impact_per_file: default_impact_per_file(),
            min_score: default_min_score(),
        }
    }
}

fn default_impact_per_file() -> f64 {
    IMPACT_PER_FILE
}

fn default_min_score() -> f64 {
    MIN_SCORE
}

/// Sum of the catalog weights of every smell
pub fn total_impact(smells: &[Smell], catalog: &SmellCatalog) -> f64 {
    smells
        .iter()
        .map(|s| catalog.severity_weight(&s.category))
        .sum()
}

/// Quality score in `[min_score, 100]`.
///
/// Each file absorbs `impact_per_file` worth of weighted smells; the score
/// is the share of that budget left unspent. No smells scores 100. An
/// overspent budget, or a report over zero files, saturates at `min_score`.
pub fn quality_score(
    smells: &[Smell],
    total_files: usize,
    catalog: &SmellCatalog,
    config: &ScoringConfig,
) -> f64 {
    if smells.is_empty() {
        return MAX_SCORE;
    }

    let base_score = total_files as f64 * config.impact_per_file;
    if base_score <= 0.0 {
        return config.min_score;
    }

    let impact = total_impact(smells, catalog);
    if impact > base_score {
        return config.min_score;
    }

    // any smell keeps the score strictly below MAX_SCORE, even when the
    // deficit is too small to survive rounding
    let score = MAX_SCORE - (impact / base_score) * MAX_SCORE;
    score.min(below_max()).max(config.min_score)
}

/// Largest score a report with at least one smell can reach
fn below_max() -> f64 {
    f64::from_bits(MAX_SCORE.to_bits() - 1)
}
