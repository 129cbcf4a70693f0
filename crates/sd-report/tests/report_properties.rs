use sd_catalog::SmellCatalog;
use sd_report::{ReportBuilder, MAX_SCORE, MIN_SCORE};
use sd_types::Smell;

const CATEGORIES: &[&str] = &[
    "Long Method",
    "Feature Envy",
    "God Class",
    "Data Class",
    "Totally Unknown",
];

/// Deterministic smell lists of varying shape
fn generated_cases() -> Vec<(Vec<Smell>, usize)> {
    let mut cases = Vec::new();
    let mut seed: u64 = 0x5eed;
    for case in 0..200 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let count = (seed >> 33) as usize % 40;
        let total_files = case % 12;
        let mut smells = Vec::with_capacity(count);
        for i in 0..count {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let category = CATEGORIES[(seed >> 40) as usize % CATEGORIES.len()];
            let file = format!("F{}.java", (seed >> 20) as usize % 7);
            smells.push(Smell::new(category, file.clone(), format!("/src/{}", file), i as u32 + 1));
        }
        cases.push((smells, total_files));
    }
    cases
}

#[test]
fn test_score_stays_in_range() {
    let catalog = SmellCatalog::builtin();
    let builder = ReportBuilder::new(&catalog);

    for (smells, total_files) in generated_cases() {
        let empty = smells.is_empty();
        let report = builder.build(smells, total_files).unwrap();
        assert!(
            report.quality_score >= MIN_SCORE && report.quality_score <= MAX_SCORE,
            "score {} out of range",
            report.quality_score
        );
        assert_eq!(report.quality_score == MAX_SCORE, empty);
    }
}

#[test]
fn test_bucket_and_file_totals_match_smell_count() {
    let catalog = SmellCatalog::builtin();
    let builder = ReportBuilder::new(&catalog);

    for (smells, total_files) in generated_cases() {
        let report = builder.build(smells, total_files).unwrap();

        let bucket_sum: usize = report.chart_data.iter().map(|b| b.value).sum();
        let file_sum: usize = report.affected_files.iter().map(|f| f.total_occurrences).sum();

        assert_eq!(bucket_sum, report.total_smells);
        assert_eq!(file_sum, report.total_smells);
        assert_eq!(report.total_smells, report.smells.len());
        assert_eq!(report.affected_file_count, report.affected_files.len());
        assert!(report.chart_data.iter().all(|b| b.value >= 1));
    }
}

#[test]
fn test_bucket_categories_are_unique() {
    let catalog = SmellCatalog::builtin();
    let builder = ReportBuilder::new(&catalog);

    for (smells, total_files) in generated_cases() {
        let report = builder.build(smells, total_files).unwrap();
        let mut seen = std::collections::HashSet::new();
        for bucket in &report.chart_data {
            assert!(seen.insert(bucket.category.clone()), "duplicate {}", bucket.category);
        }
    }
}

#[test]
fn test_report_serializes_camel_case() {
    let catalog = SmellCatalog::builtin();
    let report = ReportBuilder::new(&catalog)
        .build(vec![Smell::new("Long Method", "A.java", "/src/A.java", 1)], 1)
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["totalSmells"], 1);
    assert_eq!(json["affectedFileCount"], 1);
    assert_eq!(json["chartData"][0]["category"], "Long Method");
    assert_eq!(json["smells"][0]["lineNumber"], 1);
    assert!(json["generatedAt"].is_string());
}
