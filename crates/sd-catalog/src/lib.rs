use indexmap::IndexMap;
use sd_types::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight used for categories the catalog has never seen
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Coarse severity used to seed the built-in weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Low => 0.5,
            Severity::Medium => 1.0,
            Severity::High => 1.5,
            Severity::Critical => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

const BUILTIN: &[(&str, Severity, &str)] = &[
    ("Long Method", Severity::Medium, "#E76F51"),
    ("Large Class", Severity::High, "#F4A261"),
    ("God Class", Severity::Critical, "#9B2226"),
    ("God Object", Severity::Critical, "#AE2012"),
    ("Feature Envy", Severity::Medium, "#2A9D8F"),
    ("Data Class", Severity::Low, "#8AB17D"),
    ("Long Parameter List", Severity::Medium, "#E9C46A"),
    ("Duplicate Code", Severity::High, "#264653"),
    ("Shotgun Surgery", Severity::High, "#BB3E03"),
    ("Switch Statements", Severity::Low, "#94D2BD"),
    ("Lazy Class", Severity::Low, "#0A9396"),
    ("Dead Code", Severity::Low, "#6C757D"),
    ("Primitive Obsession", Severity::Low, "#CA6702"),
    ("Message Chains", Severity::Medium, "#005F73"),
    ("Refused Bequest", Severity::Medium, "#7209B7"),
    ("Data Clumps", Severity::Low, "#B5838D"),
    ("Middle Man", Severity::Low, "#6D6875"),
    ("Speculative Generality", Severity::Low, "#457B9D"),
    ("Complex Method", Severity::High, "#D62828"),
];

/// Scoring weight and presentation color for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmellInfo {
    pub weight: f64,
    pub color: String,
}

/// Partial entry supplied by configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogOverride {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Static lookup from smell category to weight and color.
///
/// Colors never take part in scoring or grouping.
#[derive(Debug, Clone)]
pub struct SmellCatalog {
    entries: IndexMap<String, SmellInfo>,
    default_weight: f64,
}

impl Default for SmellCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SmellCatalog {
    /// Catalog with no known categories
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
            default_weight: DEFAULT_WEIGHT,
        }
    }

    /// Catalog seeded with the well-known smell categories
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, severity, color)| {
                (
                    name.to_string(),
                    SmellInfo {
                        weight: severity.weight(),
                        color: color.to_string(),
                    },
                )
            })
            .collect();

        Self {
            entries,
            default_weight: DEFAULT_WEIGHT,
        }
    }

    pub fn with_default_weight(mut self, weight: f64) -> EngineResult<Self> {
        validate_weight("<default>", weight)?;
        self.default_weight = weight;
        Ok(self)
    }

    /// Add or replace a category entry
    pub fn insert(&mut self, category: impl Into<String>, info: SmellInfo) -> EngineResult<()> {
        let category = category.into();
        if category.is_empty() {
            return Err(EngineError::ConfigError(
                "catalog category must not be empty".to_string(),
            ));
        }
        validate_weight(&category, info.weight)?;
        validate_color(&category, &info.color)?;
        self.entries.insert(category, info);
        Ok(())
    }

    /// Merge configured overrides over existing entries.
    ///
    /// Unknown categories are added, taking the default weight and the
    /// fallback color for any field the override leaves out.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a CatalogOverride)>,
    {
        for (category, over) in overrides {
            let base = self.entries.get(category).cloned().unwrap_or_else(|| SmellInfo {
                weight: self.default_weight,
                color: fallback_color(category),
            });
            let info = SmellInfo {
                weight: over.weight.unwrap_or(base.weight),
                color: over.color.clone().unwrap_or(base.color),
            };
            debug!(category = %category, weight = info.weight, "Catalog override applied");
            self.insert(category.clone(), info)?;
        }
        Ok(self)
    }

    pub fn info(&self, category: &str) -> Option<&SmellInfo> {
        self.entries.get(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    /// Scoring weight; always positive
    pub fn severity_weight(&self, category: &str) -> f64 {
        self.entries
            .get(category)
            .map(|info| info.weight)
            .unwrap_or(self.default_weight)
    }

    /// Presentation color, stable for a given category
    pub fn display_color(&self, category: &str) -> String {
        match self.entries.get(category) {
            Some(info) => info.color.clone(),
            None => fallback_color(category),
        }
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash-derived `#RRGGBB` color for categories outside the catalog
pub fn fallback_color(category: &str) -> String {
    // FNV-1a, 32 bit
    let mut hash: u32 = 0x811c_9dc5;
    for byte in category.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    format!("#{:06X}", hash & 0x00FF_FFFF)
}

fn validate_weight(category: &str, weight: f64) -> EngineResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(EngineError::ConfigError(format!(
            "weight for '{}' must be a positive number, got {}",
            category, weight
        )))
    }
}

fn validate_color(category: &str, color: &str) -> EngineResult<()> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(EngineError::ConfigError(format!(
            "color for '{}' must look like #RRGGBB, got '{}'",
            category, color
        )))
    }
}
