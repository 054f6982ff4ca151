use serde::{Deserialize, Serialize};

use cbp_reference::DEFAULT_REFERENCE_GENOME;

/// Variant classifications that are not loaded by default.
pub const DEFAULT_SKIPPED_CLASSIFICATIONS: &[&str] = &[
    "Silent", "Intron", "3'UTR", "3'Flank", "5'UTR", "5'Flank", "IGR", "RNA",
];

/// Knobs of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Keep scanning files whose header is invalid instead of aborting them.
    pub relaxed_mode: bool,
    /// Escalate selected mutation-file warnings to errors.
    pub strict_maf_checks: bool,
    /// Values listed in summary findings before truncating with "...".
    pub max_reported_values: usize,
    /// `Variant_Classification` values that are filtered out on import.
    pub skip_variant_classifications: Vec<String>,
    /// Build used when `meta_study` does not declare `reference_genome`.
    pub reference_genome: String,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            relaxed_mode: false,
            strict_maf_checks: false,
            max_reported_values: 3,
            skip_variant_classifications: DEFAULT_SKIPPED_CLASSIFICATIONS
                .iter()
                .map(|value| (*value).to_string())
                .collect(),
            reference_genome: DEFAULT_REFERENCE_GENOME.to_string(),
        }
    }
}

impl ValidationOptions {
    #[must_use]
    pub fn with_relaxed_mode(mut self, enable: bool) -> Self {
        self.relaxed_mode = enable;
        self
    }

    #[must_use]
    pub fn with_strict_maf_checks(mut self, enable: bool) -> Self {
        self.strict_maf_checks = enable;
        self
    }

    pub fn skips_classification(&self, classification: &str) -> bool {
        self.skip_variant_classifications
            .iter()
            .any(|skipped| skipped == classification)
    }

    /// Join values for a message, keeping at most `max_reported_values`.
    pub fn summarize<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> String {
        let values: Vec<&str> = values.into_iter().collect();
        let limit = self.max_reported_values.max(1);
        if values.len() <= limit {
            values.join(", ")
        } else {
            format!("{}, (...)", values[..limit].join(", "))
        }
    }
}
