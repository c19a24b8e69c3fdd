//! Analysis report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Analysis;
use crate::recommend::RecommendationRules;

/// A complete, timestamped analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the data source the inputs came from.
    pub source: String,
    /// Thresholds the recommendations were produced with.
    pub rules: RecommendationRules,
    #[serde(flatten)]
    pub analysis: Analysis,
}

impl AnalysisReport {
    pub fn new(source: &str, rules: RecommendationRules, analysis: Analysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.to_string(),
            rules,
            analysis,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalysisReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
