//! Exam set persistence and bank bookkeeping.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembler::GenerationConfig;
use crate::model::ExamModel;

/// Check that an exam set name is usable as a file-name prefix: non-empty,
/// with no path separators or parent references.
pub fn check_output_name(name: &str) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "exam name must not be empty");
    anyhow::ensure!(
        !name.contains(['/', '\\']) && name != "." && name != "..",
        "exam name '{name}' must be a plain file name without path separators"
    );
    Ok(())
}

/// The result of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSet {
    /// Unique exam set identifier.
    pub id: Uuid,
    /// When the exam set was generated.
    pub created_at: DateTime<Utc>,
    /// Output name used for exported files.
    pub name: String,
    /// ID of the bank the pool was drawn from.
    pub bank_id: String,
    /// Seed of the random source, for regenerating the same models.
    pub seed: u64,
    pub config: GenerationConfig,
    pub models: Vec<ExamModel>,
}

impl ExamSet {
    pub fn new(
        name: impl Into<String>,
        bank_id: impl Into<String>,
        seed: u64,
        config: GenerationConfig,
        models: Vec<ExamModel>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: name.into(),
            bank_id: bank_id.into(),
            seed,
            config,
            models,
        }
    }

    /// Pool question IDs, in the order of the first model.
    pub fn question_ids(&self) -> Vec<String> {
        self.models
            .first()
            .map(|m| m.questions.iter().map(|q| q.question_id.clone()).collect())
            .unwrap_or_default()
    }

    /// Find a model by its version label (case-insensitive).
    pub fn model(&self, version: &str) -> Option<&ExamModel> {
        self.models
            .iter()
            .find(|m| m.version_letter.eq_ignore_ascii_case(version.trim()))
    }

    /// Save the exam set as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize exam set")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write exam set to {}", path.display()))?;
        Ok(())
    }

    /// Load an exam set from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exam set from {}", path.display()))?;
        let exam: ExamSet =
            serde_json::from_str(&content).context("failed to parse exam set JSON")?;
        Ok(exam)
    }
}

/// Set the `used` date of the given questions in a bank file.
///
/// The file is edited in place so comments and layout survive. Returns the
/// number of questions updated.
pub fn mark_used(bank_path: &Path, ids: &[String], date: NaiveDate) -> Result<usize> {
    let content = std::fs::read_to_string(bank_path)
        .with_context(|| format!("failed to read bank file: {}", bank_path.display()))?;
    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse bank file: {}", bank_path.display()))?;

    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let stamp = date.format("%Y-%m-%d").to_string();
    let mut updated = 0;

    if let Some(questions) = doc
        .get_mut("questions")
        .and_then(|item| item.as_array_of_tables_mut())
    {
        for table in questions.iter_mut() {
            let matches = table
                .get("id")
                .and_then(|id| id.as_str())
                .is_some_and(|id| wanted.contains(id));
            if matches {
                table["used"] = toml_edit::value(stamp.as_str());
                updated += 1;
            }
        }
    }

    std::fs::write(bank_path, doc.to_string())
        .with_context(|| format!("failed to update bank file: {}", bank_path.display()))?;
    tracing::info!("marked {updated} question(s) as used on {stamp}");
    Ok(updated)
}
