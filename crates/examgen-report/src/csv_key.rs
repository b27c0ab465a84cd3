//! CSV answer key and metadata output.
//!
//! Both files use `;` as delimiter and start with a UTF-8 BOM so spreadsheet
//! tools and optical answer-sheet readers pick up the encoding.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use examgen_core::exam::{check_output_name, ExamSet};
use examgen_core::model::ExamModel;

const BOM: &str = "\u{feff}";
const STATEMENT_PREVIEW_CHARS: usize = 50;

/// Scoring columns printed in the answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScoring {
    pub points: String,
    pub penalty: String,
}

impl Default for KeyScoring {
    fn default() -> Self {
        Self {
            points: "1,00".into(),
            penalty: "0,33".into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct KeyRow<'a> {
    #[serde(rename = "Question")]
    question: u32,
    #[serde(rename = "Version")]
    version: &'a str,
    #[serde(rename = "Answer")]
    answer: String,
    #[serde(rename = "Points")]
    points: &'a str,
    #[serde(rename = "Link")]
    link: &'a str,
    #[serde(rename = "Penalty")]
    penalty: &'a str,
    #[serde(rename = "Weight")]
    weight: &'a str,
    #[serde(rename = "MaxOpenPoints")]
    max_open_points: &'a str,
}

#[derive(Debug, Serialize)]
struct MetadataRow<'a> {
    #[serde(rename = "Model")]
    model: u32,
    #[serde(rename = "Version")]
    version: &'a str,
    #[serde(rename = "ExamNumber")]
    exam_number: u32,
    #[serde(rename = "QuestionId")]
    question_id: &'a str,
    #[serde(rename = "Block")]
    block: &'a str,
    #[serde(rename = "Topic")]
    topic: &'a str,
    #[serde(rename = "Difficulty")]
    difficulty: &'a str,
    #[serde(rename = "StatementStart")]
    statement_start: String,
}

fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(BOM.as_bytes().to_vec());
    for row in rows {
        writer.serialize(row).context("failed to write CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e.error()))
}

/// Answer key: one row per question per model.
pub fn answer_key_csv(models: &[ExamModel], scoring: &KeyScoring) -> Result<Vec<u8>> {
    let rows = models.iter().flat_map(|m| {
        m.questions.iter().map(move |q| KeyRow {
            question: q.display_number,
            version: &m.version_letter,
            answer: q.final_letter.to_string(),
            points: &scoring.points,
            link: "0",
            penalty: &scoring.penalty,
            weight: "0,00",
            max_open_points: "0,00",
        })
    });
    write_rows(rows)
}

/// Question metadata: where each bank question landed in each model.
pub fn metadata_csv(models: &[ExamModel]) -> Result<Vec<u8>> {
    let rows = models.iter().flat_map(|m| {
        m.questions.iter().map(move |q| MetadataRow {
            model: m.model_number,
            version: &m.version_letter,
            exam_number: q.display_number,
            question_id: &q.question_id,
            block: &q.block,
            topic: &q.topic,
            difficulty: &q.difficulty,
            statement_start: q.statement.chars().take(STATEMENT_PREVIEW_CHARS).collect(),
        })
    });
    write_rows(rows)
}

/// Write `{name}_KEY.csv` and `{name}_METADATA.csv` into `dir`.
pub fn write_csv_reports(exam: &ExamSet, dir: &Path, scoring: &KeyScoring) -> Result<Vec<PathBuf>> {
    check_output_name(&exam.name)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let key_path = dir.join(format!("{}_KEY.csv", exam.name));
    std::fs::write(&key_path, answer_key_csv(&exam.models, scoring)?)
        .with_context(|| format!("failed to write {}", key_path.display()))?;

    let meta_path = dir.join(format!("{}_METADATA.csv", exam.name));
    std::fs::write(&meta_path, metadata_csv(&exam.models)?)
        .with_context(|| format!("failed to write {}", meta_path.display()))?;

    Ok(vec![key_path, meta_path])
}
