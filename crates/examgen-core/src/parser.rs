//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Letter, Question, QuestionBank, OPTION_COUNT};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    statement: String,
    #[serde(default)]
    options: Vec<String>,
    correct: String,
    #[serde(default)]
    block: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    used: String,
    #[serde(default)]
    notes: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let correct: Letter = q
                .correct
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;

            Ok(Question {
                id: q.id,
                statement: q.statement,
                options: q.options,
                correct,
                block: q.block,
                topic: q.topic,
                difficulty: q.difficulty,
                used: q.used,
                notes: q.notes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a single bank file, or every bank in a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_bank(path)?])
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a single question for data-quality issues.
pub fn validate_question(question: &Question) -> Vec<String> {
    let mut warnings = Vec::new();

    if question.statement.trim().is_empty() {
        warnings.push("statement is empty".to_string());
    }

    let count = question.options.len();
    if count < OPTION_COUNT {
        warnings.push(format!("only {count} options ({OPTION_COUNT} required)"));
    } else if count > OPTION_COUNT {
        warnings.push(format!(
            "{count} options, only the first {OPTION_COUNT} are used"
        ));
    }

    for (i, option) in question.options.iter().take(OPTION_COUNT).enumerate() {
        if option.trim().is_empty() {
            if let Some(letter) = Letter::from_index(i) {
                warnings.push(format!("option {letter} is empty"));
            }
        }
    }

    if question.correct_text().trim().is_empty() {
        warnings.push(format!("correct option {} is empty", question.correct));
    }

    let mut seen = HashSet::new();
    let has_duplicates = question
        .options
        .iter()
        .take(OPTION_COUNT)
        .map(|o| o.trim().to_lowercase())
        .filter(|o| !o.is_empty())
        .any(|o| !seen.insert(o));
    if has_duplicates {
        warnings.push("duplicate options".to_string());
    }

    warnings
}

/// Validate a bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &bank.questions {
        for message in validate_question(question) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message,
            });
        }
    }

    warnings
}
