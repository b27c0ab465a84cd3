//! examgen configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assembler::GenerationConfig;

/// How the correct option is marked in solution renderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionMark {
    #[default]
    Asterisk,
    Bold,
    Both,
}

/// Top-level examgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamgenConfig {
    /// Number of exam models to generate.
    #[serde(default = "default_num_models")]
    pub num_models: u32,
    #[serde(default = "default_true")]
    pub shuffle_questions: bool,
    #[serde(default = "default_true")]
    pub shuffle_options: bool,
    /// Apply `anchor_phrases` in addition to the built-in anchors.
    #[serde(default = "default_true")]
    pub auto_anchor: bool,
    /// Extra anchor phrases.
    #[serde(default)]
    pub anchor_phrases: Vec<String>,
    /// Output directory for generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Points per correct answer, as printed in the answer key.
    #[serde(default = "default_points")]
    pub points: String,
    /// Penalty per wrong answer, as printed in the answer key.
    #[serde(default = "default_penalty")]
    pub penalty: String,
    #[serde(default)]
    pub solution_mark: SolutionMark,
}

fn default_num_models() -> u32 {
    2
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./examgen-output")
}
fn default_points() -> String {
    "1,00".to_string()
}
fn default_penalty() -> String {
    "0,33".to_string()
}

impl Default for ExamgenConfig {
    fn default() -> Self {
        Self {
            num_models: default_num_models(),
            shuffle_questions: true,
            shuffle_options: true,
            auto_anchor: true,
            anchor_phrases: Vec::new(),
            output_dir: default_output_dir(),
            points: default_points(),
            penalty: default_penalty(),
            solution_mark: SolutionMark::default(),
        }
    }
}

impl ExamgenConfig {
    /// The assembler settings carried by this configuration.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            shuffle_questions: self.shuffle_questions,
            shuffle_options: self.shuffle_options,
            anchor_phrases: self.anchor_phrases.clone(),
            auto_anchor: self.auto_anchor,
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examgen.toml` in the current directory
/// 2. `~/.config/examgen/config.toml`
///
/// Environment variable override: `EXAMGEN_OUTPUT_DIR`.
pub fn load_config() -> Result<ExamgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<ExamgenConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamgenConfig::default(),
    };

    if let Ok(dir) = std::env::var("EXAMGEN_OUTPUT_DIR") {
        if !dir.trim().is_empty() {
            config.output_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examgen"))
}
