//! Pool selection and ordering.
//!
//! Builds the pool handed to the assembler: manually fixed questions topped
//! up at random from a recipe of per block/topic/difficulty counts, then put
//! into one of several base orders.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionBank};

/// How many questions to draw for one block/topic/difficulty combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub block: String,
    /// `None` matches any topic in the block.
    #[serde(default)]
    pub topic: Option<String>,
    pub difficulty: String,
    pub count: usize,
}

impl RecipeEntry {
    fn matches(&self, question: &Question) -> bool {
        question.block == self.block
            && self.topic.as_ref().map_or(true, |t| *t == question.topic)
            && question.difficulty.to_lowercase() == self.difficulty.to_lowercase()
    }

    fn label(&self) -> String {
        match &self.topic {
            Some(topic) => format!("{} topic {} {}", self.block, topic, self.difficulty),
            None => format!("{} (any topic) {}", self.block, self.difficulty),
        }
    }
}

/// A set of random draws used to fill an exam pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub entries: Vec<RecipeEntry>,
    /// Restricts which questions random draws may pick.
    #[serde(default)]
    pub usage: UsageFilter,
}

impl Recipe {
    /// Load a recipe from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse recipe: {}", path.display()))
    }

    /// Total number of questions requested.
    pub fn requested(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// Filter on when a question was last exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageFilter {
    #[default]
    Any,
    Never,
    Used,
    /// Last used more than this many months (30-day) ago.
    OlderThanMonths(u32),
}

impl UsageFilter {
    pub fn accepts(&self, question: &Question, today: NaiveDate) -> bool {
        match self {
            UsageFilter::Any => true,
            UsageFilter::Never => question.is_unused(),
            UsageFilter::Used => !question.is_unused(),
            UsageFilter::OlderThanMonths(months) => {
                // A cutoff before the earliest representable date accepts nothing.
                let Some(cutoff) =
                    today.checked_sub_signed(Duration::days(i64::from(*months) * 30))
                else {
                    return false;
                };
                parse_used_date(&question.used).is_some_and(|used| used < cutoff)
            }
        }
    }
}

impl fmt::Display for UsageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageFilter::Any => write!(f, "any"),
            UsageFilter::Never => write!(f, "never"),
            UsageFilter::Used => write!(f, "used"),
            UsageFilter::OlderThanMonths(n) => write!(f, "older-than:{n}"),
        }
    }
}

impl FromStr for UsageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "any" | "all" => Ok(UsageFilter::Any),
            "never" | "unused" => Ok(UsageFilter::Never),
            "used" => Ok(UsageFilter::Used),
            other => other
                .strip_prefix("older-than:")
                .and_then(|n| n.parse().ok())
                .map(UsageFilter::OlderThanMonths)
                .ok_or_else(|| format!("unknown usage filter: {other}")),
        }
    }
}

/// Parse the date part of a `used` field (`YYYY-MM-DD` or `DD/MM/YYYY`,
/// optionally followed by a time).
fn parse_used_date(value: &str) -> Option<NaiveDate> {
    let date = value.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%d/%m/%Y"))
        .ok()
}

/// The result of pool selection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected question IDs: fixed ones first, then recipe draws.
    pub ids: Vec<String>,
    /// Unknown IDs and recipe shortfalls.
    pub warnings: Vec<String>,
}

impl Selection {
    /// Resolve the selected IDs against the bank, in selection order.
    pub fn questions(&self, bank: &QuestionBank) -> Vec<Question> {
        self.ids.iter().filter_map(|id| bank.get(id)).cloned().collect()
    }
}

/// Select a pool: the fixed IDs plus random draws for each recipe entry.
///
/// Fixed questions already matching an entry count towards it. When an entry
/// cannot be filled, the shortfall is reported in `warnings`.
pub fn select_pool<R: Rng + ?Sized>(
    bank: &QuestionBank,
    fixed_ids: &[String],
    recipe: &Recipe,
    today: NaiveDate,
    rng: &mut R,
) -> Selection {
    let mut selection = Selection::default();
    let mut taken: HashSet<String> = HashSet::new();

    for id in fixed_ids {
        if bank.get(id).is_none() {
            selection.warnings.push(format!("unknown question ID: {id}"));
            continue;
        }
        if taken.insert(id.clone()) {
            selection.ids.push(id.clone());
        }
    }

    let fixed: Vec<&Question> = selection
        .ids
        .iter()
        .filter_map(|id| bank.get(id))
        .collect();

    for entry in &recipe.entries {
        if entry.count == 0 {
            continue;
        }

        let already_fixed = fixed.iter().filter(|q| entry.matches(q)).count();
        let candidates: Vec<&str> = bank
            .questions
            .iter()
            .filter(|q| {
                entry.matches(q) && !taken.contains(&q.id) && recipe.usage.accepts(q, today)
            })
            .map(|q| q.id.as_str())
            .collect();

        let needed = entry.count.saturating_sub(already_fixed);
        let added = needed.min(candidates.len());
        let picked: Vec<String> = candidates
            .choose_multiple(rng, added)
            .map(|id| id.to_string())
            .collect();

        if added < needed {
            selection.warnings.push(format!(
                "{}: requested {}, fixed {}, added {}",
                entry.label(),
                entry.count,
                already_fixed,
                added
            ));
        }

        for id in picked {
            taken.insert(id.clone());
            selection.ids.push(id);
        }
    }

    for warning in &selection.warnings {
        tracing::warn!("{warning}");
    }

    selection
}

/// Base order of the pool before per-model shuffling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolOrder {
    /// Blocks in natural order, questions shuffled within each block.
    #[default]
    ByBlock,
    /// Fully random.
    Random,
    /// Selection order.
    Manual,
    /// Natural order of question IDs.
    ById,
}

impl fmt::Display for PoolOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolOrder::ByBlock => write!(f, "by-block"),
            PoolOrder::Random => write!(f, "random"),
            PoolOrder::Manual => write!(f, "manual"),
            PoolOrder::ById => write!(f, "by-id"),
        }
    }
}

impl FromStr for PoolOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "by-block" | "block" => Ok(PoolOrder::ByBlock),
            "random" => Ok(PoolOrder::Random),
            "manual" => Ok(PoolOrder::Manual),
            "by-id" | "id" => Ok(PoolOrder::ById),
            other => Err(format!("unknown pool order: {other}")),
        }
    }
}

/// Put the pool into the requested base order.
pub fn order_pool<R: Rng + ?Sized>(
    mut pool: Vec<Question>,
    order: PoolOrder,
    rng: &mut R,
) -> Vec<Question> {
    match order {
        PoolOrder::Manual => {}
        PoolOrder::Random => pool.shuffle(rng),
        PoolOrder::ById => pool.sort_by_cached_key(|q| natural_key(&q.id)),
        PoolOrder::ByBlock => {
            pool.sort_by_cached_key(|q| natural_key(&q.block));
            let mut start = 0;
            while start < pool.len() {
                let block = pool[start].block.clone();
                let end = pool[start..]
                    .iter()
                    .position(|q| q.block != block)
                    .map_or(pool.len(), |offset| start + offset);
                pool[start..end].shuffle(rng);
                start = end;
            }
        }
    }
    pool
}

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyPart {
    Number(u64),
    Text(String),
}

/// Sort key that compares digit runs numerically, so `Q2` sorts before `Q10`.
pub fn natural_key(s: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        let digits = c.is_ascii_digit();
        let mut run = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() != digits {
                break;
            }
            run.push(c);
            chars.next();
        }
        match run.parse::<u64>() {
            Ok(n) if digits => parts.push(KeyPart::Number(n)),
            _ => parts.push(KeyPart::Text(run.to_lowercase())),
        }
    }
    parts
}
