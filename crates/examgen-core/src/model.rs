//! Core data model types for examgen.
//!
//! These are the types the whole system uses to represent bank questions and
//! the exam models assembled from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of option slots every question is laid out with.
pub const OPTION_COUNT: usize = 4;

const VERSION_LETTERS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// An answer letter, indexing the four option slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; OPTION_COUNT] = [Letter::A, Letter::B, Letter::C, Letter::D];

    /// Zero-based slot index (A = 0).
    pub fn index(self) -> usize {
        match self {
            Letter::A => 0,
            Letter::B => 1,
            Letter::C => 2,
            Letter::D => 3,
        }
    }

    /// The letter for a slot index, if it is one of the four slots.
    pub fn from_index(index: usize) -> Option<Letter> {
        Letter::ALL.get(index).copied()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Letter::A => write!(f, "A"),
            Letter::B => write!(f, "B"),
            Letter::C => write!(f, "C"),
            Letter::D => write!(f, "D"),
        }
    }
}

impl FromStr for Letter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Letter::A),
            "B" => Ok(Letter::B),
            "C" => Ok(Letter::C),
            "D" => Ok(Letter::D),
            other => Err(format!("invalid answer letter: '{other}'")),
        }
    }
}

/// A multiple-choice question from the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier, stable across the bank.
    pub id: String,
    /// Question text. May embed math markup; never interpreted here.
    pub statement: String,
    /// Option texts in canonical order (index 0 is option A).
    #[serde(default)]
    pub options: Vec<String>,
    /// The correct option in canonical order.
    pub correct: Letter,
    #[serde(default)]
    pub block: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    /// Date the question last appeared in an exported exam, empty if never.
    #[serde(default)]
    pub used: String,
    #[serde(default)]
    pub notes: String,
}

impl Question {
    /// Option text at a slot; a missing slot reads as an empty string.
    pub fn option(&self, index: usize) -> &str {
        self.options.get(index).map(String::as_str).unwrap_or("")
    }

    /// The text of the correct option in canonical order.
    pub fn correct_text(&self) -> &str {
        self.option(self.correct.index())
    }

    /// The four option slots in canonical order, padding missing slots.
    pub fn canonical_options(&self) -> [String; OPTION_COUNT] {
        std::array::from_fn(|i| self.option(i).to_string())
    }

    /// Returns `true` if the question has never been exported.
    pub fn is_unused(&self) -> bool {
        self.used.trim().is_empty()
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Look up a question by ID.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// One question as it appears in a specific exam model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelQuestion {
    /// ID of the bank question this entry was built from.
    pub question_id: String,
    pub statement: String,
    pub block: String,
    pub topic: String,
    pub difficulty: String,
    /// The correct letter in the bank's canonical order.
    pub original_correct: Letter,
    /// Options in the order printed in this model.
    pub final_options: [String; OPTION_COUNT],
    /// The correct letter in `final_options` order.
    pub final_letter: Letter,
    /// 1-based position within the model.
    pub display_number: u32,
    /// Whether option order was pinned by an anchor phrase.
    #[serde(default)]
    pub anchored: bool,
}

impl ModelQuestion {
    /// The option text printed at `final_letter`.
    pub fn final_correct_text(&self) -> &str {
        &self.final_options[self.final_letter.index()]
    }
}

/// One independently shuffled version of the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamModel {
    /// 1-based model number.
    pub model_number: u32,
    /// Version label printed on the exam ("A".."F", then the model number).
    pub version_letter: String,
    pub questions: Vec<ModelQuestion>,
}

/// Version label for a 1-based model number.
///
/// Models 1 to 6 are labelled `A` to `F`; later models fall back to their
/// decimal number.
pub fn version_letter(model_number: u32) -> String {
    match model_number
        .checked_sub(1)
        .and_then(|i| VERSION_LETTERS.get(i as usize))
    {
        Some(letter) => (*letter).to_string(),
        None => model_number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct: Letter) -> Question {
        Question {
            id: "Q1".into(),
            statement: "What?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct,
            block: String::new(),
            topic: String::new(),
            difficulty: String::new(),
            used: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn letter_display_and_parse() {
        assert_eq!(Letter::C.to_string(), "C");
        assert_eq!("b".parse::<Letter>().unwrap(), Letter::B);
        assert_eq!(" D ".parse::<Letter>().unwrap(), Letter::D);
        assert!("E".parse::<Letter>().is_err());
        assert!("".parse::<Letter>().is_err());
    }

    #[test]
    fn letter_index_mapping() {
        for (i, letter) in Letter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), i);
            assert_eq!(Letter::from_index(i), Some(*letter));
        }
        assert_eq!(Letter::from_index(4), None);
    }

    #[test]
    fn version_letters() {
        let labels: Vec<String> = (1..=6).map(version_letter).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D", "E", "F"]);
        assert_eq!(version_letter(7), "7");
        assert_eq!(version_letter(12), "12");
        assert_eq!(version_letter(0), "0");
    }

    #[test]
    fn missing_option_slots_read_empty() {
        let q = question(&["one", "two", "three"], Letter::D);
        assert_eq!(q.option(3), "");
        assert_eq!(q.correct_text(), "");
        assert_eq!(q.canonical_options()[2], "three");
        assert_eq!(q.canonical_options()[3], "");
    }

    #[test]
    fn question_serde_defaults() {
        let json = r#"{"id":"Q9","statement":"S","options":["a","b","c","d"],"correct":"C"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct, Letter::C);
        assert!(q.is_unused());
        assert!(q.block.is_empty());
    }
}
