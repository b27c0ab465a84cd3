//! examgen-core: Question bank model, exam assembly, and answer-key remapping.
//!
//! This crate defines the question and exam data model, the assembler that
//! turns a pool of questions into independently shuffled exam models, and the
//! bank parsing, selection, and persistence helpers the CLI builds on.

pub mod anchor;
pub mod assembler;
pub mod config;
pub mod error;
pub mod exam;
pub mod model;
pub mod parser;
pub mod selection;

pub use assembler::{assemble, GenerationConfig};
pub use error::AssembleError;
pub use model::{ExamModel, Letter, ModelQuestion, Question, QuestionBank};
