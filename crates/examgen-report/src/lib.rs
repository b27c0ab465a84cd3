//! examgen-report: Answer keys and exam renderings.
//!
//! Renderers only read assembled exam models: CSV answer keys and question
//! metadata for the instructor, and Markdown exams with an optional
//! solutions mode.

pub mod csv_key;
pub mod markdown;

pub use csv_key::{write_csv_reports, KeyScoring};
pub use markdown::{render_model, write_markdown_reports, RenderMode};
