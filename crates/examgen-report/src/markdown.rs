//! Markdown rendering of exam models, with a solutions mode.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use examgen_core::config::SolutionMark;
use examgen_core::exam::{check_output_name, ExamSet};
use examgen_core::model::{ExamModel, Letter};

/// Whether to render the plain exam or the marked solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Exam,
    Solutions(SolutionMark),
}

fn mark_option(text: &str, mark: SolutionMark) -> String {
    match mark {
        SolutionMark::Asterisk => format!("{text} (*)"),
        SolutionMark::Bold => format!("**{text}**"),
        SolutionMark::Both => format!("**{text}** (*)"),
    }
}

/// Render one exam model as Markdown.
pub fn render_model(model: &ExamModel, title: &str, mode: RenderMode) -> String {
    let mut md = String::new();

    let suffix = match mode {
        RenderMode::Exam => "",
        RenderMode::Solutions(_) => " (solutions)",
    };
    md.push_str(&format!(
        "# {title} - Version {}{suffix}\n\n",
        model.version_letter
    ));

    for question in &model.questions {
        md.push_str(&format!(
            "**{}.** {}\n\n",
            question.display_number, question.statement
        ));
        for (letter, text) in Letter::ALL.iter().zip(&question.final_options) {
            let rendered = match mode {
                RenderMode::Solutions(mark) if *letter == question.final_letter => {
                    mark_option(text, mark)
                }
                _ => text.clone(),
            };
            md.push_str(&format!("- {letter}) {rendered}\n"));
        }
        md.push('\n');
    }

    if let RenderMode::Solutions(_) = mode {
        md.push_str("## Answer key\n\n| Question | Answer |\n|---|---|\n");
        for question in &model.questions {
            md.push_str(&format!(
                "| {} | {} |\n",
                question.display_number, question.final_letter
            ));
        }
    }

    md
}

/// Write `{name}_{version}.md` and `{name}_{version}_SOLUTIONS.md` for every
/// model into `dir`.
pub fn write_markdown_reports(
    exam: &ExamSet,
    dir: &Path,
    mark: SolutionMark,
) -> Result<Vec<PathBuf>> {
    check_output_name(&exam.name)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for model in &exam.models {
        for (mode, suffix) in [
            (RenderMode::Exam, ""),
            (RenderMode::Solutions(mark), "_SOLUTIONS"),
        ] {
            let path = dir.join(format!("{}_{}{suffix}.md", exam.name, model.version_letter));
            std::fs::write(&path, render_model(model, &exam.name, mode))
                .with_context(|| format!("failed to write {}", path.display()))?;
            paths.push(path);
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use examgen_core::assembler::GenerationConfig;
    use examgen_core::model::ModelQuestion;

    fn make_model() -> ExamModel {
        ExamModel {
            model_number: 2,
            version_letter: "B".into(),
            questions: vec![ModelQuestion {
                question_id: "Q1".into(),
                statement: "Which is a noble gas?".into(),
                block: String::new(),
                topic: String::new(),
                difficulty: String::new(),
                original_correct: Letter::A,
                final_options: ["Oxygen", "Neon", "Iron", "Carbon"].map(String::from),
                final_letter: Letter::B,
                display_number: 1,
                anchored: false,
            }],
        }
    }

    #[test]
    fn exam_mode_has_no_marks() {
        let md = render_model(&make_model(), "Chemistry", RenderMode::Exam);
        assert!(md.starts_with("# Chemistry - Version B\n"));
        assert!(md.contains("**1.** Which is a noble gas?"));
        assert!(md.contains("- B) Neon\n"));
        assert!(!md.contains("(*)"));
        assert!(!md.contains("Answer key"));
    }

    #[test]
    fn solutions_mark_the_final_letter() {
        let md = render_model(
            &make_model(),
            "Chemistry",
            RenderMode::Solutions(SolutionMark::Asterisk),
        );
        assert!(md.contains("- B) Neon (*)\n"));
        assert!(md.contains("- A) Oxygen\n"));
        assert!(md.contains("| 1 | B |"));

        let bold = render_model(&make_model(), "Chemistry", RenderMode::Solutions(SolutionMark::Both));
        assert!(bold.contains("- B) **Neon** (*)\n"));
    }

    #[test]
    fn writes_exam_and_solutions_per_model() {
        let dir = tempfile::tempdir().unwrap();
        let exam = ExamSet::new("quiz", "bank", 7, GenerationConfig::default(), vec![make_model()]);
        let paths = write_markdown_reports(&exam, dir.path(), SolutionMark::Bold).unwrap();
        assert_eq!(paths.len(), 2);
        let solutions = std::fs::read_to_string(dir.path().join("quiz_B_SOLUTIONS.md")).unwrap();
        assert!(solutions.contains("**Neon**"));
    }
}
