//! The `examgen key` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examgen_core::exam::ExamSet;

pub fn execute(exam_path: PathBuf, version: Option<String>) -> Result<()> {
    let exam = ExamSet::load_json(&exam_path)?;

    let models: Vec<_> = match &version {
        Some(v) => vec![exam
            .model(v)
            .ok_or_else(|| anyhow::anyhow!("version '{v}' not found in {}", exam_path.display()))?],
        None => exam.models.iter().collect(),
    };

    println!(
        "Exam set: {} (bank {}, seed {}, {} model(s))",
        exam.name,
        exam.bank_id,
        exam.seed,
        exam.models.len()
    );

    let mut table = Table::new();
    table.set_header(vec!["Version", "Question", "Answer", "Bank ID", "Anchored"]);
    for model in models {
        for q in &model.questions {
            table.add_row(vec![
                Cell::new(&model.version_letter),
                Cell::new(q.display_number),
                Cell::new(q.final_letter),
                Cell::new(&q.question_id),
                Cell::new(if q.anchored { "yes" } else { "" }),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
