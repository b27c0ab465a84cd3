//! The `examgen validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examgen_core::config::load_config_from;
use examgen_core::parser::{load_banks, validate_bank};

pub fn execute(bank_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let banks = load_banks(&bank_path)?;
    // Same anchoring rule the assembler applies.
    let anchors = config.generation().anchor_set();

    let mut total_warnings = 0;

    for bank in &banks {
        let anchored = bank
            .questions
            .iter()
            .filter(|q| anchors.is_anchored(&q.canonical_options()))
            .count();
        println!(
            "Bank: {} ({} questions, {} anchored)",
            bank.name,
            bank.questions.len(),
            anchored
        );

        let warnings = validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
