//! The `examgen init` command.

use std::path::Path;

use anyhow::{Context, Result};

const STARTER_FILES: &[(&str, &str)] = &[
    ("examgen.toml", SAMPLE_CONFIG),
    ("banks/example.toml", EXAMPLE_BANK),
];

pub fn execute() -> Result<()> {
    for (path, content) in STARTER_FILES {
        write_starter(Path::new(path), content)?;
    }

    println!("\nNext steps:");
    println!("  1. Add your questions to banks/example.toml");
    println!("  2. Run: examgen validate --bank banks/example.toml");
    println!("  3. Run: examgen generate --bank banks/example.toml --models 4");

    Ok(())
}

/// Write a starter file unless the user already has one.
fn write_starter(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examgen configuration

num_models = 2
shuffle_questions = true
shuffle_options = true

# Extra phrases that keep a question's options in their original order.
auto_anchor = true
anchor_phrases = []

output_dir = "./examgen-output"

# Answer key scoring columns.
points = "1,00"
penalty = "0,33"

# How solutions mark the correct option: asterisk, bold, both.
solution_mark = "asterisk"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small example bank to get started"

[[questions]]
id = "EX_01_01_01"
statement = "Which planet is closest to the Sun?"
options = ["Venus", "Mercury", "Earth", "Mars"]
correct = "B"
block = "01"
topic = "1"
difficulty = "Easy"

[[questions]]
id = "EX_01_01_02"
statement = "What is the value of $2^{10}$?"
options = ["512", "1000", "1024", "2048"]
correct = "C"
block = "01"
topic = "1"
difficulty = "Easy"

[[questions]]
id = "EX_01_02_01"
statement = "Which of these are prime numbers?"
options = ["2", "3", "5", "All of the above"]
correct = "D"
block = "01"
topic = "2"
difficulty = "Medium"
"#;
