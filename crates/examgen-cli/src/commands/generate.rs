//! The `examgen generate` command.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use examgen_core::anchor::AnchorSet;
use examgen_core::assembler::assemble;
use examgen_core::config::load_config_from;
use examgen_core::exam::{check_output_name, mark_used, ExamSet};
use examgen_core::model::{ExamModel, Letter};
use examgen_core::parser::{parse_bank, validate_bank};
use examgen_core::selection::{order_pool, select_pool, PoolOrder, Recipe, Selection};
use examgen_report::{write_csv_reports, write_markdown_reports, KeyScoring};

use crate::GenerateArgs;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let bank = parse_bank(&args.bank)?;

    let warnings = validate_bank(&bank);
    if !warnings.is_empty() {
        eprintln!(
            "Warning: {} data-quality issue(s) in {}. Run `examgen validate` for details.",
            warnings.len(),
            args.bank.display()
        );
    }

    let order: PoolOrder = args
        .order
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let num_models = args.models.unwrap_or(config.num_models);
    anyhow::ensure!(num_models >= 1, "at least one model must be requested");

    // One seeded source drives selection, ordering, and assembly so a run
    // can be regenerated from its seed.
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let today = chrono::Local::now().date_naive();

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("exam_{}", today.format("%Y-%m-%d")));
    check_output_name(&name)?;

    let fixed_ids: Vec<String> = args
        .ids
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let selection = match &args.recipe {
        Some(path) => {
            let recipe = Recipe::load(path)?;
            select_pool(&bank, &fixed_ids, &recipe, today, &mut rng)
        }
        None if !fixed_ids.is_empty() => {
            select_pool(&bank, &fixed_ids, &Recipe::default(), today, &mut rng)
        }
        None => Selection {
            ids: bank.questions.iter().map(|q| q.id.clone()).collect(),
            warnings: Vec::new(),
        },
    };

    let pool = order_pool(selection.questions(&bank), order, &mut rng);
    tracing::debug!(
        seed,
        %order,
        warnings = selection.warnings.len(),
        "selected {} question(s)",
        pool.len()
    );
    anyhow::ensure!(!pool.is_empty(), "no questions selected from {}", args.bank.display());

    let mut generation = config.generation();
    if args.no_shuffle_questions || order == PoolOrder::Manual {
        generation.shuffle_questions = false;
    }
    if args.no_shuffle_options {
        generation.shuffle_options = false;
    }
    if let Some(extra) = &args.anchors {
        generation.anchor_phrases.extend(AnchorSet::parse_extra(extra));
    }
    if args.no_auto_anchor {
        generation.auto_anchor = false;
    }

    eprintln!(
        "examgen v{} - Assembling {} model(s) of {} question(s) (seed {seed})",
        env!("CARGO_PKG_VERSION"),
        num_models,
        pool.len()
    );

    let models = assemble(&pool, num_models, &generation, &mut rng)
        .context("failed to assemble exam models")?;

    let exam = ExamSet::new(name, bank.id.clone(), seed, generation, models);

    print_summary(&exam.models);

    let output = args.output.clone().unwrap_or_else(|| config.output_dir.clone());
    let formats: Vec<&str> = if args.format == "all" {
        vec!["csv", "json", "md"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };

    let scoring = KeyScoring {
        points: config.points.clone(),
        penalty: config.penalty.clone(),
    };

    for fmt in &formats {
        match *fmt {
            "csv" => {
                for path in write_csv_reports(&exam, &output, &scoring)? {
                    eprintln!("CSV: {}", path.display());
                }
            }
            "json" => {
                let path = output.join(format!("{}.json", exam.name));
                exam.save_json(&path)?;
                eprintln!("Exam set saved to: {}", path.display());
            }
            "md" | "markdown" => {
                let paths = write_markdown_reports(&exam, &output, config.solution_mark)?;
                eprintln!("Markdown: {} file(s) in {}", paths.len(), output.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    if args.mark_used {
        let updated = mark_used(&args.bank, &exam.question_ids(), today)?;
        eprintln!("Marked {updated} question(s) as used in {}", args.bank.display());
    }

    Ok(())
}

fn print_summary(models: &[ExamModel]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Version", "Questions", "Anchored", "A", "B", "C", "D"]);

    for model in models {
        let mut counts = [0usize; 4];
        for q in &model.questions {
            counts[q.final_letter.index()] += 1;
        }
        let anchored = model.questions.iter().filter(|q| q.anchored).count();

        let mut row = vec![
            Cell::new(&model.version_letter),
            Cell::new(model.questions.len()),
            Cell::new(anchored),
        ];
        row.extend(Letter::ALL.iter().map(|l| Cell::new(counts[l.index()])));
        table.add_row(row);
    }

    println!("{table}");
}
