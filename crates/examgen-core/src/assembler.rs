//! Exam model assembly.
//!
//! Turns a pool of bank questions into independently shuffled exam models,
//! tracking the correct option through every shuffle so each model carries
//! a valid answer key.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorSet;
use crate::error::AssembleError;
use crate::model::{version_letter, ExamModel, Letter, ModelQuestion, Question, OPTION_COUNT};

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Randomize question order in each model.
    #[serde(default = "default_true")]
    pub shuffle_questions: bool,
    /// Randomize option order of non-anchored questions.
    #[serde(default = "default_true")]
    pub shuffle_options: bool,
    /// Extra anchor phrases on top of the built-in ones.
    #[serde(default)]
    pub anchor_phrases: Vec<String>,
    /// When false, `anchor_phrases` is ignored and only built-in phrases anchor.
    #[serde(default = "default_true")]
    pub auto_anchor: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            shuffle_questions: true,
            shuffle_options: true,
            anchor_phrases: Vec::new(),
            auto_anchor: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl GenerationConfig {
    /// The effective anchor set for this configuration.
    pub fn anchor_set(&self) -> AnchorSet {
        if self.auto_anchor {
            AnchorSet::with_extra(&self.anchor_phrases)
        } else {
            AnchorSet::builtin()
        }
    }
}

/// Assemble `num_models` exam models from `pool`.
///
/// A single random source is threaded through all models in order, so the
/// same seed, pool, and configuration always produce the same models. The
/// pool itself is never modified.
pub fn assemble<R: Rng + ?Sized>(
    pool: &[Question],
    num_models: u32,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<Vec<ExamModel>, AssembleError> {
    if num_models == 0 {
        return Err(AssembleError::NoModels);
    }
    if pool.is_empty() {
        return Err(AssembleError::EmptyPool);
    }

    let anchors = config.anchor_set();
    let mut models = Vec::with_capacity(num_models as usize);
    for model_number in 1..=num_models {
        models.push(build_model(model_number, pool, config, &anchors, rng));
    }

    tracing::debug!(
        "assembled {} model(s) of {} question(s)",
        models.len(),
        pool.len()
    );
    Ok(models)
}

fn build_model<R: Rng + ?Sized>(
    model_number: u32,
    pool: &[Question],
    config: &GenerationConfig,
    anchors: &AnchorSet,
    rng: &mut R,
) -> ExamModel {
    let mut order: Vec<&Question> = pool.iter().collect();
    if config.shuffle_questions {
        order.shuffle(rng);
    }

    let mut questions = Vec::with_capacity(order.len());
    for (position, question) in order.into_iter().enumerate() {
        let display_number = position as u32 + 1;
        questions.push(build_entry(question, display_number, config, anchors, rng));
    }

    ExamModel {
        model_number,
        version_letter: version_letter(model_number),
        questions,
    }
}

fn build_entry<R: Rng + ?Sized>(
    question: &Question,
    display_number: u32,
    config: &GenerationConfig,
    anchors: &AnchorSet,
    rng: &mut R,
) -> ModelQuestion {
    if question.options.len() > OPTION_COUNT {
        tracing::warn!(
            "question {} has {} options, only the first {OPTION_COUNT} are used",
            question.id,
            question.options.len()
        );
    } else if question.options.len() < OPTION_COUNT {
        tracing::debug!(
            "question {} has {} options, missing slots are left empty",
            question.id,
            question.options.len()
        );
    }

    let canonical = question.canonical_options();
    let anchored = anchors.is_anchored(&canonical);

    // Options travel with their canonical index so the correct one can be
    // found again regardless of duplicate or empty texts.
    let mut slots: Vec<(usize, String)> = canonical.into_iter().enumerate().collect();
    if config.shuffle_options && !anchored {
        slots.shuffle(rng);
    }

    let final_letter = locate_correct(&slots, question.correct).unwrap_or_else(|| {
        tracing::warn!(
            "question {}: correct option not found after shuffle, defaulting to A",
            question.id
        );
        Letter::A
    });

    let final_options: [String; OPTION_COUNT] =
        std::array::from_fn(|i| std::mem::take(&mut slots[i].1));

    ModelQuestion {
        question_id: question.id.clone(),
        statement: question.statement.clone(),
        block: question.block.clone(),
        topic: question.topic.clone(),
        difficulty: question.difficulty.clone(),
        original_correct: question.correct,
        final_options,
        final_letter,
        display_number,
        anchored,
    }
}

/// New letter of the option that sat at `correct` in canonical order.
fn locate_correct(slots: &[(usize, String)], correct: Letter) -> Option<Letter> {
    slots
        .iter()
        .position(|(original, _)| *original == correct.index())
        .and_then(Letter::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn make_question(id: &str, options: &[&str], correct: Letter) -> Question {
        Question {
            id: id.into(),
            statement: format!("Statement for {id}"),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct,
            block: "01".into(),
            topic: "1".into(),
            difficulty: "Media".into(),
            used: String::new(),
            notes: String::new(),
        }
    }

    fn make_pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                let opts: Vec<String> = (0..4).map(|j| format!("q{i} option {j}")).collect();
                let opts: Vec<&str> = opts.iter().map(String::as_str).collect();
                make_question(&format!("Q{i:02}"), &opts, Letter::ALL[i % 4])
            })
            .collect()
    }

    fn config(shuffle_questions: bool, shuffle_options: bool) -> GenerationConfig {
        GenerationConfig {
            shuffle_questions,
            shuffle_options,
            ..Default::default()
        }
    }

    fn original<'a>(pool: &'a [Question], id: &str) -> &'a Question {
        pool.iter().find(|q| q.id == id).unwrap()
    }

    #[test]
    fn final_letter_points_at_original_correct_text() {
        let pool = make_pool(12);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let models = assemble(&pool, 4, &config(true, true), &mut rng).unwrap();
            for model in &models {
                for entry in &model.questions {
                    let q = original(&pool, &entry.question_id);
                    assert_eq!(entry.final_correct_text(), q.correct_text());
                    assert_eq!(entry.original_correct, q.correct);
                }
            }
        }
    }

    #[test]
    fn two_questions_keep_order_with_option_shuffle() {
        let pool = vec![
            make_question("Q1", &["red", "green", "blue", "yellow"], Letter::B),
            make_question("Q2", &["one", "two", "three", "four"], Letter::A),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let models = assemble(&pool, 2, &config(false, true), &mut rng).unwrap();

        assert_eq!(models.len(), 2);
        for model in &models {
            let ids: Vec<&str> = model.questions.iter().map(|q| q.question_id.as_str()).collect();
            assert_eq!(ids, vec!["Q1", "Q2"]);
            assert_eq!(model.questions[0].final_correct_text(), "green");
            assert_eq!(model.questions[1].final_correct_text(), "one");
            for entry in &model.questions {
                let mut sorted = entry.final_options.to_vec();
                sorted.sort();
                let mut expected = original(&pool, &entry.question_id).options.clone();
                expected.sort();
                assert_eq!(sorted, expected);
            }
        }
    }

    #[test]
    fn anchored_question_keeps_canonical_order() {
        let pool = vec![make_question(
            "Q1",
            &["Alpha", "Beta", "Gamma", "Todas las anteriores"],
            Letter::D,
        )];
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let models = assemble(&pool, 3, &config(true, true), &mut rng).unwrap();
            for model in &models {
                let entry = &model.questions[0];
                assert!(entry.anchored);
                assert_eq!(
                    entry.final_options,
                    ["Alpha", "Beta", "Gamma", "Todas las anteriores"].map(String::from)
                );
                assert_eq!(entry.final_letter, Letter::D);
            }
        }
    }

    #[test]
    fn extra_anchor_phrases_respect_auto_anchor_switch() {
        let pool: Vec<Question> = (0..8)
            .map(|i| make_question(&format!("Q{i}"), &["w", "x", "y", "only z"], Letter::A))
            .collect();

        let mut cfg = config(false, true);
        cfg.anchor_phrases = vec!["Only Z".into()];
        let mut rng = StdRng::seed_from_u64(1);
        let models = assemble(&pool, 2, &cfg, &mut rng).unwrap();
        assert!(models
            .iter()
            .flat_map(|m| &m.questions)
            .all(|q| q.anchored && q.final_letter == Letter::A));

        cfg.auto_anchor = false;
        let mut rng = StdRng::seed_from_u64(1);
        let models = assemble(&pool, 2, &cfg, &mut rng).unwrap();
        assert!(models.iter().flat_map(|m| &m.questions).all(|q| !q.anchored));
    }

    #[test]
    fn empty_option_slot_still_tracked() {
        let pool = vec![
            make_question("Q1", &["a", "b", "c", ""], Letter::D),
            make_question("Q2", &["a", "b", "c"], Letter::D),
        ];
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let models = assemble(&pool, 2, &config(true, true), &mut rng).unwrap();
            for entry in models.iter().flat_map(|m| &m.questions) {
                assert_eq!(entry.final_correct_text(), "");
                assert!(entry.final_options.contains(&"a".to_string()));
            }
        }
    }

    #[test]
    fn duplicate_option_texts_track_the_correct_slot() {
        let pool = vec![make_question("Q1", &["same", "same", "other", "else"], Letter::B)];
        let mut rng = StdRng::seed_from_u64(7);
        let models = assemble(&pool, 6, &config(false, true), &mut rng).unwrap();
        for model in &models {
            assert_eq!(model.questions[0].final_correct_text(), "same");
        }
    }

    #[test]
    fn no_shuffle_reproduces_canonical_pool() {
        let pool = make_pool(5);
        let mut rng = StdRng::seed_from_u64(3);
        let models = assemble(&pool, 1, &config(false, false), &mut rng).unwrap();

        assert_eq!(models.len(), 1);
        let model = &models[0];
        assert_eq!(model.model_number, 1);
        assert_eq!(model.version_letter, "A");
        for (i, (entry, q)) in model.questions.iter().zip(&pool).enumerate() {
            assert_eq!(entry.question_id, q.id);
            assert_eq!(entry.display_number, i as u32 + 1);
            assert_eq!(entry.final_letter, q.correct);
            assert_eq!(entry.final_options, q.canonical_options());
        }
    }

    #[test]
    fn same_seed_same_models() {
        let pool = make_pool(10);
        let cfg = config(true, true);
        let a = assemble(&pool, 4, &cfg, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = assemble(&pool, 4, &cfg, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn models_are_shuffled_independently() {
        let pool = make_pool(10);
        let mut rng = StdRng::seed_from_u64(5);
        let models = assemble(&pool, 6, &config(true, true), &mut rng).unwrap();
        let orders: HashSet<Vec<String>> = models
            .iter()
            .map(|m| m.questions.iter().map(|q| q.question_id.clone()).collect())
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn version_labels_follow_model_number() {
        let pool = make_pool(2);
        let mut rng = StdRng::seed_from_u64(0);
        let models = assemble(&pool, 7, &config(true, true), &mut rng).unwrap();
        let labels: Vec<&str> = models.iter().map(|m| m.version_letter.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D", "E", "F", "7"]);
        let numbers: Vec<u32> = models.iter().map(|m| m.model_number).collect();
        assert_eq!(numbers, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn every_model_contains_each_question_once() {
        let pool = make_pool(15);
        let mut rng = StdRng::seed_from_u64(11);
        let models = assemble(&pool, 3, &config(true, true), &mut rng).unwrap();
        let expected: HashSet<&str> = pool.iter().map(|q| q.id.as_str()).collect();
        for model in &models {
            assert_eq!(model.questions.len(), pool.len());
            let ids: HashSet<&str> = model.questions.iter().map(|q| q.question_id.as_str()).collect();
            assert_eq!(ids, expected);
            let numbers: Vec<u32> = model.questions.iter().map(|q| q.display_number).collect();
            assert_eq!(numbers, (1..=pool.len() as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn pool_is_not_modified() {
        let pool = make_pool(6);
        let before = pool.clone();
        let mut rng = StdRng::seed_from_u64(8);
        assemble(&pool, 3, &config(true, true), &mut rng).unwrap();
        assert_eq!(pool, before);
    }

    #[test]
    fn extra_options_are_truncated() {
        let pool = vec![make_question("Q1", &["a", "b", "c", "d", "e"], Letter::C)];
        let mut rng = StdRng::seed_from_u64(2);
        let models = assemble(&pool, 2, &config(false, true), &mut rng).unwrap();
        for model in &models {
            let entry = &model.questions[0];
            assert!(!entry.final_options.contains(&"e".to_string()));
            assert_eq!(entry.final_correct_text(), "c");
        }
    }

    #[test]
    fn degenerate_requests_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            assemble(&[], 2, &GenerationConfig::default(), &mut rng),
            Err(AssembleError::EmptyPool)
        );
        assert_eq!(
            assemble(&make_pool(3), 0, &GenerationConfig::default(), &mut rng),
            Err(AssembleError::NoModels)
        );
    }

    #[test]
    fn locate_correct_falls_back_to_none_when_missing() {
        let slots: Vec<(usize, String)> = vec![(1, "b".into()), (0, "a".into())];
        assert_eq!(locate_correct(&slots, Letter::A), Some(Letter::B));
        assert_eq!(locate_correct(&slots, Letter::D), None);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: GenerationConfig = toml::from_str("anchor_phrases = [\"only a\"]").unwrap();
        assert!(cfg.shuffle_questions);
        assert!(cfg.shuffle_options);
        assert!(cfg.auto_anchor);
        assert!(cfg.anchor_set().matches("Only A"));
    }
}
