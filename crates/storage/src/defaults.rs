//! Default generation prompts, one per category.

use chrono::{DateTime, Utc};
use sat_core::model::{Prompt, PromptId, QuestionCategory};

use crate::repository::{PromptRepository, StorageError};

const JSON_ONLY: &str = "Output ONLY valid JSON, with no commentary before or after it.";

fn default_content(category: QuestionCategory) -> String {
    let body = match category {
        QuestionCategory::ReadingPassage => {
            "Write a passage for an SAT-style Reading section, 500 to 750 words, in a formal tone. \
             Choose one topic: a literary excerpt about a character's internal conflict, a historical \
             document or debate, a social science discussion grounded in data or theory, or a natural \
             science explanation with possible hypothetical data. The passage should be dense with \
             ideas that require inference, use advanced vocabulary, and avoid casual language.\n\n\
             Use this structure: { \"passage\": \"...\" }"
        }
        QuestionCategory::ReadingQuestions => {
            "Using the provided passage, write 10 to 11 SAT Reading multiple-choice questions covering \
             main idea and purpose, details and evidence, paired evidence questions, inferences, \
             vocabulary in context, and the author's tone. Each question has four choices labeled \
             A) to D) and exactly one correct answer.\n\n\
             Use this structure: { \"questions\": [ { \"question\": \"...\", \"choices\": \
             [\"A) ...\", \"B) ...\", \"C) ...\", \"D) ...\"], \"correctAnswer\": \"B\" } ] }"
        }
        QuestionCategory::WritingPassage => {
            "Write a passage for an SAT-style Writing and Language section, 400 to 450 words in four \
             or five paragraphs, formal and concise. Pick a topic from careers, humanities, history \
             or social studies, or science. Leave clear opportunities to test grammar, sentence \
             structure, word choice, transitions, and tone.\n\n\
             Use this structure: { \"passage\": \"...\" }"
        }
        QuestionCategory::WritingQuestions => {
            "Using the provided passage, write 11 SAT Writing and Language multiple-choice questions: \
             grammar and usage, sentence structure and punctuation, concision and word choice, \
             organization and transitions, and style. Where a question targets a sentence, include \
             the sentence and the underlined portion.\n\n\
             Use this structure: { \"questions\": [ { \"question\": \"...\", \"sentence\": \"...\", \
             \"underlined\": \"...\", \"choices\": [\"A) ...\", \"B) ...\", \"C) ...\", \"D) ...\"], \
             \"correctAnswer\": \"D\" } ] }"
        }
        QuestionCategory::MathWithCalculator => {
            "Write one SAT Math question for the calculator-allowed section. It should involve \
             multi-step calculation in a realistic context (finance, science, everyday problems) \
             drawn from problem solving and data analysis, algebra, or advanced math. Give four \
             choices labeled A) to D).\n\n\
             Use this structure: { \"question\": \"...\", \"choices\": [\"A) ...\", \"B) ...\", \
             \"C) ...\", \"D) ...\"], \"correctAnswer\": \"C\" }"
        }
        QuestionCategory::MathNoCalculator => {
            "Write one SAT Math question for the no-calculator section. It should be solvable quickly \
             by reasoning or algebraic manipulation: linear equations, simplifying expressions, or \
             basic geometry, with no large numbers. Give four choices labeled A) to D).\n\n\
             Use this structure: { \"question\": \"...\", \"choices\": [\"A) ...\", \"B) ...\", \
             \"C) ...\", \"D) ...\"], \"correctAnswer\": \"B\" }"
        }
    };
    format!("{body}\n\n{JSON_ONLY}")
}

/// Default prompts for every category, flagged `is_default`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if a default prompt fails validation.
pub fn default_prompts(now: DateTime<Utc>) -> Result<Vec<Prompt>, StorageError> {
    QuestionCategory::ALL
        .into_iter()
        .map(|category| {
            Prompt::new(
                PromptId::generate(),
                category,
                default_content(category),
                true,
                now,
            )
            .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .collect()
}

/// Insert defaults for categories that have no prompt yet. Returns how many were added.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be read or written.
pub async fn seed_default_prompts(
    prompts: &dyn PromptRepository,
    now: DateTime<Utc>,
) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for prompt in default_prompts(now)? {
        if prompts.prompt_for_category(prompt.category()).await?.is_some() {
            continue;
        }
        prompts.insert_prompt(&prompt).await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use sat_core::time::fixed_now;

    #[test]
    fn every_category_gets_a_json_prompt() {
        let prompts = default_prompts(fixed_now()).unwrap();
        assert_eq!(prompts.len(), QuestionCategory::ALL.len());
        assert!(prompts.iter().all(Prompt::is_default));
        assert!(prompts.iter().all(|p| p.content().contains("valid JSON")));
    }

    #[tokio::test]
    async fn seeding_twice_only_inserts_once() {
        let repo = InMemoryRepository::new();
        assert_eq!(seed_default_prompts(&repo, fixed_now()).await.unwrap(), 6);
        assert_eq!(seed_default_prompts(&repo, fixed_now()).await.unwrap(), 0);
        assert_eq!(repo.list_prompts().await.unwrap().len(), 6);
    }
}
