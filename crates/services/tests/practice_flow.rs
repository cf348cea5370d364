use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use sat_core::model::{
    AnswerLetter, CurrentUser, Prompt, PromptId, QuestionCategory, RawCompletion, UserId,
};
use sat_core::time::{fixed_clock, fixed_now};
use sat_core::{AnswerCheck, ParseTier, SessionError};
use services::{
    Applied, CompletionClient, CompletionError, Notice, PracticeController, PracticeError,
    PromptedQuestionSource, QuestionSource, QuestionSourceError,
};
use storage::repository::{InMemoryRepository, PromptRepository, ResponseLogRepository, Storage};

const TWO_PLUS_TWO: &str = "Question: 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect Answer: B";

/// Returns a fixed completion and remembers the prompts it was sent.
struct ScriptedClient {
    reply: String,
    sent: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<RawCompletion, CompletionError> {
        self.sent.lock().unwrap().push(prompt.to_string());
        Ok(RawCompletion::new(self.reply.clone()))
    }
}

/// Serves canned text per call, or a gateway error once the script runs out.
struct ScriptedSource {
    replies: Mutex<Vec<&'static str>>,
}

impl ScriptedSource {
    fn new(replies: Vec<&'static str>) -> Self {
        Self {
            replies: Mutex::new(replies),
        }
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(
        &self,
        _category: QuestionCategory,
    ) -> Result<RawCompletion, QuestionSourceError> {
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(QuestionSourceError::HttpStatus(StatusCode::BAD_GATEWAY));
        }
        Ok(RawCompletion::new(replies.remove(0)))
    }
}

async fn prompted_controller(
    category: QuestionCategory,
    reply: &str,
) -> (PracticeController, Arc<ScriptedClient>, Storage) {
    let storage = Storage::in_memory();
    let prompt = Prompt::new(
        PromptId::generate(),
        category,
        "Write one question as plain text.",
        true,
        fixed_now(),
    )
    .unwrap();
    storage.prompts.insert_prompt(&prompt).await.unwrap();

    let client = Arc::new(ScriptedClient::new(reply));
    let source = PromptedQuestionSource::new(
        Arc::clone(&storage.prompts),
        Arc::clone(&client) as Arc<dyn CompletionClient>,
    );
    let controller = PracticeController::new(
        fixed_clock(),
        Arc::new(source),
        Arc::clone(&storage.responses),
    );
    (controller, client, storage)
}

#[tokio::test]
async fn math_request_then_correct_check() {
    let (mut controller, client, storage) =
        prompted_controller(QuestionCategory::MathNoCalculator, TWO_PLUS_TWO).await;

    let applied = controller
        .request_category(QuestionCategory::MathNoCalculator)
        .await
        .expect("request");
    assert_eq!(applied, Applied::Loaded(ParseTier::Heuristic));
    assert_eq!(
        client.sent.lock().unwrap().as_slice(),
        ["Write one question as plain text."]
    );

    let item = controller.session().current_item().expect("item");
    assert_eq!(item.question_text, "2+2?");
    assert_eq!(item.choices.len(), 4);
    assert_eq!(item.correct_answer.to_string(), "B");

    controller.select_answer("B");
    assert_eq!(controller.selected_letter(), Some(AnswerLetter::B));
    let check = controller.check_answer().expect("check");
    assert_eq!(
        check,
        AnswerCheck::Correct {
            answer: AnswerLetter::B
        }
    );
    assert_eq!(Notice::for_check(&check).title, "Correct!");

    let logged = storage.responses.recent_responses(5).await.unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].question_type, QuestionCategory::MathNoCalculator);
    assert_eq!(logged[0].user_id, None);
}

#[tokio::test]
async fn writing_request_populates_sentence_and_underlined_span() {
    let completion = "Sentence: The dog runs.\nUnderlined: runs\nA) NO CHANGE\nB) run\nC) ran\nD) running\nCorrect Answer: A";
    let (controller, _client, _storage) =
        prompted_controller(QuestionCategory::WritingQuestions, completion).await;
    let user = UserId::generate();
    let mut controller = controller.with_user(CurrentUser::Authenticated(user));

    controller
        .request_category(QuestionCategory::WritingQuestions)
        .await
        .expect("request");

    let item = controller.session().current_item().expect("item");
    assert_eq!(item.sentence.as_deref(), Some("The dog runs."));
    assert_eq!(item.underlined_span.as_deref(), Some("runs"));
    assert_eq!(controller.category(), Some(QuestionCategory::WritingQuestions));
}

#[tokio::test]
async fn missing_prompt_is_a_network_failure() {
    let (mut controller, client, _storage) =
        prompted_controller(QuestionCategory::MathNoCalculator, TWO_PLUS_TWO).await;

    let err = controller
        .request_category(QuestionCategory::ReadingPassage)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PracticeError::Network(QuestionSourceError::MissingPrompt(
            QuestionCategory::ReadingPassage
        ))
    ));
    assert!(client.sent.lock().unwrap().is_empty());
    assert!(controller.session().question().is_none());
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_request() {
    let storage = Storage::in_memory();
    let source = Arc::new(ScriptedSource::new(vec![]));
    let mut controller = PracticeController::new(
        fixed_clock(),
        source,
        Arc::clone(&storage.responses),
    );

    let older = controller.begin_request(QuestionCategory::MathWithCalculator);
    let newer = controller.begin_request(QuestionCategory::MathNoCalculator);
    assert!(newer.generation() > older.generation());

    let applied = controller
        .apply(newer, Ok(RawCompletion::new(TWO_PLUS_TWO)))
        .unwrap();
    assert_eq!(applied, Applied::Loaded(ParseTier::Heuristic));

    let late = controller
        .apply(
            older,
            Ok(RawCompletion::new(
                "Question: 3*3?\nA) 6\nB) 9\nCorrect Answer: B",
            )),
        )
        .unwrap();
    assert_eq!(late, Applied::Stale);
    assert_eq!(
        controller.session().current_item().unwrap().question_text,
        "2+2?"
    );
    assert_eq!(controller.category(), Some(QuestionCategory::MathNoCalculator));

    // A stale failure is dropped just as quietly.
    let late_failure = controller
        .apply(
            older,
            Err(QuestionSourceError::HttpStatus(StatusCode::BAD_GATEWAY)),
        )
        .unwrap();
    assert_eq!(late_failure, Applied::Stale);
}

#[tokio::test]
async fn network_failure_keeps_previous_question() {
    let storage = Storage::in_memory();
    let source = Arc::new(ScriptedSource::new(vec![TWO_PLUS_TWO]));
    let mut controller = PracticeController::new(
        fixed_clock(),
        source,
        Arc::clone(&storage.responses),
    );

    controller
        .request_category(QuestionCategory::MathNoCalculator)
        .await
        .expect("first request");
    controller.select_answer("A");

    let err = controller
        .request_category(QuestionCategory::MathNoCalculator)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PracticeError::Network(QuestionSourceError::HttpStatus(StatusCode::BAD_GATEWAY))
    ));
    assert_eq!(Notice::for_practice_error(&err).title, "Error");
    assert_eq!(controller.session().selected_answer(), Some("A"));
    assert_eq!(
        controller.session().current_item().unwrap().question_text,
        "2+2?"
    );
}

#[tokio::test]
async fn unresolved_answer_is_indeterminate_not_incorrect() {
    let storage = Storage::in_memory();
    let source = Arc::new(ScriptedSource::new(vec![
        "Question: Pick one\nA) x\nB) y\nCorrect Answer: none of these",
    ]));
    let mut controller = PracticeController::new(
        fixed_clock(),
        source,
        Arc::clone(&storage.responses),
    );
    controller
        .request_category(QuestionCategory::MathWithCalculator)
        .await
        .unwrap();

    controller.select_answer("A");
    let check = controller.check_answer().unwrap();
    assert_eq!(check, AnswerCheck::Indeterminate);
    assert_ne!(Notice::for_check(&check).title, "Incorrect");
}

#[tokio::test]
async fn checking_without_question_or_selection_fails() {
    let storage = Storage::in_memory();
    let mut controller = PracticeController::new(
        fixed_clock(),
        Arc::new(ScriptedSource::new(vec![TWO_PLUS_TWO])),
        Arc::clone(&storage.responses),
    );
    assert!(matches!(
        controller.check_answer(),
        Err(PracticeError::Session(SessionError::NoQuestion))
    ));

    controller
        .request_category(QuestionCategory::MathNoCalculator)
        .await
        .unwrap();
    assert!(matches!(
        controller.check_answer(),
        Err(PracticeError::Session(SessionError::NoSelection))
    ));
}

#[tokio::test]
async fn reading_set_advances_through_items() {
    let storage = Storage::in_memory();
    let document = r#"{"passage": "Bees dance to share where food is.", "questions": [
        {"question": "What do bees share?", "choices": ["A) songs", "B) food locations"], "correct_answer": "B"},
        {"question": "How?", "choices": ["A) dancing", "B) buzzing"], "correct_answer": "A"}
    ]}"#;
    let mut controller = PracticeController::new(
        fixed_clock(),
        Arc::new(ScriptedSource::new(vec![document])),
        Arc::clone(&storage.responses),
    );
    let applied = controller
        .request_category(QuestionCategory::ReadingQuestions)
        .await
        .unwrap();
    assert_eq!(applied, Applied::Loaded(ParseTier::Strict));
    assert_eq!(controller.progress().total, 2);

    controller.select_answer("A");
    let check = controller.check_answer().unwrap();
    assert!(matches!(
        check,
        AnswerCheck::Incorrect {
            expected: AnswerLetter::B,
            ..
        }
    ));
    assert_eq!(controller.progress().index, 1);
    assert!(!controller.next());
    assert!(controller.previous());
    assert_eq!(controller.progress().index, 0);
}

#[tokio::test]
async fn failed_parse_loads_partial_question_without_logging() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut controller = PracticeController::new(
        fixed_clock(),
        Arc::new(ScriptedSource::new(vec!["I can't help with that."])),
        Arc::clone(&repo) as Arc<dyn ResponseLogRepository>,
    );
    let applied = controller
        .request_category(QuestionCategory::MathNoCalculator)
        .await
        .unwrap();
    assert_eq!(applied, Applied::Loaded(ParseTier::Failure));
    assert!(
        controller
            .session()
            .current_item()
            .unwrap()
            .choices
            .is_empty()
    );
    assert!(repo.recent_responses(5).await.unwrap().is_empty());
}
