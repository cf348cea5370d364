use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use sat_core::model::{AnswerLetter, QuestionCategory};
use sat_core::time::fixed_now;
use sat_core::{AnswerCheck, ParseTier};
use services::{
    Applied, Clock, PracticeController, PracticeError, QuestionApiSource, QuestionSource,
    QuestionSourceError,
};
use storage::repository::{ResponseLogRepository, Storage};

async fn maths(Query(params): Query<HashMap<String, String>>) -> String {
    let calculator = params.get("use_calculator").map(String::as_str) == Some("true");
    let (question, answer) = if calculator {
        ("What is 17% of 300?", "C")
    } else {
        ("What is 2+2?", "B")
    };
    format!(
        r#"{{"question": "{question}", "choices": ["A) 3", "B) 4", "C) 51", "D) 6"], "correct_answer": "{answer}"}}"#
    )
}

async fn reading() -> &'static str {
    r#"{"passage": "Tides follow the moon.", "questions": [
        {"question": "What drives tides?", "choices": ["A) wind", "B) the moon"], "correct_answer": "B"}
    ]}"#
}

async fn writing() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "busy")
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/api/maths-question", get(maths))
        .route("/api/reading-question", get(reading))
        .route("/api/writing-question", get(writing));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn maths_endpoint_passes_calculator_flag() {
    let source = QuestionApiSource::new(&spawn_stub().await).unwrap();

    let with = source
        .fetch(QuestionCategory::MathWithCalculator)
        .await
        .unwrap();
    assert!(with.as_str().contains("17%"));

    let without = source
        .fetch(QuestionCategory::MathNoCalculator)
        .await
        .unwrap();
    assert!(without.as_str().contains("2+2"));
}

#[tokio::test]
async fn hosted_reading_set_is_parsed_strictly() {
    let source = QuestionApiSource::new(&spawn_stub().await).unwrap();
    let storage = Storage::in_memory();
    let mut controller = PracticeController::new(
        Clock::fixed(fixed_now()),
        Arc::new(source),
        Arc::clone(&storage.responses),
    );

    let applied = controller
        .request_category(QuestionCategory::ReadingPassage)
        .await
        .unwrap();
    assert_eq!(applied, Applied::Loaded(ParseTier::Strict));
    let question = controller.session().question().unwrap();
    assert_eq!(question.passage.as_deref(), Some("Tides follow the moon."));

    controller.select_answer("the moon");
    assert_eq!(
        controller.check_answer().unwrap(),
        AnswerCheck::Correct {
            answer: AnswerLetter::B
        }
    );
    assert_eq!(storage.responses.recent_responses(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_success_status_surfaces_as_network_error() {
    let source = QuestionApiSource::new(&spawn_stub().await).unwrap();
    let storage = Storage::in_memory();
    let mut controller = PracticeController::new(
        Clock::fixed(fixed_now()),
        Arc::new(source),
        Arc::clone(&storage.responses),
    );

    let err = controller
        .request_category(QuestionCategory::WritingQuestions)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PracticeError::Network(QuestionSourceError::HttpStatus(status))
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
    assert!(controller.session().question().is_none());
}
