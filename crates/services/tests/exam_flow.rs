use std::sync::Arc;

use exam_core::model::{Choice, QuestionDraft, QuestionId, TopicId};
use exam_core::time::fixed_clock;
use services::{AnswerOutcome, CatalogService, ExamService, SESSION_STATE_KEY};
use storage::repository::{
    InMemoryRepository, QuestionRecord, QuestionRepository, SessionStateRepository,
};

fn question(topic: u32, number: u32, correct: &str) -> exam_core::model::Question {
    QuestionDraft {
        id: format!("{topic}-{number}"),
        topic: TopicId::new(topic),
        text: format!("Question {topic}-{number}?"),
        options: ["one".into(), "two".into(), "three".into(), "four".into()],
        answer: correct.into(),
    }
    .validate()
    .unwrap()
}

fn record(topic: u32, number: u32, correct: Choice) -> QuestionRecord {
    QuestionRecord {
        tema: topic,
        number,
        text: format!("Question {topic}-{number}?"),
        options: ["one".into(), "two".into(), "three".into(), "four".into()],
        answer: correct,
        random_key: 0.5,
        created_at: exam_core::time::fixed_now(),
    }
}

async fn service(store: &Arc<InMemoryRepository>) -> ExamService {
    let blobs: Arc<dyn SessionStateRepository> = store.clone();
    ExamService::load(fixed_clock(), blobs)
        .await
        .expect("hydrate service")
}

#[tokio::test]
async fn answering_one_of_two_scores_one_of_two() {
    let store = Arc::new(InMemoryRepository::new());
    let exam = service(&store).await;

    exam.start_exam(vec![question(1, 1, "a"), question(1, 2, "b")])
        .await
        .expect("start");

    exam.record_answer(&QuestionId::new("1-1"), Choice::A)
        .await
        .expect("answer q1");
    exam.record_answer(&QuestionId::new("1-2"), Choice::C)
        .await
        .expect("answer q2");

    let session = exam.current().expect("session");
    assert!(session.is_complete());
    assert_eq!(session.score().to_string(), "1 / 2");
}

#[tokio::test]
async fn session_survives_a_service_reload() {
    let store = Arc::new(InMemoryRepository::new());

    {
        let exam = service(&store).await;
        exam.start_exam(vec![question(2, 1, "a"), question(2, 2, "d")])
            .await
            .expect("start");
        exam.record_answer(&QuestionId::new("2-1"), Choice::B)
            .await
            .expect("answer");
    }

    // A fresh service over the same store sees the exact prior state.
    let exam = service(&store).await;
    let session = exam.current().expect("resumed session");

    let ids: Vec<_> = session.questions().iter().map(|q| q.id().to_string()).collect();
    assert_eq!(ids, ["2-1", "2-2"]);
    assert_eq!(
        session.answer_for(&QuestionId::new("2-1")),
        Some(Choice::B)
    );
    assert_eq!(session.answer_for(&QuestionId::new("2-2")), None);
    assert_eq!(session.started_at(), exam_core::time::fixed_now());
}

#[tokio::test]
async fn reset_clears_memory_and_durable_copy() {
    let store = Arc::new(InMemoryRepository::new());
    let exam = service(&store).await;

    exam.start_exam(vec![question(3, 1, "c")])
        .await
        .expect("start");
    exam.reset().await.expect("reset");

    assert!(exam.current().is_none());
    assert_eq!(store.load(SESSION_STATE_KEY).await.unwrap(), None);

    // A reload after reset starts empty too.
    let exam = service(&store).await;
    assert!(exam.current().is_none());
}

#[tokio::test]
async fn answer_without_session_is_a_no_op() {
    let store = Arc::new(InMemoryRepository::new());
    let exam = service(&store).await;

    let outcome = exam
        .record_answer(&QuestionId::new("1-1"), Choice::A)
        .await
        .expect("call succeeds");

    assert_eq!(outcome, AnswerOutcome::NoSession);
    assert!(exam.current().is_none());
    assert_eq!(store.load(SESSION_STATE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn starting_again_replaces_the_session_without_ceremony() {
    let store = Arc::new(InMemoryRepository::new());
    let exam = service(&store).await;

    exam.start_exam(vec![question(1, 1, "a")])
        .await
        .expect("first start");
    exam.record_answer(&QuestionId::new("1-1"), Choice::A)
        .await
        .expect("answer");

    exam.start_exam(vec![question(4, 1, "b"), question(4, 2, "c")])
        .await
        .expect("second start");

    let session = exam.current().expect("session");
    assert_eq!(session.total(), 2);
    assert_eq!(session.answered_count(), 0);
    assert_eq!(session.answer_for(&QuestionId::new("4-1")), None);
}

#[tokio::test]
async fn answering_an_unknown_question_is_rejected() {
    let store = Arc::new(InMemoryRepository::new());
    let exam = service(&store).await;

    exam.start_exam(vec![question(1, 1, "a")])
        .await
        .expect("start");

    let err = exam
        .record_answer(&QuestionId::new("9-9"), Choice::A)
        .await
        .unwrap_err();
    assert!(matches!(err, services::ExamServiceError::Session(_)));

    // The failed call left the recorded state untouched.
    assert_eq!(exam.current().unwrap().answered_count(), 0);
}

#[tokio::test]
async fn topic_picker_flow_starts_the_filtered_subset() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.upsert_batch(&[
        record(7, 1, Choice::A),
        record(3, 1, Choice::B),
        record(7, 2, Choice::D),
    ])
    .await
    .expect("seed catalog");

    let questions: Arc<dyn QuestionRepository> = repo.clone();
    let catalog = CatalogService::new(questions);
    let exam = service(&repo).await;

    let topics: Vec<_> = catalog
        .topics()
        .await
        .expect("topics")
        .iter()
        .map(TopicId::value)
        .collect();
    assert_eq!(topics, [3, 7]);

    let picked = catalog
        .questions_for_topic(TopicId::new(7))
        .await
        .expect("filter");
    let session = exam.start_exam(picked).await.expect("start");

    let ids: Vec<_> = session.questions().iter().map(|q| q.id().to_string()).collect();
    assert_eq!(ids, ["7-1", "7-2"]);
}
