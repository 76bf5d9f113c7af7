use exam_core::model::{Choice, QuestionId};
use storage::repository::QuestionRepository;

use super::test_harness::{ViewKind, sample_question, sample_record, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn topic_picker_lists_topics_in_catalog_order() {
    let mut harness = setup_view_harness(ViewKind::Home).await;
    harness
        .storage
        .questions
        .upsert_batch(&[
            sample_record(7, 1, Choice::A),
            sample_record(3, 1, Choice::B),
            sample_record(7, 2, Choice::C),
        ])
        .await
        .expect("seed catalog");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    let first = html.find("Topic 3").expect("topic 3 rendered");
    let second = html.find("Topic 7").expect("topic 7 rendered");
    assert!(first < second, "topics out of order in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_picker_mentions_the_import_when_empty() {
    let mut harness = setup_view_harness(ViewKind::Home).await;

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("No questions in the catalog yet"),
        "missing empty-state text in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_renders_question_and_options() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness
        .exam
        .start_exam(vec![sample_question(1, 1, "a"), sample_question(1, 2, "b")])
        .await
        .expect("start exam");

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Sample question 1-1?"), "missing text in {html}");
    for option in ["one", "two", "three", "four"] {
        assert!(html.contains(option), "missing option {option} in {html}");
    }
    assert!(html.contains("Next"), "missing advance button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_marks_the_recorded_pick() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness
        .exam
        .start_exam(vec![sample_question(1, 1, "a")])
        .await
        .expect("start exam");
    harness
        .exam
        .record_answer(&QuestionId::new("1-1"), Choice::C)
        .await
        .expect("record answer");

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("option-selected"), "no selected option in {html}");
    // A single-question session finishes instead of advancing.
    assert!(html.contains("Finish"), "missing finish button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_without_session_renders_no_question() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;

    harness.rebuild();
    let html = harness.render();

    assert!(!html.contains("question-card"), "unexpected card in {html}");
    assert!(!html.contains("Next"), "unexpected advance button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_reports_the_score() {
    let mut harness = setup_view_harness(ViewKind::Result).await;
    harness
        .exam
        .start_exam(vec![sample_question(1, 1, "a"), sample_question(1, 2, "b")])
        .await
        .expect("start exam");
    harness
        .exam
        .record_answer(&QuestionId::new("1-1"), Choice::A)
        .await
        .expect("correct answer");
    harness
        .exam
        .record_answer(&QuestionId::new("1-2"), Choice::C)
        .await
        .expect("wrong answer");

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Result: 1 / 2"), "missing score in {html}");
    assert!(
        html.contains("Start a new exam"),
        "missing restart button in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_without_session_renders_no_score() {
    let mut harness = setup_view_harness(ViewKind::Result).await;

    harness.rebuild();
    let html = harness.render();

    assert!(!html.contains("Result:"), "unexpected score in {html}");
}
