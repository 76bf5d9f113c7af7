use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::{Choice, Question};
use services::AnswerOutcome;

use crate::context::AppContext;
use crate::routes::Route;

/// One question at a time, radio picks, advance gated on an answer.
#[component]
pub fn ExamView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let exam = ctx.exam();

    let exam_for_signal = ctx.exam();
    let mut session = use_signal(move || exam_for_signal.current());
    let mut index = use_signal(|| 0_usize);

    // Entering without a session bounces back to topic selection.
    use_effect(move || {
        if session.read().is_none() {
            let _ = navigator.replace(Route::Home {});
        }
    });

    let Some(current) = session() else {
        return rsx! {};
    };

    let i = index();
    let Some(question) = current.question(i).cloned() else {
        return rsx! {};
    };

    let total = current.total();
    let position = i + 1;
    let selected = current.answer_for(question.id());
    let is_last = position == total;
    let question_id = question.id().clone();

    rsx! {
        div { class: "page exam-page",
            p { class: "exam-progress", "Question {position} of {total}" }

            QuestionCard {
                question: question.clone(),
                selected,
                on_select: move |choice: Choice| {
                    let exam = exam.clone();
                    let question_id = question_id.clone();
                    spawn(async move {
                        if let Ok(AnswerOutcome::Recorded(updated)) =
                            exam.record_answer(&question_id, choice).await
                        {
                            session.set(Some(updated));
                        }
                    });
                },
            }

            button {
                class: "exam-advance",
                disabled: selected.is_none(),
                onclick: move |_| {
                    if is_last {
                        let _ = navigator.push(Route::Result {});
                    } else {
                        index += 1;
                    }
                },
                if is_last { "Finish" } else { "Next" }
            }
        }
    }
}

/// Pure display of one question plus a callback for the picked label.
#[component]
fn QuestionCard(
    question: Question,
    selected: Option<Choice>,
    on_select: EventHandler<Choice>,
) -> Element {
    let text = question.text().to_owned();
    let group = question.id().to_string();
    let options: Vec<(Choice, String)> = Choice::ALL
        .iter()
        .map(|&choice| (choice, question.option(choice).to_owned()))
        .collect();

    rsx! {
        article { class: "question-card",
            p { class: "question-text", "{text}" }

            for (choice, option_text) in options {
                label {
                    class: if selected == Some(choice) { "option option-selected" } else { "option" },
                    input {
                        r#type: "radio",
                        name: "{group}",
                        checked: selected == Some(choice),
                        onchange: move |_| on_select.call(choice),
                    }
                    span { class: "option-label", "{choice}" }
                    span { class: "option-text", "{option_text}" }
                }
            }
        }
    }
}
