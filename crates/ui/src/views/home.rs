use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::TopicId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct TopicData {
    topics: Vec<u32>,
}

/// Entry view: pick a topic to start an exam over its questions.
#[component]
pub fn TopicPickerView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let topics = catalog.topics().await.map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(TopicData {
                topics: topics.iter().map(TopicId::value).collect(),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Pick a topic" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.topics.is_empty() {
                        p { "No questions in the catalog yet. Run the import first." }
                    } else {
                        ul { class: "topic-grid",
                            for topic in data.topics {
                                TopicButton { topic }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn TopicButton(topic: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    rsx! {
        li {
            button {
                class: "topic-button",
                onclick: move |_| {
                    let catalog = ctx.catalog();
                    let exam = ctx.exam();
                    spawn(async move {
                        let Ok(questions) =
                            catalog.questions_for_topic(TopicId::new(topic)).await
                        else {
                            return;
                        };
                        if exam.start_exam(questions).await.is_ok() {
                            let _ = navigator.push(Route::Exam {});
                        }
                    });
                },
                "Topic {topic}"
            }
        }
    }
}
