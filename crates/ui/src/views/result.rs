use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

/// Final score plus a restart action that clears the session.
#[component]
pub fn ResultView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let exam_for_signal = ctx.exam();
    let session = use_signal(move || exam_for_signal.current());

    // A result page without a session redirects instead of showing 0/0.
    use_effect(move || {
        if session.read().is_none() {
            let _ = navigator.replace(Route::Home {});
        }
    });

    let Some(current) = session() else {
        return rsx! {};
    };

    let score = current.score();

    rsx! {
        div { class: "page result-page",
            h2 { class: "result-score", "Result: {score}" }

            button {
                class: "result-restart",
                onclick: move |_| {
                    let exam = ctx.exam();
                    spawn(async move {
                        if exam.reset().await.is_ok() {
                            let _ = navigator.push(Route::Home {});
                        }
                    });
                },
                "Start a new exam"
            }
        }
    }
}
