use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ExamView, ResultView, TopicPickerView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TopicPickerView)] Home {},
        #[route("/exam", ExamView)] Exam {},
        #[route("/result", ResultView)] Result {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "masthead",
                Link { class: "masthead-title", to: Route::Home {}, "Exam Trainer" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
