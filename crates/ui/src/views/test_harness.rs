use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::{Choice, Question, QuestionDraft, TopicId};
use exam_core::time::{fixed_clock, fixed_now};
use services::{CatalogService, ExamService};
use storage::repository::{QuestionRecord, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{ExamView, ResultView, TopicPickerView};

#[derive(Clone)]
struct TestApp {
    catalog: Arc<CatalogService>,
    exam: Arc<ExamService>,
}

impl UiApp for TestApp {
    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn exam(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Exam,
    Result,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { TopicPickerView {} },
        ViewKind::Exam => rsx! { ExamView {} },
        ViewKind::Result => rsx! { ResultView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub exam: Arc<ExamService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_question(topic: u32, number: u32, correct: &str) -> Question {
    QuestionDraft {
        id: format!("{topic}-{number}"),
        topic: TopicId::new(topic),
        text: format!("Sample question {topic}-{number}?"),
        options: ["one".into(), "two".into(), "three".into(), "four".into()],
        answer: correct.into(),
    }
    .validate()
    .expect("sample question is valid")
}

pub fn sample_record(tema: u32, number: u32, answer: Choice) -> QuestionRecord {
    QuestionRecord {
        tema,
        number,
        text: format!("Sample question {tema}-{number}?"),
        options: ["one".into(), "two".into(), "three".into(), "four".into()],
        answer,
        random_key: 0.5,
        created_at: fixed_now(),
    }
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.questions)));
    let exam = Arc::new(
        ExamService::load(fixed_clock(), Arc::clone(&storage.session_state))
            .await
            .expect("hydrate exam service"),
    );

    let app = Arc::new(TestApp {
        catalog,
        exam: Arc::clone(&exam),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, storage, exam }
}
