use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use fit_core::model::{
    AuthSession, AuthToken, Exercise, ExerciseId, ProgressStats, User, UserId, WeeklyProgress,
    Workout, WorkoutId, WorkoutStatus,
};
use fit_core::time::{fixed_clock, fixed_now};
use services::{AppServices, FitnessBackend, InMemoryBackend};
use storage::Storage;

use crate::context::{AuthState, AuthStatus, SelectedWorkout, UiApp, build_app_context};
use crate::views::session::SessionTestHandles;
use crate::views::{AuthView, DashboardView, ProgressView, SessionView, ToastMessage, ToastQueue};
use crate::vm::SessionIntent;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Auth,
    Dashboard,
    Session,
    Progress,
}

/// Shared-state handles the tests read back after driving the DOM.
#[derive(Clone, Default)]
pub struct SharedHandles {
    auth: Rc<RefCell<Option<AuthState>>>,
    toasts: Rc<RefCell<Option<ToastQueue>>>,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
    status: AuthStatus,
    shared: SharedHandles,
    session_handles: Option<SessionTestHandles>,
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
    let status = props.status.clone();
    let auth = use_context_provider(|| AuthState(Signal::new(status)));
    let toasts = use_context_provider(ToastQueue::new);
    use_context_provider(|| SelectedWorkout(Signal::new(None)));
    *props.shared.auth.borrow_mut() = Some(auth);
    *props.shared.toasts.borrow_mut() = Some(toasts);
    if let Some(handles) = props.session_handles.clone() {
        use_context_provider(|| handles);
    }
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
        ViewKind::Auth => rsx! { AuthView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Session => rsx! { SessionView {} },
        ViewKind::Progress => rsx! { ProgressView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub shared: SharedHandles,
    pub session_handles: Option<SessionTestHandles>,
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

    /// Drive until `done` holds for the rendered HTML, or give up.
    pub async fn drive_until(&mut self, done: impl Fn(&str) -> bool) -> String {
        for _ in 0..20 {
            let html = self.render();
            if done(&html) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    /// Move paused tokio time forward and let woken tasks run.
    ///
    /// Needs `#[tokio::test(start_paused = true)]`.
    pub async fn advance(&mut self, by: std::time::Duration) {
        tokio::time::advance(by).await;
        drive_dom(&mut self.dom);
    }

    /// `advance` one second at a time, so each countdown tick is rendered.
    pub async fn advance_secs(&mut self, secs: u64) {
        for _ in 0..secs {
            self.advance(std::time::Duration::from_secs(1)).await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn auth_status(&self) -> AuthStatus {
        let auth = (*self.shared.auth.borrow()).expect("auth state registered");
        self.dom.in_runtime(|| auth.0.peek().clone())
    }

    pub fn toasts(&self) -> Vec<ToastMessage> {
        let toasts = (*self.shared.toasts.borrow()).expect("toast queue registered");
        self.dom.in_runtime(|| toasts.messages())
    }

    pub fn dispatch(&mut self, intent: SessionIntent) {
        let handles = self.session_handles.clone().expect("session view");
        self.dom
            .in_scope(ScopeId::ROOT, || handles.dispatch().call(intent));
        drive_dom(&mut self.dom);
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_user() -> User {
    User {
        id: UserId::new("u1"),
        name: "Carlos".into(),
        email: "carlos@example.com".into(),
        avatar: None,
        total_workouts: 24,
        streak: 5,
    }
}

pub fn sample_workout() -> Workout {
    Workout::new(
        WorkoutId::new("w-today"),
        "Upper Body Strength",
        fixed_now(),
        WorkoutStatus::Pending,
        0.0,
        vec![
            Exercise::new(ExerciseId::new("bench"), "Bench Press", 2, 10, 80.0, 90).unwrap(),
            Exercise::new(ExerciseId::new("pull"), "Pull-ups", 1, 12, 0.0, 60).unwrap(),
            Exercise::new(ExerciseId::new("press"), "Shoulder Press", 3, 10, 40.0, 60).unwrap(),
        ],
    )
    .unwrap()
}

pub fn sample_weeks() -> Vec<WeeklyProgress> {
    (1..=8)
        .map(|i| WeeklyProgress {
            week: format!("W{i}"),
            volume: f64::from(i) * 500.0,
            weight: 300.0,
            workouts: 3,
        })
        .collect()
}

pub fn sample_backend(storage: &Storage) -> InMemoryBackend {
    InMemoryBackend::new(storage.sessions())
        .with_account(sample_user(), "secret1")
        .with_today(sample_workout())
        .with_weekly(sample_weeks())
        .with_stats(ProgressStats {
            total_volume: 18_000.0,
            avg_weight: 300.0,
            completed_workouts: 24,
            current_streak: 5,
        })
}

pub async fn sign_in(storage: &Storage) {
    storage
        .sessions()
        .save(&AuthSession {
            user: sample_user(),
            token: AuthToken::new("token-u1"),
        })
        .await
        .expect("save session");
}

/// Signed-in harness over the sample data.
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let backend = Arc::new(sample_backend(&storage));
    setup_view_harness_with_backend(
        view,
        storage,
        backend,
        AuthStatus::SignedIn(sample_user()),
    )
}

pub fn setup_view_harness_with_backend(
    view: ViewKind,
    storage: Storage,
    backend: Arc<dyn FitnessBackend>,
    status: AuthStatus,
) -> ViewHarness {
    let app = Arc::new(AppServices::new(backend, &storage, fixed_clock()));
    let shared = SharedHandles::default();
    let session_handles = match view {
        ViewKind::Session => Some(SessionTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            status,
            shared: shared.clone(),
            session_handles: session_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        shared,
        session_handles,
    }
}
