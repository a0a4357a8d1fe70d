use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use fit_core::session::{ClockToken, FinishReason, Tick};
use services::WorkoutSessionService;

use crate::context::{AppContext, AuthState, SelectedWorkout};
use crate::routes::Route;
use crate::views::{ToastMessage, ToastQueue, ViewError, ViewState, view_state_from_resource};
use crate::vm::{SessionIntent, SessionVm};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// The one in-flight countdown task, keyed by the countdown it serves.
///
/// A task only exists while the countdown runs. Pausing drops it and resuming
/// spawns a fresh one, so the first tick after a resume is a full second away.
#[derive(Clone, Default)]
struct Ticker(Rc<RefCell<Option<(ClockToken, Task)>>>);

impl Ticker {
    fn token(&self) -> Option<ClockToken> {
        self.0.borrow().as_ref().map(|(token, _)| *token)
    }

    fn replace(&self, token: ClockToken, task: Task) {
        self.cancel();
        *self.0.borrow_mut() = Some((token, task));
    }

    fn cancel(&self) {
        let previous = self.0.borrow_mut().take();
        if let Some((_, task)) = previous {
            task.cancel();
        }
    }

    /// Forget a task that ended on its own, unless it was already superseded.
    fn finished(&self, token: ClockToken) {
        let mut slot = self.0.borrow_mut();
        if slot.as_ref().is_some_and(|(live, _)| *live == token) {
            *slot = None;
        }
    }
}

async fn run_countdown(
    token: ClockToken,
    mut vm: Signal<Option<SessionVm>>,
    runner: Arc<WorkoutSessionService>,
    toasts: ToastQueue,
    ticker: Ticker,
) {
    loop {
        tokio::time::sleep(TICK_INTERVAL).await;
        let Some((tick, toast)) = vm.write().as_mut().map(|session| session.tick(token, &runner))
        else {
            break;
        };
        if let Some(toast) = toast {
            toasts.push(toast);
        }
        match tick {
            Tick::Counting { .. } => {}
            Tick::Completed | Tick::Ignored => break,
        }
    }
    ticker.finished(token);
}

#[component]
pub fn SessionView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<AuthState>();
    let toasts = use_context::<ToastQueue>();
    let selected = use_context::<SelectedWorkout>();
    let navigator = use_navigator();
    let runner = ctx.workout_sessions();
    let dashboard = ctx.dashboard();

    let vm = use_signal(|| None::<SessionVm>);
    let mut error = use_signal(|| None::<ViewError>);
    let ticker = use_hook(Ticker::default);

    {
        let ticker = ticker.clone();
        use_drop(move || ticker.cancel());
    }

    let resource = {
        let runner = Arc::clone(&runner);
        use_resource(move || {
            let runner = Arc::clone(&runner);
            let dashboard = dashboard.clone();
            let mut vm = vm;
            async move {
                let workout = match selected.take() {
                    Some(workout) => workout,
                    None => dashboard
                        .load()
                        .await
                        .map_err(ViewError::from)?
                        .today
                        .ok_or(ViewError::NoWorkout)?,
                };
                vm.set(Some(SessionVm::start(&runner, workout)?));
                Ok::<_, ViewError>(())
            }
        })
    };

    let state = view_state_from_resource(&resource);

    use_effect(move || {
        if let ViewState::Error(ViewError::SessionExpired) = view_state_from_resource(&resource) {
            auth.sign_out();
        }
    });

    let sync_ticker = {
        let runner = Arc::clone(&runner);
        let ticker = ticker.clone();
        use_callback(move |()| {
            let live = vm.peek().as_ref().and_then(SessionVm::ticking_token);
            if live.is_some() && live == ticker.token() {
                return;
            }
            ticker.cancel();
            if let Some(token) = live {
                let task = spawn(run_countdown(
                    token,
                    vm,
                    Arc::clone(&runner),
                    toasts,
                    ticker.clone(),
                ));
                ticker.replace(token, task);
            }
        })
    };

    let dispatch_intent = {
        let runner = Arc::clone(&runner);
        let ticker = ticker.clone();
        use_callback(move |intent: SessionIntent| {
            let mut vm = vm;
            let result = match vm.write().as_mut() {
                Some(session) => session.dispatch(intent, &runner),
                None => Err(ViewError::Unknown),
            };
            match result {
                Ok(messages) => {
                    error.set(None);
                    toasts.extend(messages);
                }
                Err(err) => error.set(Some(err)),
            }

            let finished = vm.peek().as_ref().and_then(SessionVm::finish_reason);
            match finished {
                Some(reason) => {
                    ticker.cancel();
                    if reason == FinishReason::Abandoned {
                        toasts.push(ToastMessage::info(
                            "Workout ended",
                            "Your completed sets were saved.",
                        ));
                    }
                    navigator.push(Route::Dashboard {});
                }
                None => sync_ticker.call(()),
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SessionTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let snapshot = vm.read().as_ref().map(|session| {
        (
            session.header(),
            session.current(),
            session.rest(),
            session.upcoming(),
        )
    });

    rsx! {
        div { class: "page session-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            navigator.push(Route::Dashboard {});
                        },
                        "Back to dashboard"
                    }
                },
                ViewState::Ready(()) => match snapshot {
                    None => rsx! {
                        p { "Loading..." }
                    },
                    Some((header, current, rest, upcoming)) => rsx! {
                        header { class: "session-header",
                            h2 { class: "view-title", "{header.workout_name}" }
                            p { class: "view-subtitle", "{header.position_label}" }
                            div { class: "progress-bar",
                                div { class: "progress-bar__fill", width: "{header.progress_percent}%" }
                            }
                        }
                        section { class: "card exercise-card",
                            if let Some(src) = current.image.clone() {
                                img { class: "exercise-image", src: "{src}", alt: "{current.name}" }
                            }
                            h3 { class: "exercise-title", "{current.name}" }
                            p { class: "exercise-detail", "{current.detail}" }
                            div { class: "exercise-meta",
                                span { class: "set-label", "{current.set_label}" }
                                span { class: "rest-label", "{current.rest_label}" }
                            }
                        }
                        if let Some(err) = error() {
                            p { class: "form-error", role: "alert", "{err.message()}" }
                        }
                        match rest {
                            Some(rest) => rsx! {
                                section { class: "card rest-card",
                                    p { class: "rest-caption", "Rest" }
                                    p { class: "rest-remaining", "{rest.remaining_label}" }
                                    div { class: "rest-actions",
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: move |_| dispatch_intent.call(SessionIntent::ToggleRest),
                                            if rest.running { "Pause" } else { "Resume" }
                                        }
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: move |_| dispatch_intent.call(SessionIntent::ResetRest),
                                            "Reset"
                                        }
                                        button {
                                            class: "btn btn-primary",
                                            r#type: "button",
                                            onclick: move |_| dispatch_intent.call(SessionIntent::SkipRest),
                                            "Skip rest"
                                        }
                                    }
                                }
                            },
                            None => rsx! {
                                div { class: "session-actions",
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(SessionIntent::CompleteSet),
                                        "Complete set"
                                    }
                                }
                            },
                        }
                        if !upcoming.is_empty() {
                            section { class: "card upcoming-card",
                                h3 { "Up next" }
                                ul { class: "exercise-list",
                                    for row in upcoming.iter() {
                                        li { class: "exercise-row",
                                            span { class: "exercise-name", "{row.name}" }
                                            span { class: "exercise-detail", "{row.detail}" }
                                        }
                                    }
                                }
                            }
                        }
                        button {
                            class: "btn btn-danger",
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(SessionIntent::Abandon),
                            "End workout"
                        }
                    },
                },
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SessionTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SessionVm>>>>>,
}

#[cfg(test)]
impl SessionTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<SessionIntent>,
        vm: Signal<Option<SessionVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionIntent> {
        (*self.dispatch.borrow()).expect("session dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<SessionVm>> {
        (*self.vm.borrow()).expect("session vm registered")
    }
}
