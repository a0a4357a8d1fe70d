use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use fit_core::model::Workout;
use services::DashboardData;

use crate::context::{AppContext, AuthState, SelectedWorkout};
use crate::routes::Route;
use crate::views::{ToastMessage, ToastQueue, ViewError, ViewState, view_state_from_resource};
use crate::vm::{BarVm, WorkoutCardVm, map_greeting, map_volume_bars, map_workout_card};

#[derive(Clone, Debug, PartialEq)]
struct DashboardModel {
    today: Option<(Workout, WorkoutCardVm)>,
    bars: Vec<BarVm>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<AuthState>();
    let toasts = use_context::<ToastQueue>();
    let selected = use_context::<SelectedWorkout>();
    let navigator = use_navigator();
    let dashboard = ctx.dashboard();

    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        async move {
            let data: DashboardData = dashboard.load().await.map_err(ViewError::from)?;
            for notice in &data.notices {
                toasts.push(ToastMessage::error("Connection problem", notice.as_str()));
            }
            if let Some(user) = data.user.clone() {
                auth.sign_in(user);
            }
            Ok::<_, ViewError>(DashboardModel {
                bars: map_volume_bars(data.recent_weeks()),
                today: data.today.map(|workout| {
                    let card = map_workout_card(&workout);
                    (workout, card)
                }),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    use_effect(move || {
        if let ViewState::Error(ViewError::SessionExpired) = view_state_from_resource(&resource) {
            tracing::info!("session expired, returning to sign in");
            auth.sign_out();
        }
    });

    let greeting = map_greeting(auth.status().user());

    rsx! {
        div { class: "page dashboard-page",
            header { class: "view-header dashboard-header",
                div { class: "avatar", "{greeting.initial}" }
                div {
                    h2 { class: "view-title", "{greeting.title}" }
                    p { class: "view-subtitle", "Ready for today's training?" }
                }
            }
            div { class: "stat-row",
                div { class: "stat-card",
                    span { class: "stat-label", "Streak" }
                    span { class: "stat-value", "{greeting.streak_label}" }
                }
                div { class: "stat-card",
                    span { class: "stat-label", "Total" }
                    span { class: "stat-value", "{greeting.total_label}" }
                }
            }

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
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(model) => {
                    let today = match model.today {
                        Some((workout, card)) => rsx! {
                            TodayCard {
                                card,
                                on_start: move |()| {
                                    selected.select(workout.clone());
                                    navigator.push(Route::Session {});
                                },
                            }
                        },
                        None => rsx! {
                            section { class: "card today-card today-card--empty",
                                h3 { "Today's workout" }
                                p { "{ViewError::NoWorkout.message()}" }
                            }
                        },
                    };
                    rsx! {
                        {today}
                        section { class: "card weekly-card",
                            header { class: "card-header",
                                h3 { "Weekly volume" }
                                Link { class: "card-link", to: Route::Progress {}, "See progress" }
                            }
                            VolumeChart { bars: model.bars, compact: true }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TodayCard(card: WorkoutCardVm, on_start: EventHandler<()>) -> Element {
    rsx! {
        section { class: "card today-card",
            header { class: "card-header",
                div {
                    h3 { "{card.name}" }
                    p { class: "card-subtitle", "{card.date_label}" }
                }
                span { class: "status-pill status-pill--{card.status_label}", "{card.status_label}" }
            }
            ul { class: "exercise-list",
                for row in card.exercises.iter() {
                    li { class: if row.completed { "exercise-row exercise-row--done" } else { "exercise-row" },
                        span { class: "exercise-name", "{row.name}" }
                        span { class: "exercise-detail", "{row.detail}" }
                    }
                }
            }
            div { class: "progress-line",
                span { "{card.completed_label}" }
                div { class: "progress-bar",
                    div { class: "progress-bar__fill", width: "{card.progress_percent}%" }
                }
            }
            if card.can_start {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_start.call(()),
                    "Start workout"
                }
            } else {
                p { class: "card-note", "All exercises done for today." }
            }
        }
    }
}

/// Volume bars scaled to the tallest bucket.
#[component]
pub fn VolumeChart(bars: Vec<BarVm>, compact: bool) -> Element {
    if bars.is_empty() {
        return rsx! {
            p { class: "chart-empty", "No progress recorded yet." }
        };
    }
    rsx! {
        div { class: if compact { "bar-chart bar-chart--compact" } else { "bar-chart" },
            for bar in bars.iter() {
                div { class: "bar-chart__column", title: "{bar.value:.0} kg",
                    div { class: "bar-chart__track",
                        div { class: "bar-chart__bar", height: "{bar.height_percent}%" }
                    }
                    span { class: "bar-chart__label", "{bar.label}" }
                }
            }
        }
    }
}
