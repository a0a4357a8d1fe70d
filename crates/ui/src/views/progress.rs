use dioxus::prelude::*;
use services::{ProgressOverview, ProgressPeriod};

use super::dashboard::VolumeChart;
use crate::context::{AppContext, AuthState};
use crate::views::{ToastMessage, ToastQueue, ViewError, ViewState, view_state_from_resource};
use crate::vm::map_progress;

const PERIODS: [ProgressPeriod; 2] = [ProgressPeriod::Week, ProgressPeriod::Month];

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<AuthState>();
    let toasts = use_context::<ToastQueue>();
    let progress = ctx.progress();
    let mut period = use_signal(ProgressPeriod::default);

    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let overview: ProgressOverview = progress.load().await.map_err(ViewError::from)?;
            for notice in &overview.notices {
                toasts.push(ToastMessage::error("Connection problem", notice.as_str()));
            }
            Ok::<_, ViewError>(overview)
        }
    });

    let state = view_state_from_resource(&resource);

    use_effect(move || {
        if let ViewState::Error(ViewError::SessionExpired) = view_state_from_resource(&resource) {
            auth.sign_out();
        }
    });

    let selected = period();

    rsx! {
        div { class: "page progress-page",
            header { class: "view-header",
                h2 { class: "view-title", "Progress" }
                p { class: "view-subtitle", "Track your training over time." }
            }
            div { class: "tabs", role: "tablist",
                for option in PERIODS {
                    button {
                        class: if option == selected { "tab tab--active" } else { "tab" },
                        r#type: "button",
                        role: "tab",
                        onclick: move |_| period.set(option),
                        "{option.label()}"
                    }
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
                ViewState::Ready(overview) => {
                    let vm = map_progress(&overview, selected);
                    rsx! {
                        div { class: "stat-grid",
                            for stat in vm.stats.iter() {
                                div { class: "stat-card",
                                    span { class: "stat-label", "{stat.label}" }
                                    span { class: "stat-value", "{stat.value}" }
                                }
                            }
                        }
                        section { class: "card",
                            h3 { "{vm.period.label()}ly volume" }
                            VolumeChart { bars: vm.bars, compact: false }
                        }
                    }
                }
            }
        }
    }
}
