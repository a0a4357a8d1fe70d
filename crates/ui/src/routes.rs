use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::{AppContext, AuthState, AuthStatus};
use crate::views::{AuthView, DashboardView, ProgressView, SessionView, ToastMessage, ToastQueue};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/auth", AuthView)] Auth {},
    #[layout(Protected)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/session", SessionView)] Session {},
        #[route("/progress", ProgressView)] Progress {},
}

/// What a protected route does for a given sign-in state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Wait,
    Allow,
    RedirectToAuth,
}

#[must_use]
pub fn guard(status: &AuthStatus) -> GuardDecision {
    match status {
        AuthStatus::Checking => GuardDecision::Wait,
        AuthStatus::SignedIn(_) => GuardDecision::Allow,
        AuthStatus::SignedOut => GuardDecision::RedirectToAuth,
    }
}

#[component]
fn Protected() -> Element {
    let auth = use_context::<AuthState>();
    let navigator = use_navigator();

    use_effect(move || {
        if guard(&auth.0.read()) == GuardDecision::RedirectToAuth {
            navigator.replace(Route::Auth {});
        }
    });

    match guard(&auth.0.read()) {
        GuardDecision::Wait => rsx! {
            div { class: "page page--center",
                p { "Loading..." }
            }
        },
        GuardDecision::RedirectToAuth => rsx! {},
        GuardDecision::Allow => rsx! {
            div { class: "app",
                main { class: "content",
                    Outlet::<Route> {}
                }
                BottomNav {}
            }
        },
    }
}

#[component]
fn BottomNav() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<AuthState>();
    let toasts = use_context::<ToastQueue>();
    let navigator = use_navigator();

    let logout = move |_| {
        let service = ctx.auth();
        spawn(async move {
            if let Err(err) = service.logout().await {
                tracing::warn!(error = %err, "failed to clear stored session");
                toasts.push(ToastMessage::error("Sign out", err.user_message()));
            }
            auth.sign_out();
            navigator.replace(Route::Auth {});
        });
    };

    rsx! {
        nav { class: "bottom-nav",
            Link { class: "bottom-nav__item", to: Route::Dashboard {}, "Dashboard" }
            Link { class: "bottom-nav__item", to: Route::Progress {}, "Progress" }
            button {
                class: "bottom-nav__item bottom-nav__logout",
                r#type: "button",
                onclick: logout,
                "Logout"
            }
        }
    }
}
