use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::{AppContext, AuthState, AuthStatus, SelectedWorkout};
use crate::routes::Route;
use crate::views::{ToastHost, ToastQueue};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context_provider(|| AuthState(Signal::new(AuthStatus::Checking)));
    use_context_provider(ToastQueue::new);
    use_context_provider(|| SelectedWorkout(Signal::new(None)));

    use_future(move || {
        let service = ctx.auth();
        async move {
            match service.restore().await {
                Ok(Some(session)) => auth.sign_in(session.user),
                Ok(None) => auth.sign_out(),
                Err(err) => {
                    tracing::warn!(error = %err, "could not read stored session");
                    auth.sign_out();
                }
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Fitness" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
            ToastHost {}
        }
    }
}
