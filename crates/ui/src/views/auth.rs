use dioxus::prelude::*;
use dioxus_router::use_navigator;
use fit_core::model::{LoginForm, RegistrationForm};

use crate::context::{AppContext, AuthState, AuthStatus};
use crate::routes::Route;
use crate::views::{ToastMessage, ToastQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn title(self) -> &'static str {
        match self {
            Self::Login => "Welcome back",
            Self::Register => "Create your account",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
        }
    }

    fn toggle_label(self) -> &'static str {
        match self {
            Self::Login => "Don't have an account? Sign up",
            Self::Register => "Already have an account? Sign in",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<AuthState>();
    let toasts = use_context::<ToastQueue>();
    let navigator = use_navigator();

    let mut mode = use_signal(|| AuthMode::Login);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    use_effect(move || {
        if matches!(*auth.0.read(), AuthStatus::SignedIn(_)) {
            navigator.replace(Route::Dashboard {});
        }
    });

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let service = ctx.auth();
        let current = mode();
        let login = LoginForm {
            email: email(),
            password: password(),
        };
        let registration = RegistrationForm {
            name: name(),
            email: email(),
            password: password(),
            confirm_password: confirm(),
        };
        submitting.set(true);
        error.set(None);
        spawn(async move {
            let result = match current {
                AuthMode::Login => service.login(login).await,
                AuthMode::Register => service.register(registration).await,
            };
            submitting.set(false);
            match result {
                Ok(session) => {
                    let greeting = format!("Signed in as {}", session.user.name);
                    toasts.push(ToastMessage::success("Welcome!", greeting));
                    auth.sign_in(session.user);
                    navigator.replace(Route::Dashboard {});
                }
                Err(err) => {
                    tracing::debug!(error = %err, "authentication failed");
                    error.set(Some(err.user_message()));
                }
            }
        });
    };

    let current = mode();
    let busy = submitting();

    rsx! {
        div { class: "page page--center auth-page",
            div { class: "auth-card",
                header { class: "view-header",
                    h1 { class: "auth-brand", "Fitness" }
                    h2 { class: "view-title", "{current.title()}" }
                }
                form { class: "auth-form", onsubmit: submit,
                    if current == AuthMode::Register {
                        label { class: "field",
                            span { "Name" }
                            input {
                                r#type: "text",
                                autocomplete: "name",
                                value: "{name}",
                                oninput: move |evt| name.set(evt.value()),
                            }
                        }
                    }
                    label { class: "field",
                        span { "Email" }
                        input {
                            r#type: "email",
                            autocomplete: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    label { class: "field",
                        span { "Password" }
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    if current == AuthMode::Register {
                        label { class: "field",
                            span { "Confirm password" }
                            input {
                                r#type: "password",
                                value: "{confirm}",
                                oninput: move |evt| confirm.set(evt.value()),
                            }
                        }
                    }
                    if let Some(message) = error() {
                        p { class: "form-error", role: "alert", "{message}" }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy,
                        if busy { "Please wait..." } else { "{current.submit_label()}" }
                    }
                }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        mode.set(mode().toggled());
                        error.set(None);
                    },
                    "{current.toggle_label()}"
                }
            }
        }
    }
}
