use std::time::Duration;

use dioxus::prelude::*;

/// How long a toast stays on screen unless dismissed.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Info,
    Success,
    Error,
}

impl ToastVariant {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "toast toast--info",
            Self::Success => "toast toast--success",
            Self::Error => "toast toast--error",
        }
    }
}

/// Non-blocking notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl ToastMessage {
    #[must_use]
    pub fn new(
        variant: ToastVariant,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastVariant::Info, title, description)
    }

    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastVariant::Success, title, description)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastVariant::Error, title, description)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ToastEntry {
    id: u64,
    message: ToastMessage,
}

/// App-wide toast list, provided as context.
#[derive(Clone, Copy, PartialEq)]
pub struct ToastQueue {
    entries: Signal<Vec<ToastEntry>>,
    next_id: Signal<u64>,
}

impl ToastQueue {
    /// Must be called from a component scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        }
    }

    pub fn push(mut self, message: ToastMessage) {
        let id = *self.next_id.peek();
        self.next_id.set(id + 1);
        self.entries.write().push(ToastEntry { id, message });
    }

    pub fn extend(self, messages: impl IntoIterator<Item = ToastMessage>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn dismiss(mut self, id: u64) {
        self.entries.write().retain(|entry| entry.id != id);
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ToastMessage> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ToastHost() -> Element {
    let queue = use_context::<ToastQueue>();
    let entries = queue.entries.read().clone();

    rsx! {
        div { class: "toast-host", role: "status",
            for entry in entries {
                ToastItem { key: "{entry.id}", id: entry.id, message: entry.message }
            }
        }
    }
}

#[component]
fn ToastItem(id: u64, message: ToastMessage) -> Element {
    let queue = use_context::<ToastQueue>();
    use_future(move || async move {
        tokio::time::sleep(TOAST_TTL).await;
        queue.dismiss(id);
    });

    rsx! {
        div { class: message.variant.class(),
            div { class: "toast-body",
                strong { class: "toast-title", "{message.title}" }
                if !message.description.is_empty() {
                    p { class: "toast-description", "{message.description}" }
                }
            }
            button {
                class: "toast-close",
                r#type: "button",
                aria_label: "Dismiss",
                onclick: move |_| queue.dismiss(id),
                "×"
            }
        }
    }
}
