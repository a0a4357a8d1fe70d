mod auth;
mod dashboard;
mod progress;
mod session;
mod state;
mod toasts;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::AuthView;
pub use dashboard::DashboardView;
pub use progress::ProgressView;
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use toasts::{TOAST_TTL, ToastHost, ToastMessage, ToastQueue, ToastVariant};
