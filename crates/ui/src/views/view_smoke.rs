use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::ReadableExt;
use fit_core::model::{
    AuthSession, Credentials, ProgressStats, Registration, User, WeeklyProgress, Workout,
};
use fit_core::session::FinishReason;
use services::{ApiError, Endpoint, FitnessBackend, SetReport};
use storage::Storage;

use super::test_harness::{
    ViewHarness, ViewKind, sample_backend, sample_user, setup_view_harness,
    setup_view_harness_with_backend, sign_in,
};
use crate::context::AuthStatus;
use crate::vm::{SessionIntent, SessionVm};

fn has(needle: &str) -> impl Fn(&str) -> bool + '_ {
    move |html| html.contains(needle)
}

/// Text of the rest countdown, `None` when no rest card is shown.
fn rest_remaining(harness: &ViewHarness) -> Option<String> {
    const MARKER: &str = r#"class="rest-remaining">"#;
    let html = harness.render();
    let start = html.find(MARKER)? + MARKER.len();
    let end = start + html[start..].find('<')?;
    Some(html[start..end].to_owned())
}

fn rest_complete_toasts(harness: &ViewHarness) -> usize {
    harness
        .toasts()
        .iter()
        .filter(|toast| toast.title == "Rest complete")
        .count()
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_today_and_chart() {
    let mut harness = setup_view_harness(ViewKind::Dashboard).await;
    harness.rebuild();
    let html = harness.drive_until(has("Upper Body Strength")).await;

    assert!(html.contains("Welcome back, Carlos!"), "missing greeting in {html}");
    assert!(html.contains("5 day streak"), "missing streak in {html}");
    assert!(html.contains("Bench Press"), "missing exercise in {html}");
    assert!(html.contains("2 × 10 × 80 kg"), "missing detail in {html}");
    assert!(html.contains("0/3 exercises"), "missing completion in {html}");
    assert!(html.contains("Start workout"), "missing start button in {html}");
    assert!(html.contains("See progress"), "missing progress link in {html}");
    assert!(html.contains(">W8<"), "missing latest week in {html}");
    assert!(!html.contains(">W1<"), "chart should keep the last seven weeks: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_degrades_when_today_fails() {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let backend = sample_backend(&storage);
    backend.fail(Endpoint::TodayWorkout, 500);
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Dashboard,
        storage,
        Arc::new(backend),
        AuthStatus::SignedIn(sample_user()),
    );
    harness.rebuild();
    let html = harness
        .drive_until(has("No workout scheduled for today."))
        .await;

    assert!(html.contains("Weekly volume"), "missing chart in {html}");
    let toasts = harness.toasts();
    assert_eq!(toasts.len(), 1, "{toasts:?}");
    assert_eq!(toasts[0].description, "Could not load today's workout");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_signs_out_on_expired_token() {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let backend = sample_backend(&storage);
    backend.fail(Endpoint::WeeklyProgress, 401);
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Dashboard,
        storage.clone(),
        Arc::new(backend),
        AuthStatus::SignedIn(sample_user()),
    );
    harness.rebuild();
    harness.drive_until(|_| false).await;

    assert_eq!(storage.sessions().load().await.unwrap(), None);
    assert_eq!(harness.auth_status(), AuthStatus::SignedOut);
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_renders_stats_and_tabs() {
    let mut harness = setup_view_harness(ViewKind::Progress).await;
    harness.rebuild();
    let html = harness.drive_until(has("Total volume")).await;

    assert!(html.contains("18000 kg"), "missing volume in {html}");
    assert!(html.contains("300.0 kg"), "missing average in {html}");
    assert!(html.contains("5 days"), "missing streak in {html}");
    assert!(html.contains("Weekly volume"), "missing chart title in {html}");
    assert!(html.contains("Month"), "missing month tab in {html}");
    assert!(html.contains(">W1<"), "week tab shows every week: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn auth_view_smoke_renders_login_form() {
    let storage = Storage::in_memory();
    let backend = sample_backend(&storage);
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Auth,
        storage,
        Arc::new(backend),
        AuthStatus::SignedOut,
    );
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Welcome back"), "missing title in {html}");
    assert!(html.contains("Sign in"), "missing submit in {html}");
    assert!(html.contains("Sign up"), "missing toggle in {html}");
    assert!(!html.contains("Confirm password"), "login hides confirm: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_starts_todays_workout() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    let html = harness.drive_until(has("Complete set")).await;

    assert!(html.contains("Upper Body Strength"), "missing workout in {html}");
    assert!(html.contains("Exercise 1 of 3"), "missing position in {html}");
    assert!(html.contains("Set 1 of 2"), "missing set label in {html}");
    assert!(html.contains("Up next"), "missing preview in {html}");
    assert!(html.contains("Pull-ups"), "missing next exercise in {html}");
    assert!(html.contains("Shoulder Press"), "missing second preview in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_rest_controls_and_reports() {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let backend = sample_backend(&storage);
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Session,
        storage,
        Arc::new(backend.clone()),
        AuthStatus::SignedIn(sample_user()),
    );
    harness.rebuild();
    harness.drive_until(has("Complete set")).await;

    harness.dispatch(SessionIntent::CompleteSet);
    let html = harness.render();
    assert!(html.contains("1:30"), "missing countdown in {html}");
    assert!(html.contains("Pause"), "missing pause in {html}");
    assert!(html.contains("Skip rest"), "missing skip in {html}");
    assert!(!html.contains("Complete set"), "no set while resting: {html}");

    harness.dispatch(SessionIntent::ToggleRest);
    assert!(harness.render().contains("Resume"));

    harness.dispatch(SessionIntent::SkipRest);
    let html = harness.render();
    assert!(html.contains("Set 2 of 2"), "missing second set in {html}");

    harness.dispatch(SessionIntent::CompleteSet);
    let html = harness.render();
    assert!(html.contains("Exercise 2 of 3"), "missing advance in {html}");
    assert!(
        harness
            .toasts()
            .iter()
            .any(|toast| toast.title == "Exercise complete!")
    );

    for _ in 0..10 {
        if backend.reports().len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(backend.reports().len(), 2);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn session_view_smoke_rest_runs_to_completion() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    harness.drive_until(has("Complete set")).await;

    harness.dispatch(SessionIntent::CompleteSet);
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:30"));

    harness.advance_secs(1).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:29"));

    harness.advance_secs(88).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("0:01"));
    assert_eq!(rest_complete_toasts(&harness), 0);

    harness.advance_secs(1).await;
    let html = harness.render();
    assert_eq!(rest_remaining(&harness), None, "rest card should close: {html}");
    assert!(html.contains("Complete set"), "missing set button in {html}");
    assert!(html.contains("Set 2 of 2"), "missing second set in {html}");
    assert_eq!(rest_complete_toasts(&harness), 1);

    harness.advance_secs(5).await;
    assert_eq!(rest_complete_toasts(&harness), 1);
    assert!(harness.render().contains("Set 2 of 2"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn session_view_smoke_resume_waits_a_full_second() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    harness.drive_until(has("Complete set")).await;

    harness.dispatch(SessionIntent::CompleteSet);
    harness.advance(Duration::from_millis(1500)).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:29"));

    harness.dispatch(SessionIntent::ToggleRest);
    harness.advance_secs(1).await;
    harness.advance(Duration::from_millis(500)).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:29"));
    assert!(harness.render().contains("Resume"));

    harness.dispatch(SessionIntent::ToggleRest);
    harness.advance(Duration::from_millis(600)).await;
    assert_eq!(
        rest_remaining(&harness).as_deref(),
        Some("1:29"),
        "first tick after resume came early"
    );
    harness.advance(Duration::from_millis(400)).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:28"));

    harness.dispatch(SessionIntent::ResetRest);
    harness.advance_secs(3).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:30"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn session_view_smoke_skip_stops_the_countdown() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    harness.drive_until(has("Complete set")).await;

    harness.dispatch(SessionIntent::CompleteSet);
    harness.advance_secs(3).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:27"));

    harness.dispatch(SessionIntent::SkipRest);
    harness.advance_secs(100).await;
    let html = harness.render();
    assert_eq!(rest_remaining(&harness), None, "skipped rest came back: {html}");
    assert!(html.contains("Set 2 of 2"), "missing second set in {html}");
    assert_eq!(rest_complete_toasts(&harness), 0);

    // Bench Press, then the single Pull-ups set, then the first press set.
    harness.dispatch(SessionIntent::CompleteSet);
    harness.dispatch(SessionIntent::CompleteSet);
    harness.dispatch(SessionIntent::CompleteSet);
    assert!(harness.render().contains("Exercise 3 of 3"));
    assert_eq!(rest_remaining(&harness).as_deref(), Some("1:00"));

    harness.advance_secs(1).await;
    assert_eq!(rest_remaining(&harness).as_deref(), Some("0:59"));
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_abandon_finishes_session() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    harness.drive_until(has("Complete set")).await;

    harness.dispatch(SessionIntent::Abandon);

    let handles = harness.session_handles.clone().unwrap();
    let reason = harness
        .dom
        .in_runtime(|| handles.vm().peek().as_ref().and_then(SessionVm::finish_reason));
    assert_eq!(reason, Some(FinishReason::Abandoned));
    assert!(
        harness
            .toasts()
            .iter()
            .any(|toast| toast.title == "Workout ended")
    );
}

struct FailingBackend;

#[async_trait::async_trait]
impl FitnessBackend for FailingBackend {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthSession, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthSession, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn today_workout(&self) -> Result<Option<Workout>, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn weekly_progress(&self) -> Result<Vec<WeeklyProgress>, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn profile(&self) -> Result<User, ApiError> {
        Err(ApiError::Status(503))
    }

    async fn complete_set(&self, _report: &SetReport) -> Result<(), ApiError> {
        Err(ApiError::Status(503))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_degrades_when_backend_is_down() {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Progress,
        storage,
        Arc::new(FailingBackend),
        AuthStatus::SignedIn(sample_user()),
    );
    harness.rebuild();
    let html = harness.drive_until(has("Total volume")).await;

    assert!(html.contains("0 kg"), "missing zero volume in {html}");
    assert!(html.contains("0 days"), "missing zero streak in {html}");
    assert!(html.contains("No progress recorded yet."), "missing empty chart in {html}");
    assert_eq!(harness.toasts().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_reports_missing_workout() {
    let storage = Storage::in_memory();
    sign_in(&storage).await;
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Session,
        storage,
        Arc::new(FailingBackend),
        AuthStatus::SignedIn(sample_user()),
    );
    harness.rebuild();
    let html = harness
        .drive_until(has("No workout scheduled for today."))
        .await;

    assert!(html.contains("Back to dashboard"), "missing back button in {html}");
}
