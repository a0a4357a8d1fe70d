#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod backend;
pub mod config;
pub mod dashboard_service;
pub mod error;
pub mod progress_service;
pub mod workout_session_service;

pub use fit_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use backend::{Endpoint, FitnessBackend, HttpBackend, InMemoryBackend, SetReport};
pub use config::ApiConfig;
pub use dashboard_service::{DashboardData, DashboardService};
pub use error::{ApiError, AppServicesError, AuthError, DashboardError, SessionServiceError};
pub use progress_service::{ProgressOverview, ProgressPeriod, ProgressService};
pub use workout_session_service::{Flushed, SetCompletion, WorkoutSessionService};
