use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// `root` is the backend origin; the `/api` prefix is appended.
    #[must_use]
    pub fn new(root: &str, timeout: Duration) -> Self {
        let root = root.trim().trim_end_matches('/');
        let base_url = if root.ends_with("/api") {
            root.to_owned()
        } else {
            format!("{root}/api")
        };
        Self { base_url, timeout }
    }

    /// Reads `FITNESS_API_URL` and `FITNESS_API_TIMEOUT_SECS`, falling back to
    /// defaults for missing or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let root = env::var("FITNESS_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout = env::var("FITNESS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(&root, Duration::from_secs(timeout))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}
