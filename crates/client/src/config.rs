use crate::api::ClientError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`DashboardApi`](crate::api::DashboardApi).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the dashboard API, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `GRANTBOARD_API_URL`      | `http://localhost:3000`  |
    /// | `GRANTBOARD_TOKEN`        | unset                    |
    /// | `GRANTBOARD_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("GRANTBOARD_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let token = std::env::var("GRANTBOARD_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let timeout_secs = match std::env::var("GRANTBOARD_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ClientError::Config(format!("GRANTBOARD_TIMEOUT_SECS must be a valid u64, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            token,
            timeout_secs,
        })
    }
}
