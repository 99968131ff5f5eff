use gitscribe_ai::DEFAULT_GEMINI_MODEL;
use gitscribe_core::QuotaLimits;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults
/// suitable for local development. In production, override via
/// environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Does not apply to
    /// the streaming generation endpoint, which has its own bounds below.
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Base URL of the repository packing service.
    pub repo_packer_url: String,
    /// Bearer token for the packing service.
    pub repo_packer_token: String,
    /// Gemini API key. May be empty when `use_mock_responses` is on.
    pub gemini_api_key: String,
    /// Gemini model name (default: `gemini-2.0-flash-001`).
    pub gemini_model: String,
    /// Daily generation ceiling for signed-in users (default: `20`).
    pub daily_limit_authenticated: i32,
    /// Daily generation ceiling per anonymous IP (default: `3`).
    pub daily_limit_anonymous: i32,
    /// Token budget passed to the packing service (default: `100000`).
    pub max_repo_tokens: u64,
    /// Upper bound on one pack call in seconds (default: `120`).
    pub packer_timeout_secs: u64,
    /// Upper bound on one AI generation stream in seconds (default: `300`).
    pub generation_timeout_secs: u64,
    /// Serve canned packer and generator responses instead of calling the
    /// external services (default: `false`).
    pub use_mock_responses: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                       |
    /// |------------------------------|-------------------------------|
    /// | `HOST`                       | `0.0.0.0`                     |
    /// | `PORT`                       | `3000`                        |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                          |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                          |
    /// | `REPO_PACKER_URL`            | `http://localhost:8000`       |
    /// | `REPO_PACKER_TOKEN`          | empty                         |
    /// | `GEMINI_API_KEY`             | empty                         |
    /// | `GEMINI_MODEL`               | `gemini-2.0-flash-001`        |
    /// | `DAILY_LIMIT_AUTHENTICATED`  | `20`                          |
    /// | `DAILY_LIMIT_ANONYMOUS`      | `3`                           |
    /// | `MAX_REPO_TOKENS`            | `100000`                      |
    /// | `PACKER_TIMEOUT_SECS`        | `120`                         |
    /// | `GENERATION_TIMEOUT_SECS`    | `300`                         |
    /// | `USE_MOCK_RESPONSES`         | `false`                       |
    ///
    /// `JWT_SECRET` is required; see [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let repo_packer_url = std::env::var("REPO_PACKER_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let repo_packer_token = std::env::var("REPO_PACKER_TOKEN").unwrap_or_default();

        let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());

        let daily_limit_authenticated: i32 = std::env::var("DAILY_LIMIT_AUTHENTICATED")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DAILY_LIMIT_AUTHENTICATED must be a valid i32");

        let daily_limit_anonymous: i32 = std::env::var("DAILY_LIMIT_ANONYMOUS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("DAILY_LIMIT_ANONYMOUS must be a valid i32");

        let max_repo_tokens: u64 = std::env::var("MAX_REPO_TOKENS")
            .unwrap_or_else(|_| "100000".into())
            .parse()
            .expect("MAX_REPO_TOKENS must be a valid u64");

        let packer_timeout_secs: u64 = std::env::var("PACKER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("PACKER_TIMEOUT_SECS must be a valid u64");

        let generation_timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        let use_mock_responses = std::env::var("USE_MOCK_RESPONSES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            repo_packer_url,
            repo_packer_token,
            gemini_api_key,
            gemini_model,
            daily_limit_authenticated,
            daily_limit_anonymous,
            max_repo_tokens,
            packer_timeout_secs,
            generation_timeout_secs,
            use_mock_responses,
        }
    }

    /// The configured ceilings as the shape the quota layer consumes.
    pub fn limits(&self) -> QuotaLimits {
        QuotaLimits {
            authenticated: self.daily_limit_authenticated,
            anonymous: self.daily_limit_anonymous,
        }
    }
}
