/**
 * Server Configuration
 *
 * This module loads the server configuration from environment variables
 * (a `.env` file is honoured by the binary before this runs).
 *
 * # Lazy Secrets
 *
 * Third-party secrets (JWT secret, Hugging Face, ImgBB, Stripe) are kept as
 * `Option<String>` and are not validated at startup. The first operation
 * that needs a missing secret fails with a configuration error instead.
 *
 * # Overrides
 *
 * Every upstream base URL can be overridden, which lets tests point the
 * server at local mock servers.
 */

use std::path::PathBuf;
use std::time::Duration;

/// Default Hugging Face inference endpoint
pub const DEFAULT_HUGGINGFACE_API_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

/// Default ImgBB upload endpoint
pub const DEFAULT_IMGBB_API_URL: &str = "https://api.imgbb.com/1/upload";

/// Default Stripe API base
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Key clients on `X-Forwarded-For` instead of the peer address.
    /// Only safe behind a proxy that overwrites the header.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            trust_proxy: false,
        }
    }
}

/// Runtime configuration of the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub frontend_url: String,
    /// Deployment environment (`development`, `production`, ...)
    pub environment: Option<String>,
    pub jwt_secret: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub huggingface_api_url: String,
    pub imgbb_api_key: Option<String>,
    pub imgbb_api_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_price_yearly: Option<String>,
    pub stripe_api_base: String,
    pub static_dir: PathBuf,
    pub rate_limit: RateLimitConfig,
    /// Request body cap in bytes
    pub body_limit: usize,
    pub generation_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: "sqlite://roomcraft.db".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            environment: None,
            jwt_secret: None,
            huggingface_api_key: None,
            huggingface_api_url: DEFAULT_HUGGINGFACE_API_URL.to_string(),
            imgbb_api_key: None,
            imgbb_api_url: DEFAULT_IMGBB_API_URL.to_string(),
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_price_yearly: None,
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            static_dir: PathBuf::from("public"),
            rate_limit: RateLimitConfig::default(),
            body_limit: 10 * 1024 * 1024,
            generation_timeout: Duration::from_secs(60),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_or(key: &str, default: impl Into<String>) -> String {
    env_opt(key).unwrap_or_else(|| default.into())
}

fn env_flag(key: &str) -> bool {
    env_opt(key)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match env_opt("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|e| {
                tracing::warn!("Invalid PORT {:?} ({}), using {}", raw, e, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            port,
            database_url: env_or("DATABASE_URL", defaults.database_url),
            frontend_url: env_or("FRONTEND_URL", defaults.frontend_url),
            environment: env_opt("APP_ENV").or_else(|| env_opt("NODE_ENV")),
            jwt_secret: env_opt("JWT_SECRET"),
            huggingface_api_key: env_opt("HUGGINGFACE_API_KEY"),
            huggingface_api_url: env_or("HUGGINGFACE_API_URL", defaults.huggingface_api_url),
            imgbb_api_key: env_opt("IMGBB_API_KEY"),
            imgbb_api_url: env_or("IMGBB_API_URL", defaults.imgbb_api_url),
            stripe_secret_key: env_opt("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
            stripe_price_yearly: env_opt("STRIPE_PRICE_YEARLY"),
            stripe_api_base: env_or("STRIPE_API_BASE", defaults.stripe_api_base),
            static_dir: env_opt("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            rate_limit: RateLimitConfig {
                trust_proxy: env_flag("TRUST_PROXY"),
                ..defaults.rate_limit
            },
            ..defaults
        }
    }

    /// Internal error detail is only exposed in development
    pub fn is_development(&self) -> bool {
        self.environment.as_deref() == Some("development")
    }

    /// Environment label reported by the probe endpoint
    pub fn environment_label(&self) -> &str {
        self.environment.as_deref().unwrap_or("development")
    }

    /// Origins allowed by CORS
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            self.frontend_url.trim_end_matches('/').to_string(),
            "http://localhost:3000".to_string(),
            "http://localhost:5000".to_string(),
        ];
        origins.dedup();
        origins
    }

    pub fn checkout_success_url(&self) -> String {
        format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_url.trim_end_matches('/')
        )
    }

    pub fn checkout_cancel_url(&self) -> String {
        format!("{}/pricing", self.frontend_url.trim_end_matches('/'))
    }
}
