use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::{env, fmt, str::FromStr};

use crate::constants::{DEFAULT_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_api_key")]
    pub resend_api_key: Secret<String>,

    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,

    #[serde(default = "default_recipient")]
    pub lead_recipient_email: String,

    #[serde(default = "default_from")]
    pub lead_from_email: String,

    #[serde(default = "default_trust_forwarded")]
    pub trust_forwarded_headers: bool,

    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "NesHaTamar-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_api_key() -> Secret<String> {
    Secret::new(String::new())
}
fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_recipient() -> String {
    "Nissimkrispiltamar@gmail.com".to_string()
}
fn default_from() -> String {
    "Nes HaTamar Website <onboarding@resend.dev>".to_string()
}
fn default_trust_forwarded() -> bool {
    true
}
fn default_rate_limit_max() -> u32 {
    DEFAULT_RATE_LIMIT_MAX_REQUESTS
}
fn default_rate_limit_window() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_SECS
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject the delivery credential from the environment if the file
        // sources left it empty.
        if config.resend_api_key.expose_secret().trim().is_empty() {
            let key = env::var("APP_RESEND_API_KEY")
                .map_err(|_| ConfigError::Message("APP_RESEND_API_KEY must be set".into()))?;
            config.resend_api_key = Secret::new(key);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.resend_api_key.expose_secret().trim().is_empty() {
            errors.push("RESEND_API_KEY cannot be empty");
        }
        if self.lead_recipient_email.trim().is_empty() {
            errors.push("LEAD_RECIPIENT_EMAIL cannot be empty");
        }
        if self.lead_from_email.trim().is_empty() {
            errors.push("LEAD_FROM_EMAIL cannot be empty");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            resend_api_key: default_api_key(),
            resend_base_url: default_resend_base_url(),
            lead_recipient_email: default_recipient(),
            lead_from_email: default_from(),
            trust_forwarded_headers: default_trust_forwarded(),
            rate_limit_max_requests: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window(),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("resend_api_key", &"[REDACTED]")
            .field("resend_base_url", &self.resend_base_url)
            .field("lead_recipient_email", &self.lead_recipient_email)
            .field("lead_from_email", &self.lead_from_email)
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
