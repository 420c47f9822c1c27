use once_cell::sync::Lazy;
use tera::Tera;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, routes};
pub use infrastructure::{email, limiter, utils};

use std::sync::Arc;
use std::time::Duration;

use email::resend::ResendMailer;
use limiter::rate_limiter::FixedWindowLimiter;
use use_cases::lead::LeadHandler;

/// Shared template registry. Forced in `main` so a broken template is a
/// startup failure rather than a per-request 500.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| match Tera::new("templates/**/*.html") {
    Ok(tera) => tera,
    Err(e) => {
        tracing::error!("Template parsing error(s): {e}");
        std::process::exit(1);
    }
});

pub struct AppState {
    pub lead_handler: AppLeadHandler,
    pub rate_limiter: Arc<FixedWindowLimiter>,
    pub trust_forwarded_headers: bool,
}

pub type AppLeadHandler = LeadHandler<ResendMailer>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> anyhow::Result<Self> {
        let mailer = ResendMailer::new(&config.resend_base_url, config.resend_api_key.clone())?;
        let lead_handler = LeadHandler::new(
            mailer,
            config.lead_recipient_email.clone(),
            config.lead_from_email.clone(),
        );
        let rate_limiter = Arc::new(FixedWindowLimiter::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        ));

        Ok(AppState {
            lead_handler,
            rate_limiter,
            trust_forwarded_headers: config.trust_forwarded_headers,
        })
    }
}
