use actix_web::{
    error::ResponseError,
    http::{
        StatusCode,
        header::{self, ContentType},
    },
    HttpResponse,
};
use derive_more::Display;

/// Everything the lead-capture path can fail with. `Display` is the
/// client-facing message; internal detail stays in the payload and is
/// only ever logged.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("Email or phone number is required")]
    MissingContact,

    #[display("At least one interest must be selected")]
    MissingInterest,

    #[display("Invalid email format")]
    InvalidEmailFormat,

    #[display("Invalid phone format")]
    InvalidPhoneFormat,

    #[display("Invalid {_0} type")]
    InvalidFieldType(&'static str),

    #[display("Too many requests. Please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[display("Failed to send email")]
    EmailDelivery(String),

    #[display("Internal server error")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::EmailDelivery(detail) => {
                tracing::error!("Email delivery failed: {detail}");
            }
            AppError::InternalError(detail) => {
                tracing::error!("Internal error: {detail}");
            }
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());
        if let AppError::RateLimited { retry_after_secs } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        builder.json(serde_json::json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingContact
            | AppError::MissingInterest
            | AppError::InvalidEmailFormat
            | AppError::InvalidPhoneFormat
            | AppError::InvalidFieldType(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::EmailDelivery(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
