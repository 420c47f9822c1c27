use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::Value;

use crate::{
    errors::AppError,
    limiter::rate_limiter::RateLimitDecision,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// The lead-capture endpoint. Order matters: the rate limit is consulted
/// before the body is even parsed, so abusive clients cannot probe
/// validation for free.
#[post("/lead-capture")]
#[tracing::instrument(
    name = "Capturing a new lead",
    skip(state, req, body),
    fields(client_ip = tracing::field::Empty)
)]
pub async fn create_lead(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let ip = get_client_ip(&req, state.trust_forwarded_headers);
    tracing::Span::current().record("client_ip", tracing::field::display(&ip));

    if let RateLimitDecision::Denied { retry_after_secs } = state.rate_limiter.check(&ip) {
        tracing::warn!("Rate limit exceeded, retry in {retry_after_secs}s");
        return Err(AppError::RateLimited { retry_after_secs });
    }

    // An unreadable body means the form collaborator is broken, not the
    // user; surfaced as a server error, never a validation message.
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::InternalError(format!("Unreadable request body: {e}")))?;

    let response = state.lead_handler.submit_lead(&body).await?;

    Ok(HttpResponse::Ok().json(response))
}
