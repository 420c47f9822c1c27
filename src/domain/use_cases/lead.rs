use serde_json::Value;

use crate::{
    email::resend::Mailer,
    entities::lead::{LeadResponse, LeadSubmission},
    errors::AppError,
    use_cases::notify::compose_notification,
};

pub struct LeadHandler<M>
where
    M: Mailer,
{
    pub mailer: M,
    recipient: String,
    sender: String,
}

impl<M> LeadHandler<M>
where
    M: Mailer,
{
    pub fn new(mailer: M, recipient: String, sender: String) -> Self {
        LeadHandler {
            mailer,
            recipient,
            sender,
        }
    }

    /// Validates a raw submission, composes the notification, and
    /// dispatches it. Validation happens before any side effect, so a bad
    /// submission never reaches the provider.
    pub async fn submit_lead(&self, body: &Value) -> Result<LeadResponse, AppError> {
        let lead = LeadSubmission::try_from(body)?;

        let notification = compose_notification(&lead, &self.recipient, &self.sender)?;

        let receipt = self.mailer.send(&notification).await?;

        Ok(LeadResponse {
            success: true,
            id: receipt.id,
        })
    }
}
