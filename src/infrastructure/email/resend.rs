use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use crate::{entities::notification::NotificationEmail, errors::AppError};

/// Dispatch failure past this point is a provider problem, not ours.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// What the delivery provider acknowledged for a dispatched message.
#[derive(Debug, Default)]
pub struct DeliveryReceipt {
    pub id: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &NotificationEmail) -> Result<DeliveryReceipt, AppError>;
}

/// Client for the Resend HTTP API.
pub struct ResendMailer {
    http_client: Client,
    base_url: Url,
    api_key: Secret<String>,
}

impl ResendMailer {
    pub fn new(base_url: &str, api_key: Secret<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid email provider base url: {base_url}"))?;
        let http_client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("Failed to build the email provider HTTP client")?;

        Ok(ResendMailer {
            http_client,
            base_url,
            api_key,
        })
    }
}

#[derive(Debug, serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &NotificationEmail) -> Result<DeliveryReceipt, AppError> {
        let url = self
            .base_url
            .join("emails")
            .map_err(|e| AppError::InternalError(format!("Invalid send endpoint url: {e}")))?;

        let request_body = SendEmailRequest {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html_body,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::EmailDelivery(format!("Request to provider failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::EmailDelivery(format!(
                "Provider returned {status}: {detail}"
            )));
        }

        let id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        Ok(DeliveryReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header_exists, method, path},
        Mock, MockServer, Request, ResponseTemplate,
    };

    struct SendEmailBodyMatcher;

    impl wiremock::Match for SendEmailBodyMatcher {
        fn matches(&self, request: &Request) -> bool {
            let result: Result<serde_json::Value, _> = serde_json::from_slice(&request.body);

            if let Ok(body) = result {
                body.get("from").is_some()
                    && body.get("to").is_some()
                    && body.get("subject").is_some()
                    && body.get("html").is_some()
            } else {
                false
            }
        }
    }

    fn notification() -> NotificationEmail {
        NotificationEmail {
            to: "leads@example.com".to_string(),
            from: "Website <noreply@example.com>".to_string(),
            subject: "New Lead - Book Content Interest".to_string(),
            html_body: "<html><body>lead</body></html>".to_string(),
        }
    }

    fn mailer(base_url: &str) -> ResendMailer {
        ResendMailer::new(base_url, Secret::new("re_test_key".to_string()))
            .expect("mailer should build")
    }

    #[tokio::test]
    async fn send_posts_to_the_emails_endpoint_and_returns_the_message_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header_exists("Authorization"))
            .and(SendEmailBodyMatcher)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg_42" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let receipt = mailer(&mock_server.uri())
            .send(&notification())
            .await
            .expect("send should succeed");

        assert_eq!(receipt.id.as_deref(), Some("msg_42"));
    }

    #[tokio::test]
    async fn provider_errors_surface_as_delivery_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = mailer(&mock_server.uri()).send(&notification()).await;

        assert!(matches!(result, Err(AppError::EmailDelivery(_))));
    }

    #[tokio::test]
    async fn a_success_without_an_id_still_counts_as_delivered() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let receipt = mailer(&mock_server.uri())
            .send(&notification())
            .await
            .expect("send should succeed");

        assert_eq!(receipt.id, None);
    }
}
