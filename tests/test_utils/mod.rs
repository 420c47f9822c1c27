use std::net::TcpListener;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use nes_hatamar_backend::{routes::configure_routes, settings::AppConfig, AppState};
use secrecy::Secret;
use wiremock::MockServer;

/// A running application instance bound to a random port, with a mock
/// standing in for the email delivery provider.
pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let email_server = MockServer::start().await;

        let config = AppConfig {
            resend_api_key: Secret::new("re_test_key".into()),
            resend_base_url: email_server.uri(),
            ..AppConfig::default()
        };

        let state = web::Data::new(AppState::new(&config).expect("Failed to build app state"));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind a random port");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to listen on the test port")
        .workers(1)
        .run();

        tokio::spawn(server);

        TestApp {
            address: format!("http://127.0.0.1:{port}"),
            email_server,
            client: reqwest::Client::new(),
        }
    }

    /// Posts a lead as if it came from `ip` (forwarded headers are
    /// trusted by the default configuration).
    pub async fn post_lead(&self, ip: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/lead-capture", self.address))
            .header("X-Forwarded-For", ip)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
