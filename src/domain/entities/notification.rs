/// A fully rendered notification, ready to hand to the delivery provider.
/// Derived deterministically from a validated submission plus the server
/// timestamp; never stored.
#[derive(Debug, Clone)]
pub struct NotificationEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html_body: String,
}
