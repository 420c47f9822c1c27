use chrono::{DateTime, Locale, Utc};
use chrono_tz::Asia::Jerusalem;
use tera::Context;

use crate::{
    entities::{lead::LeadSubmission, notification::NotificationEmail},
    errors::AppError,
    TEMPLATES,
};

const GENERIC_SUBJECT: &str = "New Lead from Nes HaTamar Website";

/// Subject line naming the selected interests. The generic fallback is
/// unreachable for a validated submission but kept for safety.
pub fn subject_for(lead: &LeadSubmission) -> String {
    let mut interests = Vec::new();
    if lead.book_interest {
        interests.push("Book Content");
    }
    if lead.course_interest {
        interests.push("Course Info");
    }

    if interests.is_empty() {
        return GENERIC_SUBJECT.to_string();
    }

    format!("New Lead - {} Interest", interests.join(" & "))
}

pub fn compose_notification(
    lead: &LeadSubmission,
    recipient: &str,
    sender: &str,
) -> Result<NotificationEmail, AppError> {
    compose_notification_at(lead, recipient, sender, Utc::now())
}

/// Renders the branded RTL notification body. All user-supplied strings go
/// through the template engine's HTML auto-escaping; nothing is
/// interpolated raw.
pub fn compose_notification_at(
    lead: &LeadSubmission,
    recipient: &str,
    sender: &str,
    submitted_at: DateTime<Utc>,
) -> Result<NotificationEmail, AppError> {
    let local_time = submitted_at.with_timezone(&Jerusalem);

    let mut context = Context::new();
    context.insert("email", &lead.email);
    context.insert("phone", &lead.phone);
    context.insert("book_interest", &lead.book_interest);
    context.insert("course_interest", &lead.course_interest);
    context.insert(
        "submitted_at",
        &local_time
            .format_localized("%A, %e %B %Y, %H:%M", Locale::he_IL)
            .to_string(),
    );

    let html_body = TEMPLATES
        .render("lead_notification.html", &context)
        .map_err(|e| AppError::InternalError(format!("Template rendering failed: {e}")))?;

    Ok(NotificationEmail {
        to: recipient.to_string(),
        from: sender.to_string(),
        subject: subject_for(lead),
        html_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::assert_ok;

    fn lead(email: Option<&str>, phone: Option<&str>, book: bool, course: bool) -> LeadSubmission {
        LeadSubmission {
            email: email.map(String::from),
            phone: phone.map(String::from),
            book_interest: book,
            course_interest: course,
        }
    }

    fn compose(lead: &LeadSubmission) -> NotificationEmail {
        assert_ok!(compose_notification(
            lead,
            "leads@example.com",
            "Website <noreply@example.com>"
        ))
    }

    #[test]
    fn subject_reflects_the_selected_interests() {
        assert_eq!(
            subject_for(&lead(Some("x@y.com"), None, true, false)),
            "New Lead - Book Content Interest"
        );
        assert_eq!(
            subject_for(&lead(Some("x@y.com"), None, false, true)),
            "New Lead - Course Info Interest"
        );
        assert_eq!(
            subject_for(&lead(Some("x@y.com"), None, true, true)),
            "New Lead - Book Content & Course Info Interest"
        );
        assert_eq!(
            subject_for(&lead(Some("x@y.com"), None, false, false)),
            GENERIC_SUBJECT
        );
    }

    #[test]
    fn email_renders_as_a_mailto_link_with_the_book_label_only() {
        let email = compose(&lead(Some("x@y.com"), None, true, false));

        assert!(email.html_body.contains("mailto:x@y.com"));
        assert!(email.html_body.contains("תוכן על הספר"));
        assert!(!email.html_body.contains("מידע על הקורס"));
    }

    #[test]
    fn phone_renders_as_a_tel_link_only_when_present() {
        let email = compose(&lead(None, Some("0501234567"), false, true));

        assert!(email.html_body.contains("tel:0501234567"));
        assert!(!email.html_body.contains("mailto:"));
        assert!(email.html_body.contains("מידע על הקורס"));
    }

    #[test]
    fn user_supplied_markup_is_entity_escaped() {
        let email = compose(&lead(
            Some("<script>alert('1')&\"</script>@y.com"),
            None,
            true,
            false,
        ));

        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
        assert!(email.html_body.contains("&amp;"));
        assert!(!email.html_body.contains(r#"alert('1')&""#));
    }

    #[test]
    fn addresses_and_subject_come_from_the_caller() {
        let email = compose(&lead(Some("x@y.com"), None, true, true));

        assert_eq!(email.to, "leads@example.com");
        assert_eq!(email.from, "Website <noreply@example.com>");
        assert_eq!(email.subject, "New Lead - Book Content & Course Info Interest");
    }

    #[test]
    fn body_contains_a_jerusalem_local_timestamp() {
        let submitted = "2026-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let email = assert_ok!(compose_notification_at(
            &lead(Some("x@y.com"), None, true, false),
            "leads@example.com",
            "Website <noreply@example.com>",
            submitted
        ));

        // 10:00 UTC is 12:00 in Jerusalem (winter time, UTC+2).
        assert!(email.html_body.contains("12:00"));
    }
}
