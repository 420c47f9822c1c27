use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// RFC 5321 upper bound on a full address.
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 20;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Israeli mobile numbers only: 05X prefix, then seven digits either solid
/// or split 3-4, with at most one hyphen after the prefix. Deliberately
/// narrow; this is a product constraint, not a general phone validator.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^05[0-9]-?(\d{7}|\d{3}-\d{4})$").expect("valid phone pattern")
});

/// A validated contact submission. Construction via `TryFrom<&Value>` is
/// the only path in, so holding one means every invariant held.
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub book_interest: bool,
    pub course_interest: bool,
}

impl TryFrom<&Value> for LeadSubmission {
    type Error = AppError;

    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        let email = optional_string_field(body, "email")?;
        let phone = optional_string_field(body, "phone")?;
        let book_interest = bool_field(body, "bookInterest")?;
        let course_interest = bool_field(body, "courseInterest")?;

        // An empty string means "not provided", same as an absent field.
        let email = email.filter(|s| !s.is_empty());
        let phone = phone.filter(|s| !s.is_empty());

        if email.is_none() && phone.is_none() {
            return Err(AppError::MissingContact);
        }
        if !book_interest && !course_interest {
            return Err(AppError::MissingInterest);
        }
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(AppError::InvalidEmailFormat);
            }
        }
        if let Some(phone) = &phone {
            if !is_valid_israeli_phone(phone) {
                return Err(AppError::InvalidPhoneFormat);
            }
        }

        Ok(LeadSubmission {
            email,
            phone,
            book_interest,
            course_interest,
        })
    }
}

/// Absent means `None`; anything present must be a JSON string. An
/// explicit `null` is a type error, not an omission.
fn optional_string_field(body: &Value, key: &'static str) -> Result<Option<String>, AppError> {
    match body.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::InvalidFieldType(key)),
    }
}

fn bool_field(body: &Value, key: &'static str) -> Result<bool, AppError> {
    body.get(key)
        .and_then(Value::as_bool)
        .ok_or(AppError::InvalidFieldType("interest"))
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

pub fn is_valid_israeli_phone(phone: &str) -> bool {
    if phone.is_empty() || phone.len() > MAX_PHONE_LEN {
        return false;
    }
    let stripped: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&stripped)
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
