//! Contact form validation and lead notification text.

use regdesk_shared::AppError;
use serde::Deserialize;
use thiserror::Error;

const MAX_NAME: usize = 100;
const MAX_EMAIL: usize = 254;
const MAX_SHORT_FIELD: usize = 100;
const MIN_MESSAGE: usize = 10;
const MAX_MESSAGE: usize = 5000;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Contact form errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// A field failed validation.
    #[error("{field}: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// Reason.
        reason: String,
    },

    /// reCAPTCHA rejected the submission.
    #[error("reCAPTCHA verification failed")]
    RecaptchaFailed,
}

impl ContactError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Raw contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    /// Sender's name.
    #[serde(default)]
    pub name: String,
    /// Sender's email.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Service of interest.
    #[serde(default)]
    pub service: Option<String>,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// reCAPTCHA token from the client.
    #[serde(default, alias = "recaptchaToken")]
    pub recaptcha_token: Option<String>,
}

/// A validated lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLead {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Service of interest.
    pub service: Option<String>,
    /// Message.
    pub message: String,
}

impl ContactSubmission {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<ContactLead, ContactError> {
        let name = self.name.trim();
        let name_len = name.chars().count();
        if name_len == 0 {
            return Err(ContactError::invalid("name", "is required"));
        }
        if name_len > MAX_NAME {
            return Err(ContactError::invalid(
                "name",
                format!("must be at most {MAX_NAME} characters"),
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ContactError::invalid("email", "is required"));
        }
        if !is_valid_email(email) {
            return Err(ContactError::invalid("email", "is not a valid email address"));
        }

        let phone = trimmed(self.phone.as_deref());
        if let Some(phone) = &phone {
            if !is_valid_phone(phone) {
                return Err(ContactError::invalid(
                    "phone",
                    format!("must contain {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits"),
                ));
            }
        }

        let company = short_field("company", self.company.as_deref())?;
        let service = short_field("service", self.service.as_deref())?;

        let message = self.message.trim();
        let message_len = message.chars().count();
        if message_len < MIN_MESSAGE {
            return Err(ContactError::invalid(
                "message",
                format!("must be at least {MIN_MESSAGE} characters"),
            ));
        }
        if message_len > MAX_MESSAGE {
            return Err(ContactError::invalid(
                "message",
                format!("must be at most {MAX_MESSAGE} characters"),
            ));
        }

        Ok(ContactLead {
            name: name.to_string(),
            email: email.to_string(),
            phone,
            company,
            service,
            message: message.to_string(),
        })
    }
}

impl ContactLead {
    /// `Name <email>` for the `Reply-To` header.
    #[must_use]
    pub fn reply_to(&self) -> String {
        let name: String = self
            .name
            .chars()
            .filter(|c| !matches!(c, '"' | '<' | '>' | '\r' | '\n'))
            .collect();
        format!("\"{name}\" <{}>", self.email)
    }

    /// Notification subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        match &self.service {
            Some(service) => format!("New enquiry: {service} from {}", self.name),
            None => format!("New enquiry from {}", self.name),
        }
    }

    /// Plain-text notification body.
    #[must_use]
    pub fn body(&self) -> String {
        let dash = "-";
        let mut body = String::new();
        body.push_str(&format!("Name: {}\n", self.name));
        body.push_str(&format!("Email: {}\n", self.email));
        body.push_str(&format!(
            "Phone: {}\n",
            self.phone.as_deref().unwrap_or(dash)
        ));
        body.push_str(&format!(
            "Company: {}\n",
            self.company.as_deref().unwrap_or(dash)
        ));
        body.push_str(&format!(
            "Service: {}\n",
            self.service.as_deref().unwrap_or(dash)
        ));
        body.push_str("\nMessage:\n");
        body.push_str(&self.message);
        body.push('\n');
        body
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn short_field(field: &'static str, value: Option<&str>) -> Result<Option<String>, ContactError> {
    let value = trimmed(value);
    if value
        .as_ref()
        .is_some_and(|v| v.chars().count() > MAX_SHORT_FIELD)
    {
        return Err(ContactError::invalid(
            field,
            format!("must be at most {MAX_SHORT_FIELD} characters"),
        ));
    }
    Ok(value)
}

/// Syntactic email check: one `@`, a non-empty local part and a dotted
/// domain without spaces.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

/// Phone numbers may contain `+ - ( )` and spaces around 7-15 digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let mut digits = 0;
    for c in phone.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | '(' | ')' | ' ' => {}
            _ => return false,
        }
    }
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: Some("+91 98765-43210".to_string()),
            company: Some("Rao Textiles".to_string()),
            service: Some("GST Registration".to_string()),
            message: "Please call me about GST registration.".to_string(),
            recaptcha_token: None,
        }
    }

    fn failing_field(s: &ContactSubmission) -> &'static str {
        match s.validate() {
            Err(ContactError::Invalid { field, .. }) => field,
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_submission() {
        let lead = submission().validate().unwrap();
        assert_eq!(lead.name, "Asha Rao");
        assert_eq!(lead.reply_to(), "\"Asha Rao\" <asha@example.com>");
        assert_eq!(lead.subject(), "New enquiry: GST Registration from Asha Rao");
        assert!(lead.body().contains("Company: Rao Textiles"));
    }

    #[test]
    fn test_missing_fields_report_first_failure() {
        assert_eq!(failing_field(&ContactSubmission::default()), "name");

        let mut s = submission();
        s.email = String::new();
        assert_eq!(failing_field(&s), "email");

        let mut s = submission();
        s.message = "too short".to_string();
        assert_eq!(failing_field(&s), "message");
    }

    #[test]
    fn test_blank_optional_fields_are_dropped() {
        let mut s = submission();
        s.phone = Some("   ".to_string());
        s.service = None;
        let lead = s.validate().unwrap();
        assert_eq!(lead.phone, None);
        assert_eq!(lead.subject(), "New enquiry from Asha Rao");
        assert!(lead.body().contains("Phone: -"));
    }

    #[test]
    fn test_long_company_rejected() {
        let mut s = submission();
        s.company = Some("c".repeat(101));
        assert_eq!(failing_field(&s), "company");
    }

    #[rstest]
    #[case("asha@example.com", true)]
    #[case("a.b+tag@sub.example.co.in", true)]
    #[case("asha@example", false)]
    #[case("@example.com", false)]
    #[case("asha@@example.com", false)]
    #[case("asha @example.com", false)]
    #[case("asha@.com", false)]
    fn test_email_validation(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("+91 (22) 1234-5678", true)]
    #[case("123456", false)]
    #[case("1234567890123456", false)]
    #[case("98765x43210", false)]
    fn test_phone_validation(#[case] phone: &str, #[case] valid: bool) {
        assert_eq!(is_valid_phone(phone), valid);
    }

    #[test]
    fn test_reply_to_strips_header_characters() {
        let mut lead = submission().validate().unwrap();
        lead.name = "Evil\r\nBcc: <x>".to_string();
        assert_eq!(lead.reply_to(), "\"EvilBcc: x\" <asha@example.com>");
    }
}
