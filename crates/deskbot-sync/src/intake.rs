// Intake validation for new ticket drafts
//
// Violations are rejected before any store call and reported per field so
// the form can surface them inline.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use deskbot_contracts::TicketDraft;

/// A draft field the user must fix before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("subject is required")]
    MissingSubject,

    #[error("description is required")]
    MissingDescription,

    #[error("contact email is required")]
    MissingEmail,

    #[error("contact email is not a valid address")]
    InvalidEmail,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Check a draft against the intake rules: subject, description and contact
/// email are required, and the email must look like an address.
pub fn validate_draft(draft: &TicketDraft) -> Result<(), ValidationError> {
    if draft.subject.trim().is_empty() {
        return Err(ValidationError::MissingSubject);
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    let email = draft.contact_email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
