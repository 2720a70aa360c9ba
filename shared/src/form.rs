//! Client-side state of the business onboarding form
//!
//! The form only checks that a name is present; everything else is left to
//! the server. Optional fields are appended to the submission only when
//! they were filled in, so an unselected timezone reaches the server as an
//! absent field rather than an empty string.

use serde::Serialize;

use crate::models::{BusinessCreationResult, RawBusinessFields, GENERIC_ERROR, NAME_REQUIRED};
use crate::types::{ErrorKey, FieldErrors};

/// Form field names as submitted to the server
pub const FIELD_NAME: &str = "name";
pub const FIELD_INDUSTRY: &str = "industry";
pub const FIELD_TIMEZONE: &str = "timezone";
pub const FIELD_DEFAULT_REPLY_TONE: &str = "defaultReplyTone";

/// Interactive state of the onboarding form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessForm {
    pub name: String,
    pub industry: String,
    pub timezone: String,
    pub default_reply_tone: String,
    pub errors: FieldErrors,
    /// Inputs are disabled while a submission is in flight
    pub pending: bool,
}

/// Ordered form fields ready to be sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission(Vec<(&'static str, String)>);

impl Submission {
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    /// `application/x-www-form-urlencoded` body
    pub fn encode(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(&self.0)
    }

    /// View the submission the way the server will receive it
    pub fn to_raw_fields(&self) -> RawBusinessFields {
        let owned = |field: &str| self.get(field).map(str::to_string);
        RawBusinessFields {
            name: owned(FIELD_NAME),
            industry: owned(FIELD_INDUSTRY),
            timezone: owned(FIELD_TIMEZONE),
            default_reply_tone: owned(FIELD_DEFAULT_REPLY_TONE),
        }
    }
}

/// What the page should do once the server has answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormOutcome {
    Navigate { path: String },
    ShowErrors { errors: FieldErrors },
}

impl BusinessForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission.
    ///
    /// Clears previous errors and checks the name. Returns `None` when the
    /// submission is blocked locally.
    pub fn submit(&mut self) -> Option<Submission> {
        self.errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            self.errors.insert(ErrorKey::Name, NAME_REQUIRED);
            return None;
        }

        let mut fields = vec![(FIELD_NAME, name.to_string())];
        for (field, value) in [
            (FIELD_INDUSTRY, &self.industry),
            (FIELD_TIMEZONE, &self.timezone),
            (FIELD_DEFAULT_REPLY_TONE, &self.default_reply_tone),
        ] {
            if !value.is_empty() {
                fields.push((field, value.clone()));
            }
        }

        self.pending = true;
        Some(Submission(fields))
    }

    /// Apply the server's answer to the form
    pub fn apply_result(&mut self, result: BusinessCreationResult) -> FormOutcome {
        self.pending = false;
        match result {
            BusinessCreationResult::Created { business_id } if !business_id.as_str().is_empty() => {
                FormOutcome::Navigate {
                    path: business_id.dashboard_path(),
                }
            }
            BusinessCreationResult::Created { .. } => {
                self.errors = FieldErrors::single(ErrorKey::General, GENERIC_ERROR);
                FormOutcome::ShowErrors {
                    errors: self.errors.clone(),
                }
            }
            BusinessCreationResult::Failed { errors } => {
                self.errors = if errors.is_empty() {
                    FieldErrors::single(ErrorKey::General, GENERIC_ERROR)
                } else {
                    errors
                };
                FormOutcome::ShowErrors {
                    errors: self.errors.clone(),
                }
            }
        }
    }

    /// Message to render beneath an input or at page level
    pub fn error(&self, key: ErrorKey) -> Option<&str> {
        self.errors.get(key)
    }
}
