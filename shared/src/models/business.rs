//! Business onboarding models

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{ErrorKey, FieldErrors};
use crate::validation::validate_business_name;

pub const NAME_REQUIRED: &str = "Business name is required";
pub const NAME_TOO_LONG: &str = "Business name is too long";
pub const NOT_LOGGED_IN: &str = "You must be logged in to create a business";
pub const CREATE_FAILED: &str = "Failed to create business. Please try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";
pub const GENERIC_ERROR: &str = "An error occurred";

/// Longest accepted business name, in UTF-16 code units
pub const MAX_BUSINESS_NAME_LEN: usize = 100;

/// Industries offered by the onboarding form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Restaurant,
    Retail,
    Hospitality,
    Healthcare,
    Automotive,
    ProfessionalServices,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 7] = [
        Industry::Restaurant,
        Industry::Retail,
        Industry::Hospitality,
        Industry::Healthcare,
        Industry::Automotive,
        Industry::ProfessionalServices,
        Industry::Other,
    ];

    /// Value submitted by the form
    pub fn value(&self) -> &'static str {
        match self {
            Industry::Restaurant => "restaurant",
            Industry::Retail => "retail",
            Industry::Hospitality => "hospitality",
            Industry::Healthcare => "healthcare",
            Industry::Automotive => "automotive",
            Industry::ProfessionalServices => "professional_services",
            Industry::Other => "other",
        }
    }

    /// Human readable label, e.g. "Professional Services"
    pub fn label(&self) -> String {
        industry_label(self.value())
    }
}

/// Render an industry value as a label: the first underscore becomes a
/// space and every word is capitalised.
pub fn industry_label(value: &str) -> String {
    let spaced = value.replacen('_', " ", 1);
    let mut label = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start && c.is_alphanumeric() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    label
}

/// Timezones offered by the onboarding form
pub const TIMEZONES: &[&str] = &[
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "Europe/London",
    "Europe/Paris",
    "Asia/Tokyo",
    "Australia/Sydney",
];

/// Fields as they arrive from the browser form. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawBusinessFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reply_tone: Option<String>,
}

impl RawBusinessFields {
    /// Drop optional fields submitted as empty strings, the same way the
    /// script-driven form only appends fields that were filled in.
    pub fn omit_blank_optionals(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            name: self.name,
            industry: keep(self.industry),
            timezone: keep(self.timezone),
            default_reply_tone: keep(self.default_reply_tone),
        }
    }
}

/// A validated request to create a business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCreationRequest {
    #[validate(custom = "validate_business_name")]
    pub name: String,
    /// One of [`Industry`] when sent by the form; not enforced here
    pub industry: Option<String>,
    /// IANA identifier when sent by the form; not enforced here
    pub timezone: Option<String>,
    pub default_reply_tone: Option<String>,
}

impl BusinessCreationRequest {
    /// Parse raw form fields, reporting every failing field at once.
    ///
    /// A missing name is treated as an empty one so it yields the same
    /// "required" message. Optional fields keep the difference between
    /// absent and empty.
    pub fn parse(raw: RawBusinessFields) -> Result<Self, FieldErrors> {
        let request = Self {
            name: raw.name.unwrap_or_default().trim().to_string(),
            industry: raw.industry,
            timezone: raw.timezone,
            default_reply_tone: raw.default_reply_tone,
        };

        match request.validate() {
            Ok(()) => Ok(request),
            Err(errors) => Err(errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, field_errors)| {
                    field_errors.first().map(|error| {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        (ErrorKey::from_field(field), message)
                    })
                })
                .collect()),
        }
    }
}

/// Characters escaped in a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Opaque identifier of a created business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BusinessId(String);

impl BusinessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dashboard path of the business, the id encoded as one path segment
    pub fn dashboard_path(&self) -> String {
        format!(
            "/dashboard/businesses/{}",
            utf8_percent_encode(&self.0, PATH_SEGMENT)
        )
    }
}

impl std::fmt::Display for BusinessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one submission of the onboarding form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultWire", from = "ResultWire")]
pub enum BusinessCreationResult {
    Created { business_id: BusinessId },
    Failed { errors: FieldErrors },
}

impl BusinessCreationResult {
    pub fn created(business_id: BusinessId) -> Self {
        Self::Created { business_id }
    }

    pub fn failed(errors: FieldErrors) -> Self {
        Self::Failed { errors }
    }

    /// Failure carrying one message
    pub fn failure(key: ErrorKey, message: impl Into<String>) -> Self {
        Self::Failed {
            errors: FieldErrors::single(key, message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn business_id(&self) -> Option<&BusinessId> {
        match self {
            Self::Created { business_id } => Some(business_id),
            Self::Failed { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Created { .. } => None,
            Self::Failed { errors } => Some(errors),
        }
    }
}

/// JSON shape: `{"success": true, "businessId": ..}` or
/// `{"success": false, "errors": {..}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_id: Option<BusinessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl From<BusinessCreationResult> for ResultWire {
    fn from(result: BusinessCreationResult) -> Self {
        match result {
            BusinessCreationResult::Created { business_id } => Self {
                success: true,
                business_id: Some(business_id),
                errors: None,
            },
            BusinessCreationResult::Failed { errors } => Self {
                success: false,
                business_id: None,
                errors: Some(errors),
            },
        }
    }
}

impl From<ResultWire> for BusinessCreationResult {
    fn from(wire: ResultWire) -> Self {
        match (wire.success, wire.business_id) {
            (true, Some(business_id)) if !business_id.as_str().is_empty() => {
                Self::Created { business_id }
            }
            _ => Self::Failed {
                errors: wire.errors.unwrap_or_default(),
            },
        }
    }
}
