//! WebAssembly module for Review Desk
//!
//! Drives the onboarding form in the browser:
//! - Local name check and submission body
//! - Interpreting the create action's JSON result
//! - Select options for industry and timezone

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::form::*;
pub use shared::models::*;
pub use shared::types::*;

#[derive(Serialize)]
struct SelectOption {
    value: String,
    label: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Build the urlencoded body for a form submission.
///
/// Fails with the field errors as JSON when the name is blank, in which
/// case nothing should be sent.
#[wasm_bindgen]
pub fn prepare_business_submission(
    name: &str,
    industry: &str,
    timezone: &str,
    default_reply_tone: &str,
) -> Result<String, JsValue> {
    let mut form = BusinessForm {
        name: name.to_string(),
        industry: industry.to_string(),
        timezone: timezone.to_string(),
        default_reply_tone: default_reply_tone.to_string(),
        ..Default::default()
    };

    match form.submit() {
        Some(submission) => submission
            .encode()
            .map_err(|e| JsValue::from_str(&format!("Encoding failed: {}", e))),
        None => Err(JsValue::from_str(&to_json(&form.errors)?)),
    }
}

/// Turn the action's JSON result into what the page should do next:
/// `{"action":"navigate","path":..}` or `{"action":"show_errors","errors":{..}}`
#[wasm_bindgen]
pub fn resolve_business_result(result_json: &str) -> Result<String, JsValue> {
    let result = serde_json::from_str::<BusinessCreationResult>(result_json)
        .unwrap_or_else(|_| BusinessCreationResult::failed(FieldErrors::new()));

    let mut form = BusinessForm::new();
    to_json(&form.apply_result(result))
}

/// Industry choices as `[{"value":..,"label":..}]`
#[wasm_bindgen]
pub fn industry_options() -> Result<String, JsValue> {
    let options: Vec<SelectOption> = Industry::ALL
        .iter()
        .map(|industry| SelectOption {
            value: industry.value().to_string(),
            label: industry.label(),
        })
        .collect();
    to_json(&options)
}

/// Timezone choices as `[{"value":..,"label":..}]`
#[wasm_bindgen]
pub fn timezone_options() -> Result<String, JsValue> {
    let options: Vec<SelectOption> = TIMEZONES
        .iter()
        .map(|tz| SelectOption {
            value: tz.to_string(),
            label: tz.to_string(),
        })
        .collect();
    to_json(&options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_prepare_submission_trims_and_skips_empty() {
        let body = prepare_business_submission("  Joe's Diner ", "restaurant", "", "").unwrap();
        assert_eq!(body, "name=Joe%27s+Diner&industry=restaurant");
    }

    #[test]
    fn test_prepare_submission_keeps_all_fields() {
        let body =
            prepare_business_submission("Cafe", "retail", "Europe/London", "friendly").unwrap();
        assert_eq!(
            body,
            "name=Cafe&industry=retail&timezone=Europe%2FLondon&defaultReplyTone=friendly"
        );
    }

    #[test]
    fn test_resolve_success_navigates() {
        let outcome = resolve_business_result(r#"{"success":true,"businessId":"biz_123"}"#).unwrap();
        assert_eq!(
            parse(&outcome),
            json!({"action": "navigate", "path": "/dashboard/businesses/biz_123"})
        );
    }

    #[test]
    fn test_resolve_failure_shows_server_errors() {
        let outcome = resolve_business_result(
            r#"{"success":false,"errors":{"name":"Business name is too long"}}"#,
        )
        .unwrap();
        assert_eq!(
            parse(&outcome),
            json!({"action": "show_errors", "errors": {"name": NAME_TOO_LONG}})
        );
    }

    #[test]
    fn test_resolve_without_errors_falls_back_to_generic() {
        for input in [r#"{"success":true}"#, r#"{"success":false}"#, "not json"] {
            let outcome = resolve_business_result(input).unwrap();
            assert_eq!(
                parse(&outcome),
                json!({"action": "show_errors", "errors": {"general": GENERIC_ERROR}}),
                "input {}",
                input
            );
        }
    }

    #[test]
    fn test_options() {
        let industries = parse(&industry_options().unwrap());
        assert_eq!(industries.as_array().unwrap().len(), Industry::ALL.len());
        assert_eq!(
            industries[5],
            json!({"value": "professional_services", "label": "Professional Services"})
        );

        let timezones = parse(&timezone_options().unwrap());
        assert_eq!(timezones.as_array().unwrap().len(), TIMEZONES.len());
        assert_eq!(timezones[0]["value"], "America/New_York");
    }
}
