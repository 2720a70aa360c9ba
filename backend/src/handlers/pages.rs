//! Server-rendered pages for business onboarding
//!
//! Plain HTML so the form works without scripts. The browser bundle built
//! from the wasm crate can take over submission and navigation. Templates
//! live in `backend/templates` and are compiled into the binary.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use shared::{industry_label, FieldErrors, Industry, RawBusinessFields, TIMEZONES};

const LAYOUT: &str = include_str!("../../templates/layout.hbs");
const CREATE_BUSINESS: &str = include_str!("../../templates/create_business.hbs");
const BUSINESS_DASHBOARD: &str = include_str!("../../templates/business_dashboard.hbs");

#[derive(Serialize)]
struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Serialize)]
struct CreateBusinessView<'a> {
    title: &'static str,
    name: &'a str,
    default_reply_tone: &'a str,
    industry_unset: bool,
    industries: Vec<SelectOption>,
    timezone_unset: bool,
    timezones: Vec<SelectOption>,
    errors: &'a FieldErrors,
}

#[derive(Serialize)]
struct BusinessDashboardView<'a> {
    title: &'static str,
    business_id: &'a str,
}

/// Compiled page templates
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", LAYOUT)?;
        registry.register_template_string("create_business", CREATE_BUSINESS)?;
        registry.register_template_string("business_dashboard", BUSINESS_DASHBOARD)?;
        Ok(Self { registry })
    }

    /// The "Create Your Business" page. `values` refills the inputs after a
    /// failed submission and `errors` is shown inline; auth and general
    /// failures are page-level messages.
    pub fn create_business(
        &self,
        values: &RawBusinessFields,
        errors: &FieldErrors,
    ) -> Result<String, RenderError> {
        let industry = values.industry.as_deref().filter(|v| !v.is_empty());
        let timezone = values.timezone.as_deref().filter(|v| !v.is_empty());

        let view = CreateBusinessView {
            title: "Create Your Business",
            name: values.name.as_deref().unwrap_or_default(),
            default_reply_tone: values.default_reply_tone.as_deref().unwrap_or_default(),
            industry_unset: industry.is_none(),
            industries: Industry::ALL
                .iter()
                .map(|option| SelectOption {
                    value: option.value().to_string(),
                    label: industry_label(option.value()),
                    selected: industry == Some(option.value()),
                })
                .collect(),
            timezone_unset: timezone.is_none(),
            timezones: TIMEZONES
                .iter()
                .map(|tz| SelectOption {
                    value: tz.to_string(),
                    label: tz.to_string(),
                    selected: timezone == Some(*tz),
                })
                .collect(),
            errors,
        };

        self.registry.render("create_business", &view)
    }

    /// Landing page of a freshly created business
    pub fn business_dashboard(&self, business_id: &str) -> Result<String, RenderError> {
        self.registry.render(
            "business_dashboard",
            &BusinessDashboardView {
                title: "Business Dashboard",
                business_id,
            },
        )
    }
}
