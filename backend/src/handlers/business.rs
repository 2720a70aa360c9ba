//! Business onboarding handlers

use std::any::Any;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use shared::{BusinessCreationResult, ErrorKey, FieldErrors, RawBusinessFields, UNEXPECTED_ERROR};

use crate::error::{AppError, AppResult};
use crate::middleware::Session;
use crate::services::BusinessService;
use crate::AppState;

/// Script clients ask for the JSON result; plain form posts get HTML
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|h| h.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

/// Dashboard entry point: sends the user to onboarding
pub async fn dashboard_home() -> Redirect {
    Redirect::to("/dashboard/create-business")
}

/// Render the onboarding page
pub async fn create_business_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let html = state
        .pages
        .create_business(&RawBusinessFields::default(), &FieldErrors::new())?;
    Ok(Html(html))
}

/// Create business action handler
pub async fn create_business(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    form: Result<Form<RawBusinessFields>, FormRejection>,
) -> Response {
    let json = wants_json(&headers);

    let fields = form
        .map(|Form(fields)| fields)
        .map_err(|e| anyhow::anyhow!("unreadable form submission: {}", e));

    // Without a script the browser posts unselected fields as empty
    // strings; treat those the same as fields the form left out.
    let fields = if json {
        fields
    } else {
        fields.map(RawBusinessFields::omit_blank_optionals)
    };
    let submitted = fields.as_ref().ok().cloned().unwrap_or_default();

    let service = BusinessService::new(state.auth.clone(), state.store.clone());
    let result = service.create_business(&session, fields).await;

    if json {
        return Json(result).into_response();
    }

    match result {
        BusinessCreationResult::Created { business_id } => {
            Redirect::to(&business_id.dashboard_path()).into_response()
        }
        BusinessCreationResult::Failed { errors } => {
            match state.pages.create_business(&submitted, &errors) {
                Ok(html) => Html(html).into_response(),
                Err(e) => AppError::from(e).into_response(),
            }
        }
    }
}

/// Landing page the form navigates to after a successful creation
pub async fn business_dashboard(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> AppResult<Html<String>> {
    Ok(Html(state.pages.business_dashboard(&business_id)?))
}

/// Answer for a panic inside the action: the same generic failure the
/// action reports for any unexpected error
pub fn action_panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Unexpected error in create_business: panic: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BusinessCreationResult::failure(
            ErrorKey::General,
            UNEXPECTED_ERROR,
        )),
    )
        .into_response()
}
