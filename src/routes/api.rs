use axum::{
    Extension, Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::form::{Draft, FocusTarget, SubmitOutcome, UserForm};
use crate::logging::LoggableUuid;
use crate::models::user::{NewRegistration, User};
use crate::models::{Field, FieldError, FieldErrors, Touched};
use crate::security::json::ValidatedJson;
use crate::security::rate_limit::{SubmitRateLimiter, enforce_rate_limit};
use crate::state::AppState;

pub fn router(limiter: SubmitRateLimiter) -> Router {
    let throttle = middleware::from_fn_with_state(limiter, enforce_rate_limit);

    Router::new()
        .route(
            "/api/users",
            get(list_users).merge(post(create_user).layer(throttle.clone())),
        )
        .route("/api/form", get(form_snapshot))
        .route("/api/form/events", post(apply_form_event).layer(throttle))
}

/// One discrete interaction with the shared form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    deny_unknown_fields
)]
pub enum FormEvent {
    SetFullName { value: String },
    SetAge { value: String },
    SetCountry { value: String },
    ToggleInterest { value: String },
    Blur { field: Field },
    Submit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    draft: Draft,
    touched: Touched,
    errors: FieldErrors,
    visible_errors: Vec<FieldError>,
    error_summary: Option<String>,
    pending_focus: Option<FocusTarget>,
}

impl From<&UserForm> for FormSnapshot {
    fn from(form: &UserForm) -> Self {
        Self {
            draft: form.draft().clone(),
            touched: *form.touched(),
            errors: form.errors().clone(),
            visible_errors: form.visible_errors(),
            error_summary: form.errors().summary_heading(),
            pending_focus: form.pending_focus(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEventResponse {
    form: FormSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    submit: Option<SubmitOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

#[tracing::instrument(name = "list_users", skip(state))]
pub async fn list_users(Extension(state): Extension<AppState>) -> Json<Vec<User>> {
    Json(state.lock().await.users().to_vec())
}

#[tracing::instrument(name = "create_user", skip(state, payload), fields(user_id))]
pub async fn create_user(
    Extension(state): Extension<AppState>,
    ValidatedJson(payload): ValidatedJson<NewRegistration>,
) -> Result<impl IntoResponse, AppError> {
    let mut page = state.lock().await;
    let data = page.form().schema().validate(&payload)?;

    let registration = page.add_user(data);
    tracing::Span::current().record(
        "user_id",
        tracing::field::display(LoggableUuid(registration.user.id)),
    );
    state.schedule_banner_expiry(registration.expiry);

    Ok((StatusCode::CREATED, Json(registration.user)))
}

/// State of the single shared form; not scoped to the caller.
#[tracing::instrument(name = "form_snapshot", skip(state))]
pub async fn form_snapshot(Extension(state): Extension<AppState>) -> Json<FormSnapshot> {
    let page = state.lock().await;
    Json(FormSnapshot::from(page.form()))
}

#[tracing::instrument(name = "apply_form_event", skip(state, event))]
pub async fn apply_form_event(
    Extension(state): Extension<AppState>,
    ValidatedJson(event): ValidatedJson<FormEvent>,
) -> Json<FormEventResponse> {
    let mut page = state.lock().await;
    let mut submit = None;
    let mut user = None;

    match event {
        FormEvent::SetFullName { value } => page.form_mut().set_full_name(value),
        FormEvent::SetAge { value } => page.form_mut().set_age(value),
        FormEvent::SetCountry { value } => page.form_mut().set_country(value),
        FormEvent::ToggleInterest { value } => page.form_mut().toggle_interest(&value),
        FormEvent::Blur { field } => page.form_mut().blur(field),
        FormEvent::Submit => {
            let result = page.submit_form();
            submit = Some(result.outcome);
            if let Some(registration) = result.registration {
                state.schedule_banner_expiry(registration.expiry);
                user = Some(registration.user);
            }
        }
    }

    Json(FormEventResponse {
        form: FormSnapshot::from(page.form()),
        submit,
        user,
    })
}
