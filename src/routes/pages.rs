use axum::{
    Extension, Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::logging::LoggableUuid;
use crate::page::RegistrationPage;
use crate::security::form::SubmittedDraft;
use crate::security::rate_limit::{SubmitRateLimiter, enforce_rate_limit};
use crate::state::AppState;
use crate::views::page::PageView;

pub fn router(limiter: SubmitRateLimiter) -> Router {
    Router::new().route("/", get(show_page)).route(
        "/users",
        post(submit_form).layer(middleware::from_fn_with_state(limiter, enforce_rate_limit)),
    )
}

/// Renders the page, honouring (and clearing) any pending focus request.
fn render(page: &mut RegistrationPage) -> String {
    let focus = page.form_mut().take_focus();
    PageView { page, focus }.to_string()
}

#[tracing::instrument(name = "show_page", skip(state))]
pub async fn show_page(Extension(state): Extension<AppState>) -> Html<String> {
    let mut page = state.lock().await;
    Html(render(&mut page))
}

#[tracing::instrument(name = "submit_form", skip(state, draft), fields(user_id))]
pub async fn submit_form(
    Extension(state): Extension<AppState>,
    SubmittedDraft(draft): SubmittedDraft,
) -> Response {
    let mut page = state.lock().await;
    page.form_mut().replace_draft(draft);

    let submit = page.submit_form();
    match submit.registration {
        Some(registration) => {
            tracing::Span::current().record(
                "user_id",
                tracing::field::display(LoggableUuid(registration.user.id)),
            );
            state.schedule_banner_expiry(registration.expiry);
            Redirect::to("/").into_response()
        }
        None => (StatusCode::UNPROCESSABLE_ENTITY, Html(render(&mut page))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::routes::test_utils::{body_text, test_app};

    fn form_post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_page() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_page_renders() {
        let (app, _) = test_app();

        let response = app.oneshot(get_page()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        let html = body_text(response).await;
        assert!(html.contains("No users have been added yet."));
    }

    #[tokio::test]
    async fn test_valid_submission_redirects_and_lists_user() {
        let (app, state) = test_app();

        let response = app
            .clone()
            .oneshot(form_post(
                "fullName=John+Smith&age=25&country=england&interests=reading-books&interests=gym",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert_eq!(state.lock().await.users().len(), 1);

        let html = body_text(app.clone().oneshot(get_page()).await.unwrap()).await;
        assert!(html.contains("John Smith has been successfully added."));
        assert!(html.contains(r#"id="success-message" tabindex="-1" autofocus>"#));
        assert!(html.contains("1 user registered"));
        assert!(html.contains("<td>England</td>"));
        assert!(html.contains("<li>Reading books</li><li>Gym</li>"));

        // The focus request is honoured once.
        let html = body_text(app.oneshot(get_page()).await.unwrap()).await;
        assert!(!html.contains("autofocus"));
    }

    #[tokio::test]
    async fn test_invalid_submission_rerenders_with_errors() {
        let (app, state) = test_app();

        let response = app
            .oneshot(form_post("fullName=Jane+Doe&age=12&country="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Please correct the 3 errors below"));
        assert!(html.contains(r#"id="error-summary" autofocus>"#));
        assert!(html.contains("You must be at least 18 years old"));
        assert!(html.contains(r#"value="Jane Doe""#));
        assert!(state.lock().await.users().is_empty());
    }

    #[tokio::test]
    async fn test_corrected_submission_is_accepted() {
        let (app, state) = test_app();

        let rejected = app
            .clone()
            .oneshot(form_post("fullName=Jane+Doe&age=17&country=italy&interests=gym"))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let accepted = app
            .clone()
            .oneshot(form_post("fullName=Jane+Doe&age=18&country=italy&interests=gym"))
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::SEE_OTHER);

        let html = body_text(app.oneshot(get_page()).await.unwrap()).await;
        assert!(!html.contains("error-summary"));
        assert!(html.contains("Jane Doe has been successfully added."));
        assert_eq!(state.lock().await.users().len(), 1);
    }

    #[tokio::test]
    async fn test_non_form_body_is_rejected() {
        let (app, _) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
