use axum::{Extension, Router, extract::DefaultBodyLimit, middleware};

use crate::security::rate_limit::SubmitRateLimiter;
use crate::security::{headers::set_security_headers, json::MAX_BODY_SIZE_BYTES};
use crate::state::AppState;

pub mod api;
pub mod pages;

#[cfg(test)]
pub(crate) mod test_utils;

pub fn create_router(state: AppState, limiter: SubmitRateLimiter) -> Router {
    tracing::debug!("Creating application router");
    Router::new()
        .merge(pages::router(limiter.clone()))
        .merge(api::router(limiter))
        .layer(middleware::from_fn(set_security_headers))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::test_utils::{body_json, test_app_with_limit};

    fn submission() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("fullName=Ada+Lovelace&age=36&country=england&interests=programming"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_submissions_are_rate_limited() {
        let (app, state) = test_app_with_limit(NonZeroU32::new(1).unwrap());

        let first = app.clone().oneshot(submission()).await.unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = app.clone().oneshot(submission()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(header::RETRY_AFTER));
        let body = body_json(second).await;
        assert!(body["error"].as_str().is_some());
        assert_eq!(state.lock().await.users().len(), 1);

        // Reads are never throttled.
        let page = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forwarded_header_does_not_reset_the_limit() {
        let (app, state) = test_app_with_limit(NonZeroU32::new(1).unwrap());
        let mut statuses = Vec::new();

        for host in 1..=5 {
            let mut request = submission();
            request
                .headers_mut()
                .insert("x-forwarded-for", format!("10.9.9.{host}").parse().unwrap());
            statuses.push(app.clone().oneshot(request).await.unwrap().status());
        }

        assert_eq!(statuses[0], StatusCode::SEE_OTHER);
        assert!(
            statuses[1..]
                .iter()
                .all(|status| *status == StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(state.lock().await.users().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_draft_is_visible_to_every_surface() {
        let (app, _) = test_app_with_limit(NonZeroU32::new(5).unwrap());

        let rejected = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("fullName=Jane+Doe&age=12"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let snapshot = app
            .oneshot(Request::builder().uri("/api/form").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let snapshot = body_json(snapshot).await;
        assert_eq!(snapshot["draft"]["fullName"], "Jane Doe");
        assert_eq!(snapshot["draft"]["age"], "12");
        assert_eq!(snapshot["errors"]["age"], "You must be at least 18 years old");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let (app, _) = test_app_with_limit(NonZeroU32::new(5).unwrap());
        let body = format!(
            r#"{{"fullName":"{}","age":30,"country":"italy","interests":["gym"]}}"#,
            "a".repeat(super::MAX_BODY_SIZE_BYTES)
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
