use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};

use crate::errors::AppError;
use crate::form::Draft;

use super::json::describe_content_type;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A browser form post decoded into a [`Draft`]. Repeated `interests` keys
/// keep their submission order; any other unexpected key is rejected.
#[derive(Debug)]
pub struct SubmittedDraft(pub Draft);

#[async_trait]
impl<S> FromRequest<S> for SubmittedDraft
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        validate_content_type(req.headers())?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
                _ => AppError::InvalidForm(rejection.body_text()),
            })?;

        parse_draft(&body).map(SubmittedDraft)
    }
}

pub(crate) fn parse_draft(body: &[u8]) -> Result<Draft, AppError> {
    let mut draft = Draft::default();

    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "fullName" => draft.full_name = value.into_owned(),
            "age" => draft.age = value.into_owned(),
            "country" => draft.country = value.into_owned(),
            "interests" => {
                if !draft.has_interest(&value) {
                    draft.interests.push(value.into_owned());
                }
            }
            other => {
                return Err(AppError::InvalidForm(format!("unexpected field `{other}`")));
            }
        }
    }

    Ok(draft)
}

fn validate_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let value = headers.get(CONTENT_TYPE);

    if let Some(value) = value
        && let Ok(value) = value.to_str()
        && value.starts_with(FORM_CONTENT_TYPE)
    {
        return Ok(());
    }

    Err(AppError::UnsupportedMediaType(describe_content_type(
        "expected application/x-www-form-urlencoded",
        value,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_browser_submission() {
        let draft = parse_draft(
            b"fullName=John+Smith&age=25&country=england&interests=reading-books&interests=gym",
        )
        .unwrap();

        assert_eq!(
            draft,
            Draft {
                full_name: "John Smith".to_string(),
                age: "25".to_string(),
                country: "england".to_string(),
                interests: vec!["reading-books".to_string(), "gym".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let draft = parse_draft(b"fullName=").unwrap();
        assert_eq!(draft, Draft::default());
    }

    #[test]
    fn test_percent_encoding_is_decoded() {
        let draft = parse_draft(b"fullName=Zo%C3%AB%20O%27Neil").unwrap();
        assert_eq!(draft.full_name, "Zoë O'Neil");
    }

    #[test]
    fn test_unexpected_key_is_rejected() {
        let err = parse_draft(b"fullName=x&admin=true").unwrap_err();
        assert!(matches!(err, AppError::InvalidForm(ref msg) if msg.contains("admin")));
    }

    #[test]
    fn test_rejects_json_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(matches!(
            validate_content_type(&headers),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }
}
