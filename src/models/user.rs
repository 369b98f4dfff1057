use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reference::{
    DEFAULT_MIN_AGE, MAX_AGE, MAX_FULL_NAME_CHARS, is_known_country, is_known_interest,
};

use super::{Field, FieldErrors, RuleViolation, ValidationResult};

/// An accepted registration. Never mutated once appended to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub age: u32,
    pub country: String,
    pub interests: Vec<String>,
}

impl User {
    pub fn new(id: Uuid, data: UserFormData) -> Self {
        Self {
            id,
            full_name: data.full_name,
            age: data.age,
            country: data.country,
            interests: data.interests,
        }
    }
}

/// A validated, normalized registration without an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFormData {
    pub full_name: String,
    pub age: u32,
    pub country: String,
    pub interests: Vec<String>,
}

/// Registration input as received, before any rule has been applied.
///
/// `age` is `None` when the caller supplied something that is not a number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRegistration {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<f64>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Declarative registration rules. Every field is checked; each reports its
/// first violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSchema {
    min_age: u32,
}

impl Default for UserSchema {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AGE)
    }
}

impl UserSchema {
    pub fn new(min_age: u32) -> Self {
        Self { min_age }
    }

    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    pub fn validate(&self, candidate: &NewRegistration) -> ValidationResult<UserFormData> {
        let mut errors = FieldErrors::default();

        let full_name = ensure_valid_full_name(&candidate.full_name)
            .map_err(|err| errors.reject(Field::FullName, err.to_string()))
            .ok();
        let age = ensure_valid_age(candidate.age, self.min_age)
            .map_err(|err| errors.reject(Field::Age, err.to_string()))
            .ok();
        let country = ensure_valid_country(&candidate.country)
            .map_err(|err| errors.reject(Field::Country, err.to_string()))
            .ok();
        let interests = ensure_valid_interests(&candidate.interests)
            .map_err(|err| errors.reject(Field::Interests, err.to_string()))
            .ok();

        match (full_name, age, country, interests) {
            (Some(full_name), Some(age), Some(country), Some(interests)) => Ok(UserFormData {
                full_name,
                age,
                country: country.to_string(),
                interests,
            }),
            _ => {
                tracing::debug!(
                    error_count = errors.len(),
                    "Registration candidate failed validation"
                );
                Err(errors)
            }
        }
    }
}

pub(crate) fn ensure_valid_full_name(value: &str) -> Result<String, RuleViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        tracing::debug!("Full name validation failed: empty after trimming");
        return Err(RuleViolation::MissingFullName);
    }

    let len = trimmed.chars().count();
    if len > MAX_FULL_NAME_CHARS {
        tracing::debug!(length = len, "Full name validation failed: too long");
        return Err(RuleViolation::FullNameTooLong {
            max: MAX_FULL_NAME_CHARS,
        });
    }

    Ok(trimmed.to_string())
}

pub(crate) fn ensure_valid_age(value: Option<f64>, min_age: u32) -> Result<u32, RuleViolation> {
    let Some(age) = value.filter(|age| age.is_finite()) else {
        tracing::debug!("Age validation failed: not a number");
        return Err(RuleViolation::AgeNotANumber);
    };

    if age.fract() != 0.0 {
        tracing::debug!(age, "Age validation failed: not a whole number");
        return Err(RuleViolation::AgeNotWhole);
    }

    if age < f64::from(min_age) {
        tracing::debug!(age, min_age, "Age validation failed: below minimum");
        return Err(RuleViolation::Underage { min_age });
    }

    if age > f64::from(MAX_AGE) {
        tracing::debug!(age, max_age = MAX_AGE, "Age validation failed: above maximum");
        return Err(RuleViolation::AgeOutOfRange);
    }

    // Whole and within [min_age, MAX_AGE], so the cast is exact.
    Ok(age as u32)
}

pub(crate) fn ensure_valid_country(value: &str) -> Result<&str, RuleViolation> {
    if value.is_empty() || !is_known_country(value) {
        tracing::debug!(
            empty = value.is_empty(),
            "Country validation failed: no listed country selected"
        );
        return Err(RuleViolation::MissingCountry);
    }
    Ok(value)
}

pub(crate) fn ensure_valid_interests(values: &[String]) -> Result<Vec<String>, RuleViolation> {
    if values.is_empty() {
        tracing::debug!("Interests validation failed: nothing selected");
        return Err(RuleViolation::MissingInterests);
    }

    if let Some(unknown) = values.iter().find(|value| !is_known_interest(value)) {
        tracing::debug!(
            interest = %unknown,
            "Interests validation failed: unlisted interest"
        );
        return Err(RuleViolation::UnknownInterest);
    }

    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    Ok(unique)
}
