pub mod user;

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;

/// The fixed set of inputs on the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Age,
    Country,
    Interests,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::FullName, Field::Age, Field::Country, Field::Interests];

    /// Key used in JSON payloads and error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Age => "age",
            Field::Country => "country",
            Field::Interests => "interests",
        }
    }

    /// DOM id of the element an error summary entry links to.
    pub fn anchor(self) -> &'static str {
        match self {
            Field::FullName => "full-name",
            Field::Age => "age",
            Field::Country => "country",
            Field::Interests => "interests",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::Age => "Age",
            Field::Country => "Country",
            Field::Interests => "Interests",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Per-field validation messages. Recomputed wholesale on every attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    full_name: Option<String>,
    age: Option<String>,
    country: Option<String>,
    interests: Option<String>,
}

impl FieldErrors {
    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::FullName => &self.full_name,
            Field::Age => &self.age,
            Field::Country => &self.country,
            Field::Interests => &self.interests,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::FullName => &mut self.full_name,
            Field::Age => &mut self.age,
            Field::Country => &mut self.country,
            Field::Interests => &mut self.interests,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Records the message for `field` unless an earlier rule already failed.
    pub fn reject(&mut self, field: Field, message: impl Into<String>) {
        let slot = self.slot_mut(field);
        if slot.is_none() {
            *slot = Some(message.into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldError> + '_ {
        Field::ALL.into_iter().filter_map(|field| {
            self.get(field).map(|message| FieldError {
                field,
                message: message.to_string(),
            })
        })
    }

    pub fn len(&self) -> usize {
        Field::ALL
            .into_iter()
            .filter(|field| self.slot(*field).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Heading text for the aggregate error summary, `None` when there is nothing to report.
    pub fn summary_heading(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(match self.len() {
            1 => "Please correct the 1 error below".to_string(),
            count => format!("Please correct the {count} errors below"),
        })
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for error in self.iter() {
            map.serialize_entry(error.field.as_str(), &error.message)?;
        }
        map.end()
    }
}

/// Which fields the person has interacted with; gates inline error display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Touched {
    full_name: bool,
    age: bool,
    country: bool,
    interests: bool,
}

impl Touched {
    pub fn mark(&mut self, field: Field) {
        match field {
            Field::FullName => self.full_name = true,
            Field::Age => self.age = true,
            Field::Country => self.country = true,
            Field::Interests => self.interests = true,
        }
    }

    pub fn mark_all(&mut self) {
        for field in Field::ALL {
            self.mark(field);
        }
    }

    pub fn is_touched(&self, field: Field) -> bool {
        match field {
            Field::FullName => self.full_name,
            Field::Age => self.age,
            Field::Country => self.country,
            Field::Interests => self.interests,
        }
    }
}

/// A violated validation rule; the display text is the message shown to people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Enter your full name")]
    MissingFullName,
    #[error("Full name must be {max} characters or less")]
    FullNameTooLong { max: usize },
    #[error("Age must be a number")]
    AgeNotANumber,
    #[error("Age must be a whole number")]
    AgeNotWhole,
    #[error("You must be at least {min_age} years old")]
    Underage { min_age: u32 },
    #[error("Enter a valid age")]
    AgeOutOfRange,
    #[error("Select a country")]
    MissingCountry,
    #[error("Select at least one interest")]
    MissingInterests,
    #[error("Select interests from the list")]
    UnknownInterest,
}

pub type ValidationResult<T> = Result<T, FieldErrors>;
