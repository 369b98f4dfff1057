use serde::Serialize;

/// A selectable code paired with the label shown to people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Leading option of the country select; never stored on a record.
pub const COUNTRY_PLACEHOLDER: Choice = Choice::new("", "Select a country");

pub const COUNTRIES: &[Choice] = &[
    Choice::new("england", "England"),
    Choice::new("italy", "Italy"),
    Choice::new("australia", "Australia"),
    Choice::new("france", "France"),
];

pub const INTERESTS: &[Choice] = &[
    Choice::new("reading-books", "Reading books"),
    Choice::new("sleeping", "Sleeping"),
    Choice::new("walking", "Walking"),
    Choice::new("gym", "Gym"),
    Choice::new("programming", "Programming"),
];

pub const DEFAULT_MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;
pub const MAX_FULL_NAME_CHARS: usize = 100;

fn label_in<'a>(table: &[Choice], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|choice| choice.value == code)
        .map_or(code, |choice| choice.label)
}

/// Display label for a country code, or the code itself when unknown.
pub fn country_label(code: &str) -> &str {
    label_in(COUNTRIES, code)
}

/// Display label for an interest code, or the code itself when unknown.
pub fn interest_label(code: &str) -> &str {
    label_in(INTERESTS, code)
}

pub fn is_known_country(code: &str) -> bool {
    COUNTRIES.iter().any(|choice| choice.value == code)
}

pub fn is_known_interest(code: &str) -> bool {
    INTERESTS.iter().any(|choice| choice.value == code)
}
