//! Registration form state: the editable draft, which fields have been
//! touched, and the errors from the most recent submit attempt.

use serde::Serialize;

use crate::models::user::{NewRegistration, UserFormData, UserSchema};
use crate::models::{Field, FieldError, FieldErrors, Touched};

/// In-progress form values exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub full_name: String,
    /// Raw age text; empty means unset.
    pub age: String,
    pub country: String,
    pub interests: Vec<String>,
}

impl Draft {
    /// Adds `value` if absent, removes it if present. Selection order is kept.
    pub fn toggle_interest(&mut self, value: &str) {
        if let Some(index) = self.interests.iter().position(|interest| interest == value) {
            self.interests.remove(index);
        } else {
            self.interests.push(value.to_string());
        }
    }

    pub fn has_interest(&self, value: &str) -> bool {
        self.interests.iter().any(|interest| interest == value)
    }

    /// Candidate for the schema. Unparseable age text counts as 0.
    fn to_registration(&self) -> NewRegistration {
        let age = self
            .age
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|age| age.is_finite())
            .unwrap_or(0.0);

        NewRegistration {
            full_name: self.full_name.clone(),
            age: Some(age),
            country: self.country.clone(),
            interests: self.interests.clone(),
        }
    }
}

/// Region that should receive keyboard focus on the next render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    SuccessMessage,
    ErrorSummary,
}

impl FocusTarget {
    pub fn element_id(self) -> &'static str {
        match self {
            FocusTarget::SuccessMessage => "success-message",
            FocusTarget::ErrorSummary => "error-summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "outcome")]
pub enum SubmitOutcome {
    Accepted,
    Rejected { error_count: usize },
}

#[derive(Debug, Clone)]
pub struct UserForm {
    schema: UserSchema,
    draft: Draft,
    touched: Touched,
    errors: FieldErrors,
    pending_focus: Option<FocusTarget>,
}

impl UserForm {
    pub fn new(schema: UserSchema) -> Self {
        Self {
            schema,
            draft: Draft::default(),
            touched: Touched::default(),
            errors: FieldErrors::default(),
            pending_focus: None,
        }
    }

    pub fn schema(&self) -> &UserSchema {
        &self.schema
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn touched(&self) -> &Touched {
        &self.touched
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn pending_focus(&self) -> Option<FocusTarget> {
        self.pending_focus
    }

    /// Hands the pending focus request to the renderer; it is honoured once.
    pub fn take_focus(&mut self) -> Option<FocusTarget> {
        self.pending_focus.take()
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.draft.full_name = value.into();
        self.touched.mark(Field::FullName);
    }

    pub fn set_age(&mut self, value: impl Into<String>) {
        self.draft.age = value.into();
        self.touched.mark(Field::Age);
    }

    pub fn set_country(&mut self, value: impl Into<String>) {
        self.draft.country = value.into();
        self.touched.mark(Field::Country);
    }

    pub fn toggle_interest(&mut self, value: &str) {
        self.draft.toggle_interest(value);
        self.touched.mark(Field::Interests);
    }

    /// Focus left `field` without a change.
    pub fn blur(&mut self, field: Field) {
        self.touched.mark(field);
    }

    /// Replaces the whole draft, as when a browser posts every input at once.
    pub fn replace_draft(&mut self, draft: Draft) {
        self.draft = draft;
        self.touched.mark_all();
    }

    /// Inline error for `field`, shown only once the field has been touched.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.touched.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .filter(|error| self.touched.is_touched(error.field))
            .collect()
    }

    /// Validates the draft. `accept` runs exactly once when every field
    /// passes and never otherwise.
    pub fn submit<F>(&mut self, accept: F) -> SubmitOutcome
    where
        F: FnOnce(UserFormData),
    {
        self.touched.mark_all();

        match self.schema.validate(&self.draft.to_registration()) {
            Ok(data) => {
                self.errors = FieldErrors::default();
                accept(data);
                self.draft = Draft::default();
                self.touched = Touched::default();
                self.pending_focus = Some(FocusTarget::SuccessMessage);
                SubmitOutcome::Accepted
            }
            Err(errors) => {
                let error_count = errors.len();
                self.errors = errors;
                self.pending_focus = Some(FocusTarget::ErrorSummary);
                SubmitOutcome::Rejected { error_count }
            }
        }
    }
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new(UserSchema::default())
    }
}
