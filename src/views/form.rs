use std::fmt;

use crate::form::{FocusTarget, UserForm};
use crate::models::Field;
use crate::reference::{COUNTRIES, COUNTRY_PLACEHOLDER, INTERESTS};

use super::{Escaped, Flag};

pub struct FormView<'a> {
    pub form: &'a UserForm,
    pub focus: Option<FocusTarget>,
}

impl FormView<'_> {
    fn error_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.form.errors();
        let Some(heading) = errors.summary_heading() else {
            return Ok(());
        };

        writeln!(
            f,
            r#"<div class="error-summary" aria-labelledby="error-summary-title" role="alert" tabindex="-1" id="{}"{}>"#,
            FocusTarget::ErrorSummary.element_id(),
            Flag("autofocus", self.focus == Some(FocusTarget::ErrorSummary))
        )?;
        writeln!(
            f,
            r#"<h2 class="error-summary__title" id="error-summary-title">{heading}</h2>"#
        )?;
        f.write_str(r#"<ul class="error-summary__list">"#)?;
        for error in errors.iter() {
            write!(
                f,
                r##"<li><a href="#{}">{}</a></li>"##,
                error.field.anchor(),
                Escaped(&error.message)
            )?;
        }
        writeln!(f, "</ul>")?;
        writeln!(f, "</div>")
    }

    fn group_open(&self, f: &mut fmt::Formatter<'_>, field: Field) -> fmt::Result {
        let modifier = if self.form.visible_error(field).is_some() {
            " form-group--error"
        } else {
            ""
        };
        writeln!(f, r#"<div class="form-group{modifier}">"#)
    }

    fn inline_error(&self, f: &mut fmt::Formatter<'_>, field: Field) -> fmt::Result {
        match self.form.visible_error(field) {
            Some(message) => writeln!(
                f,
                r#"<p id="{}-error" class="error-message"><span class="visually-hidden">Error:</span> {}</p>"#,
                field.anchor(),
                Escaped(message)
            ),
            None => Ok(()),
        }
    }

    /// `aria-describedby` value: any hint first, then the visible error.
    fn described_by(&self, field: Field, hint: Option<&str>) -> String {
        let error = self
            .form
            .visible_error(field)
            .map(|_| format!("{}-error", field.anchor()));
        let ids: Vec<String> = hint.map(str::to_string).into_iter().chain(error).collect();
        if ids.is_empty() {
            String::new()
        } else {
            format!(r#" aria-describedby="{}""#, ids.join(" "))
        }
    }

    fn full_name(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = Field::FullName;
        self.group_open(f, field)?;
        writeln!(f, r#"<label class="label" for="full-name">{}</label>"#, field.label())?;
        self.inline_error(f, field)?;
        writeln!(
            f,
            r#"<input class="input" id="full-name" name="fullName" type="text" value="{}"{}>"#,
            Escaped(&self.form.draft().full_name),
            self.described_by(field, None)
        )?;
        writeln!(f, "</div>")
    }

    fn age(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = Field::Age;
        self.group_open(f, field)?;
        writeln!(f, r#"<label class="label" for="age">{}</label>"#, field.label())?;
        writeln!(
            f,
            r#"<div class="hint" id="age-hint">You must be {} or older</div>"#,
            self.form.schema().min_age()
        )?;
        self.inline_error(f, field)?;
        writeln!(
            f,
            r#"<input class="input input--width-5" id="age" name="age" type="number" value="{}"{}>"#,
            Escaped(&self.form.draft().age),
            self.described_by(field, Some("age-hint"))
        )?;
        writeln!(f, "</div>")
    }

    fn country(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = Field::Country;
        let selected = self.form.draft().country.as_str();
        self.group_open(f, field)?;
        writeln!(f, r#"<label class="label" for="country">{}</label>"#, field.label())?;
        self.inline_error(f, field)?;
        writeln!(
            f,
            r#"<select class="select" id="country" name="country"{}>"#,
            self.described_by(field, None)
        )?;
        for choice in std::iter::once(&COUNTRY_PLACEHOLDER).chain(COUNTRIES) {
            writeln!(
                f,
                r#"<option value="{}"{}>{}</option>"#,
                choice.value,
                Flag("selected", choice.value == selected),
                choice.label
            )?;
        }
        writeln!(f, "</select>")?;
        writeln!(f, "</div>")
    }

    fn interests(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = Field::Interests;
        self.group_open(f, field)?;
        writeln!(
            f,
            r#"<fieldset class="fieldset"{}>"#,
            self.described_by(field, Some("interests-hint"))
        )?;
        writeln!(
            f,
            r#"<legend class="fieldset__legend"><h2 class="fieldset__heading">{}</h2></legend>"#,
            field.label()
        )?;
        writeln!(f, r#"<div class="hint" id="interests-hint">Select all that apply</div>"#)?;
        self.inline_error(f, field)?;
        writeln!(f, r#"<div class="checkboxes" id="interests">"#)?;
        for choice in INTERESTS {
            writeln!(
                f,
                r#"<div class="checkboxes__item"><input class="checkboxes__input" id="interests-{value}" name="interests" type="checkbox" value="{value}"{checked}><label class="label checkboxes__label" for="interests-{value}">{label}</label></div>"#,
                value = choice.value,
                checked = Flag("checked", self.form.draft().has_interest(choice.value)),
                label = choice.label
            )?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "</fieldset>")?;
        writeln!(f, "</div>")
    }
}

impl fmt::Display for FormView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<div class="form-wrapper">"#)?;
        self.error_summary(f)?;
        writeln!(f, r#"<form method="post" action="/users" novalidate>"#)?;
        self.full_name(f)?;
        self.age(f)?;
        self.country(f)?;
        self.interests(f)?;
        writeln!(f, r#"<button type="submit" class="button">Add user</button>"#)?;
        writeln!(f, "</form>")?;
        write!(f, "</div>")
    }
}
