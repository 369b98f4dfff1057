use std::fmt;

use crate::form::FocusTarget;
use crate::page::RegistrationPage;

use super::form::FormView;
use super::list::UserListView;
use super::{Escaped, Flag};

pub struct PageView<'a> {
    pub page: &'a RegistrationPage,
    /// Focus request taken from the form for this render.
    pub focus: Option<FocusTarget>,
}

impl PageView<'_> {
    fn success_banner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(message) = self.page.banner_message() else {
            return Ok(());
        };

        writeln!(
            f,
            r#"<div class="notification-banner notification-banner--success" role="alert" aria-labelledby="success-banner-title" id="{}" tabindex="-1"{}>"#,
            FocusTarget::SuccessMessage.element_id(),
            Flag("autofocus", self.focus == Some(FocusTarget::SuccessMessage))
        )?;
        writeln!(
            f,
            r#"<h2 class="notification-banner__title" id="success-banner-title">Success</h2>"#
        )?;
        writeln!(
            f,
            r#"<p class="notification-banner__heading">{}</p>"#,
            Escaped(message)
        )?;
        writeln!(f, "</div>")
    }
}

impl fmt::Display for PageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, r#"<html lang="en">"#)?;
        writeln!(f, "<head>")?;
        writeln!(f, r#"<meta charset="UTF-8">"#)?;
        writeln!(
            f,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#
        )?;
        writeln!(f, "<title>User Registration</title>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, r#"<main class="main-wrapper" id="main-content" role="main">"#)?;
        writeln!(f, r#"<section class="registration">"#)?;
        writeln!(f, r#"<h1 class="heading-xl">User Registration</h1>"#)?;
        writeln!(f, r#"<p class="body-l">Add new users to the system.</p>"#)?;
        self.success_banner(f)?;
        writeln!(f, r#"<h2 class="heading-l">Add a new user</h2>"#)?;
        writeln!(
            f,
            "{}",
            FormView {
                form: self.page.form(),
                focus: self.focus,
            }
        )?;
        writeln!(f, "</section>")?;
        writeln!(f, r#"<section class="roster">"#)?;
        writeln!(
            f,
            "{}",
            UserListView {
                users: self.page.users(),
            }
        )?;
        writeln!(f, "</section>")?;
        writeln!(f, "</main>")?;
        writeln!(f, "</body>")?;
        write!(f, "</html>")
    }
}
