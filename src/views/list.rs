use std::fmt;

use crate::models::user::User;
use crate::reference::{country_label, interest_label};

use super::Escaped;

pub const EMPTY_STATE: &str = "No users have been added yet.";
const COLUMNS: [&str; 4] = ["Name", "Age", "Country", "Interests"];

/// "1 user registered" / "N users registered".
pub fn count_line(count: usize) -> String {
    let noun = if count == 1 { "user" } else { "users" };
    format!("{count} {noun} registered")
}

/// One table row with codes already resolved to display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow<'a> {
    pub name: &'a str,
    pub age: u32,
    pub country: &'a str,
    pub interests: Vec<&'a str>,
}

impl<'a> ListRow<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            name: &user.full_name,
            age: user.age,
            country: country_label(&user.country),
            interests: user
                .interests
                .iter()
                .map(|code| interest_label(code))
                .collect(),
        }
    }
}

/// The roster table, in insertion order.
pub struct UserListView<'a> {
    pub users: &'a [User],
}

impl fmt::Display for UserListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.users.is_empty() {
            return write!(f, r#"<div class="inset-text"><p>{EMPTY_STATE}</p></div>"#);
        }

        writeln!(f, r#"<div class="user-list">"#)?;
        writeln!(f, r#"<h2 class="heading-m">Registered users</h2>"#)?;
        writeln!(f, r#"<p class="body">{}</p>"#, count_line(self.users.len()))?;
        writeln!(f, r#"<table class="table">"#)?;
        writeln!(
            f,
            r#"<caption class="visually-hidden">List of registered users</caption>"#
        )?;
        f.write_str("<thead><tr>")?;
        for column in COLUMNS {
            write!(f, r#"<th scope="col">{column}</th>"#)?;
        }
        writeln!(f, "</tr></thead>")?;

        writeln!(f, "<tbody>")?;
        for user in self.users {
            let row = ListRow::new(user);
            write!(
                f,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td><ul>",
                Escaped(row.name),
                row.age,
                Escaped(row.country)
            )?;
            for interest in &row.interests {
                write!(f, "<li>{}</li>", Escaped(interest))?;
            }
            writeln!(f, "</ul></td></tr>")?;
        }
        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")?;
        write!(f, "</div>")
    }
}
