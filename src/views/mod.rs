//! Server-side HTML for the registration page. Every view is a `Display`
//! implementation, so rendering cannot fail.

pub mod form;
pub mod list;
pub mod page;

use std::fmt::{self, Write};

/// Escapes HTML special characters in text and attribute values.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                other => f.write_char(other)?,
            }
        }
        Ok(())
    }
}

/// Renders ` name` when `on` holds; used for boolean attributes.
pub(crate) struct Flag(pub &'static str, pub bool);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, " {}", self.0)
        } else {
            Ok(())
        }
    }
}
