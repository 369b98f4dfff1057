//! The page container: sole owner of the roster, the form and the success banner.
//!
//! There is one page per process, so every visitor sees and edits the same
//! draft, including another visitor's rejected input.

use std::time::Duration;

use uuid::Uuid;

use crate::form::{SubmitOutcome, UserForm};
use crate::logging::{LoggableUuid, RegistryEvent, SanitizedFullName};
use crate::models::user::{User, UserFormData, UserSchema};

pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(5);

/// Identifies one banner. A newer banner invalidates every older ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTicket(u64);

/// When the banner identified by `ticket` should clear itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerExpiry {
    pub ticket: BannerTicket,
    pub after: Duration,
}

#[derive(Debug, Clone)]
struct SuccessBanner {
    message: String,
    ticket: BannerTicket,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub expiry: BannerExpiry,
}

#[derive(Debug, Clone)]
pub struct PageSubmit {
    pub outcome: SubmitOutcome,
    pub registration: Option<Registration>,
}

#[derive(Debug)]
pub struct RegistrationPage {
    users: Vec<User>,
    form: UserForm,
    banner: Option<SuccessBanner>,
    banner_ttl: Duration,
    issued_tickets: u64,
}

impl RegistrationPage {
    pub fn new(schema: UserSchema, banner_ttl: Duration) -> Self {
        Self {
            users: Vec::new(),
            form: UserForm::new(schema),
            banner: None,
            banner_ttl,
            issued_tickets: 0,
        }
    }

    /// Accepted records in insertion order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    pub fn banner_message(&self) -> Option<&str> {
        self.banner.as_ref().map(|banner| banner.message.as_str())
    }

    /// Appends a validated record under a fresh id and announces it.
    pub fn add_user(&mut self, data: UserFormData) -> Registration {
        let user = User::new(Uuid::new_v4(), data);

        self.issued_tickets += 1;
        let ticket = BannerTicket(self.issued_tickets);
        self.banner = Some(SuccessBanner {
            message: format!("{} has been successfully added.", user.full_name),
            ticket,
        });
        self.users.push(user.clone());

        crate::log_registry_event!(
            RegistryEvent::RegistrationAccepted,
            user_id = %LoggableUuid(user.id),
            full_name = %SanitizedFullName::new(&user.full_name),
            roster_size = self.users.len(),
            "User added to roster"
        );

        Registration {
            user,
            expiry: BannerExpiry {
                ticket,
                after: self.banner_ttl,
            },
        }
    }

    /// Submits the form, routing an accepted record into the roster.
    pub fn submit_form(&mut self) -> PageSubmit {
        let mut accepted = None;
        let outcome = self.form.submit(|data| accepted = Some(data));

        if let SubmitOutcome::Rejected { error_count } = outcome {
            crate::log_registry_event!(
                RegistryEvent::RegistrationRejected,
                error_count,
                "Form submission failed validation"
            );
        }

        PageSubmit {
            outcome,
            registration: accepted.map(|data| self.add_user(data)),
        }
    }

    /// Clears the banner if `ticket` still identifies it.
    pub fn expire_banner(&mut self, ticket: BannerTicket) -> bool {
        match &self.banner {
            Some(banner) if banner.ticket == ticket => {
                self.banner = None;
                crate::log_registry_event!(
                    RegistryEvent::BannerExpired,
                    "Success banner cleared"
                );
                true
            }
            _ => false,
        }
    }
}

impl Default for RegistrationPage {
    fn default() -> Self {
        Self::new(UserSchema::default(), DEFAULT_BANNER_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_data(name: &str) -> UserFormData {
        UserFormData {
            full_name: name.to_string(),
            age: 30,
            country: "france".to_string(),
            interests: vec!["walking".to_string()],
        }
    }

    #[test]
    fn test_starts_empty() {
        let page = RegistrationPage::default();
        assert!(page.users().is_empty());
        assert_eq!(page.banner_message(), None);
    }

    #[test]
    fn test_add_user_appends_with_unique_ids() {
        let mut page = RegistrationPage::default();
        page.add_user(form_data("First Person"));
        page.add_user(form_data("Second Person"));

        let names: Vec<&str> = page.users().iter().map(|u| u.full_name.as_str()).collect();
        assert_eq!(names, vec!["First Person", "Second Person"]);
        assert_ne!(page.users()[0].id, page.users()[1].id);
    }

    #[test]
    fn test_banner_names_newest_person() {
        let mut page = RegistrationPage::default();
        let registration = page.add_user(form_data("Ada Lovelace"));

        assert_eq!(
            page.banner_message(),
            Some("Ada Lovelace has been successfully added.")
        );
        assert_eq!(registration.expiry.after, DEFAULT_BANNER_TTL);
    }

    #[test]
    fn test_superseded_ticket_does_not_clear_newer_banner() {
        let mut page = RegistrationPage::default();
        let first = page.add_user(form_data("First Person"));
        let second = page.add_user(form_data("Second Person"));

        assert!(!page.expire_banner(first.expiry.ticket));
        assert_eq!(
            page.banner_message(),
            Some("Second Person has been successfully added.")
        );

        assert!(page.expire_banner(second.expiry.ticket));
        assert_eq!(page.banner_message(), None);
    }

    #[test]
    fn test_submit_form_routes_accepted_record_into_roster() {
        let mut page = RegistrationPage::default();
        let form = page.form_mut();
        form.set_full_name("John Smith");
        form.set_age("25");
        form.set_country("england");
        form.toggle_interest("reading-books");
        form.toggle_interest("gym");

        let submit = page.submit_form();

        assert_eq!(submit.outcome, SubmitOutcome::Accepted);
        let registration = submit.registration.unwrap();
        assert_eq!(page.users(), &[registration.user]);
        assert_eq!(page.users()[0].interests, vec!["reading-books", "gym"]);
    }

    #[test]
    fn test_rejected_submit_leaves_roster_untouched() {
        let mut page = RegistrationPage::default();

        let submit = page.submit_form();

        assert_eq!(submit.outcome, SubmitOutcome::Rejected { error_count: 4 });
        assert!(submit.registration.is_none());
        assert!(page.users().is_empty());
        assert_eq!(page.banner_message(), None);
    }
}
