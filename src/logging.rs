use std::fmt;
use uuid::Uuid;

/// Sanitized wrapper for full names that keeps only the first and last character
#[derive(Debug, Clone)]
pub struct SanitizedFullName(String);

impl SanitizedFullName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Self::sanitize(name.as_ref().trim()))
    }

    fn sanitize(name: &str) -> String {
        let mut chars = name.chars();
        match (chars.next(), chars.next_back(), chars.next()) {
            (None, _, _) => String::new(),
            // One or two characters: mask entirely
            (Some(_), None, _) | (Some(_), Some(_), None) => "*".repeat(name.chars().count()),
            (Some(first), Some(last), Some(_)) => format!("{first}***{last}"),
        }
    }
}

impl fmt::Display for SanitizedFullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper for UUIDs that are safe to log
#[derive(Debug, Clone, Copy)]
pub struct LoggableUuid(pub Uuid);

impl fmt::Display for LoggableUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LoggableUuid {
    fn from(uuid: Uuid) -> Self {
        LoggableUuid(uuid)
    }
}

/// Sanitized wrapper for IP addresses that masks the last octet or segment
#[derive(Debug, Clone)]
pub struct SanitizedIpAddr(String);

impl SanitizedIpAddr {
    pub fn new(ip: impl fmt::Display) -> Self {
        Self(Self::sanitize(&ip.to_string()))
    }

    fn sanitize(ip: &str) -> String {
        if let Some((network, _)) = ip.rsplit_once('.') {
            format!("{network}.***")
        } else if let Some((network, _)) = ip.rsplit_once(':') {
            format!("{network}:****")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Display for SanitizedIpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster event types for structured logging
#[derive(Debug, Clone, Copy)]
pub enum RegistryEvent {
    RegistrationAccepted,
    RegistrationRejected,
    MalformedSubmission,
    SubmissionRateLimited,
    BannerExpired,
}

impl RegistryEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryEvent::RegistrationAccepted => "registration_accepted",
            RegistryEvent::RegistrationRejected => "registration_rejected",
            RegistryEvent::MalformedSubmission => "malformed_submission",
            RegistryEvent::SubmissionRateLimited => "submission_rate_limited",
            RegistryEvent::BannerExpired => "banner_expired",
        }
    }

    /// Notable events are logged at `warn`.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            RegistryEvent::MalformedSubmission | RegistryEvent::SubmissionRateLimited
        )
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log a roster event with sanitized context
#[macro_export]
macro_rules! log_registry_event {
    ($event:expr, $($field:tt)*) => {
        if $event.is_notable() {
            tracing::warn!(
                registry_event = %$event,
                event_type = "registry",
                $($field)*
            );
        } else {
            tracing::info!(
                registry_event = %$event,
                event_type = "registry",
                $($field)*
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_full_name() {
        assert_eq!(SanitizedFullName::new("John Smith").to_string(), "J***h");
        assert_eq!(SanitizedFullName::new("Al").to_string(), "**");
        assert_eq!(SanitizedFullName::new("A").to_string(), "*");
        assert_eq!(SanitizedFullName::new("Bob").to_string(), "B***b");
        assert_eq!(SanitizedFullName::new("   ").to_string(), "");
    }

    #[test]
    fn test_sanitize_full_name_counts_characters_not_bytes() {
        assert_eq!(SanitizedFullName::new("Zoë").to_string(), "Z***ë");
        assert_eq!(SanitizedFullName::new("Éa").to_string(), "**");
    }

    #[test]
    fn test_sanitize_ipv4() {
        assert_eq!(
            SanitizedIpAddr::new("192.168.1.100").to_string(),
            "192.168.1.***"
        );
        assert_eq!(SanitizedIpAddr::new("10.0.0.1").to_string(), "10.0.0.***");
    }

    #[test]
    fn test_sanitize_ipv6() {
        assert_eq!(
            SanitizedIpAddr::new("2001:0db8:85a3:0000:0000:8a2e:0370:7334").to_string(),
            "2001:0db8:85a3:0000:0000:8a2e:0370:****"
        );
    }

    #[test]
    fn test_registry_event_notable() {
        assert!(RegistryEvent::SubmissionRateLimited.is_notable());
        assert!(RegistryEvent::MalformedSubmission.is_notable());
        assert!(!RegistryEvent::RegistrationAccepted.is_notable());
    }

    #[test]
    fn test_loggable_uuid() {
        let uuid = Uuid::new_v4();
        let loggable = LoggableUuid::from(uuid);
        assert_eq!(loggable.to_string(), uuid.to_string());
    }
}
