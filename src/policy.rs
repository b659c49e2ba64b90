//! Registration-lock policy gate.
//!
//! Decides whether a verified identity may establish a session. The gate
//! runs after token verification and before any cookie is minted.

use crate::config::Config;

/// When registration is open everyone is admitted. When locked, only
/// lower-cased members of the admin allowlist get in; a missing or empty
/// email is never admitted.
pub fn is_admitted(config: &Config, email: Option<&str>) -> bool {
    if config.registration_enabled {
        return true;
    }

    let Some(email) = email else {
        return false;
    };
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return false;
    }

    config.primary_admins.iter().any(|admin| *admin == email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked_config(admins: &[&str]) -> Config {
        Config {
            registration_enabled: false,
            primary_admins: admins.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn test_open_registration_admits_everyone() {
        let config = Config::default();
        assert!(is_admitted(&config, Some("anyone@example.com")));
        assert!(is_admitted(&config, None));
    }

    #[test]
    fn test_locked_registration_admits_only_admins() {
        let config = locked_config(&["admin@example.com"]);
        assert!(is_admitted(&config, Some("admin@example.com")));
        assert!(is_admitted(&config, Some("ADMIN@Example.COM")));
        assert!(!is_admitted(&config, Some("user@example.com")));
    }

    #[test]
    fn test_locked_registration_rejects_missing_email() {
        let config = locked_config(&["admin@example.com"]);
        assert!(!is_admitted(&config, None));
        assert!(!is_admitted(&config, Some("")));
        assert!(!is_admitted(&config, Some("   ")));
    }
}
