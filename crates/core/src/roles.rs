//! Admin allow-list.
//!
//! Admin rights are not stored on the user row: a fixed set of usernames,
//! supplied by deployment configuration, may manage accounts. The same
//! accounts can never be deleted.

/// Usernames granted admin rights when `ADMIN_USERNAMES` is not set.
pub const DEFAULT_ADMIN_USERNAMES: &[&str] = &["skoptilin", "svasyuk"];

/// The set of usernames allowed to perform user administration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAllowList {
    usernames: Vec<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for username in usernames.into_iter().map(Into::into) {
            if !unique.contains(&username) {
                unique.push(username);
            }
        }
        Self { usernames: unique }
    }

    /// Parse a comma-separated list, ignoring blanks and surrounding whitespace.
    pub fn from_csv(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        )
    }

    /// Exact, case-sensitive membership check.
    pub fn is_admin(&self, username: &str) -> bool {
        self.usernames.iter().any(|u| u == username)
    }

    /// Admin accounts are protected from deletion.
    pub fn is_protected(&self, username: &str) -> bool {
        self.is_admin(username)
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }
}

impl Default for AdminAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USERNAMES.iter().copied())
    }
}
