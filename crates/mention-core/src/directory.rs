//! The user directory capability consumed by the engine.
//!
//! The engine never owns user data. Every function that needs to resolve a
//! mention is handed a [`UserDirectory`] value, so tests and production can
//! substitute any backing store (a fixed list, a database, a remote
//! service) without the engine noticing.

/// A member of the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier - the `ID` carried inside `<@ID>` tokens.
    pub id: String,
    /// Unique handle (login-style name), searchable but never rendered.
    pub name: String,
    /// Human-facing name rendered after `@` in display form. Not unique:
    /// two users may share a display name.
    pub display_name: String,
    /// Profile picture URL.
    pub avatar_url: String,
}

impl User {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// User lookup capability injected into the engine.
///
/// `search` returns an ordered candidate sequence; the ranking is
/// implementation-defined and the result is uncapped - consumers cap it
/// (a dropdown typically keeps the top 10).
pub trait UserDirectory {
    /// Resolve a user by exact identifier.
    fn resolve(&self, user_id: &str) -> Option<User>;

    /// Find candidate users for an in-progress mention query.
    fn search(&self, query: &str) -> Vec<User>;
}

impl<D: UserDirectory + ?Sized> UserDirectory for &D {
    fn resolve(&self, user_id: &str) -> Option<User> {
        (**self).resolve(user_id)
    }

    fn search(&self, query: &str) -> Vec<User> {
        (**self).search(query)
    }
}

/// In-memory [`UserDirectory`] backed by a fixed user list.
///
/// `search` is a case-insensitive substring match over both `name` and
/// `display_name`, preserving list order; an empty query matches everyone.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<User>,
}

impl StaticDirectory {
    /// Create a directory over `users`.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// All users, in directory order.
    pub fn users(&self) -> &[User] {
        &self.users
    }
}

impl UserDirectory for StaticDirectory {
    fn resolve(&self, user_id: &str) -> Option<User> {
        self.users.iter().find(|user| user.id == user_id).cloned()
    }

    fn search(&self, query: &str) -> Vec<User> {
        let query = query.to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                user.name.to_lowercase().contains(&query)
                    || user.display_name.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }
}
