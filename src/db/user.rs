//! User model for Caixa-Preta.
//!
//! Users mirror identities issued by the external identity provider. This
//! crate only ever creates them; it never updates or deletes them.

/// A user known to the store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Stable identifier issued by the identity provider.
    pub id: String,
    /// Email address, if the provider shares one.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// When the user row was created.
    pub created_at: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Stable identifier issued by the identity provider.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

impl NewUser {
    /// Create a new user with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            name: None,
        }
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
