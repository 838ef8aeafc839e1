use serde::{Deserialize, Serialize};

/// Identifier issued by the hosted auth platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Profile metadata attached to the auth user at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            email: Some(email.into()),
            metadata: UserMetadata::default(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.metadata.user_role = Some(role.into());
        self
    }

    /// Declared role exactly as stored. Blank values count as no role.
    pub fn role(&self) -> Option<&str> {
        self.metadata
            .user_role
            .as_deref()
            .filter(|role| !role.trim().is_empty())
    }
}

/// Point-in-time view of the auth state that callers thread through explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }

    pub fn signed_in(user: AuthenticatedUser) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().and_then(AuthenticatedUser::role)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}
