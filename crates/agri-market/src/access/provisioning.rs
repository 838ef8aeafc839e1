use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::session::{AuthenticatedUser, UserId};

pub const DEFAULT_USER_ROLE: &str = "farmer";
pub const DEFAULT_ACCOUNT_TYPE: &str = "seller";

/// Marketplace profile row keyed by the auth user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub full_name: String,
    pub email: Option<String>,
    pub user_role: String,
    pub account_type: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}

impl Profile {
    /// Default profile synthesized from the auth user's metadata.
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        let metadata = &user.metadata;
        let full_name = non_blank(metadata.full_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| email_local_part(user.email.as_deref()));

        Self {
            user_id: user.id.clone(),
            full_name,
            email: user.email.clone(),
            user_role: non_blank(metadata.user_role.as_deref())
                .unwrap_or(DEFAULT_USER_ROLE)
                .to_string(),
            account_type: non_blank(metadata.account_type.as_deref())
                .unwrap_or(DEFAULT_ACCOUNT_TYPE)
                .to_string(),
            phone: non_blank(metadata.phone.as_deref()).map(str::to_string),
            company_name: non_blank(metadata.company_name.as_deref()).map(str::to_string),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn email_local_part(email: Option<&str>) -> String {
    email
        .and_then(|email| email.split('@').next())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Storage abstraction over the hosted profiles table.
pub trait ProfileStore: Send + Sync {
    fn find_by_user_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileStoreError>;
    fn insert(&self, profile: Profile) -> Result<(), ProfileStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("could not look up profile for {user}: {source}")]
    Lookup {
        user: String,
        #[source]
        source: ProfileStoreError,
    },
    #[error("could not create profile for {user}: {source}")]
    Insert {
        user: String,
        #[source]
        source: ProfileStoreError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyPresent,
}

/// Creates a profile for a newly signed-in user when none exists yet.
pub struct ProfileProvisioner<P> {
    store: Arc<P>,
}

impl<P> Clone for ProfileProvisioner<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<P> ProfileProvisioner<P>
where
    P: ProfileStore + 'static,
{
    pub fn new(store: Arc<P>) -> Self {
        Self { store }
    }

    /// Upsert-if-absent. A conflicting concurrent insert counts as already present.
    pub fn ensure_profile(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<ProvisionOutcome, ProvisioningError> {
        let existing =
            self.store
                .find_by_user_id(&user.id)
                .map_err(|source| ProvisioningError::Lookup {
                    user: user.id.0.clone(),
                    source,
                })?;
        if existing.is_some() {
            debug!(user = %user.id.0, "profile already present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        match self.store.insert(Profile::for_user(user)) {
            Ok(()) => {
                info!(user = %user.id.0, "created default profile");
                Ok(ProvisionOutcome::Created)
            }
            Err(ProfileStoreError::Conflict) => Ok(ProvisionOutcome::AlreadyPresent),
            Err(source) => Err(ProvisioningError::Insert {
                user: user.id.0.clone(),
                source,
            }),
        }
    }
}
