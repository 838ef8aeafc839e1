use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::access::manager::{AuthClient, AuthError};
use crate::access::provisioning::{Profile, ProfileStore, ProfileStoreError};
use crate::access::session::{AuthenticatedUser, Session, UserId};

pub(super) fn user(role: &str) -> AuthenticatedUser {
    AuthenticatedUser::new("user-1", "wanjiru@example.com").with_role(role)
}

pub(super) fn signed_in(role: &str) -> Session {
    Session::signed_in(user(role))
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    rows: Mutex<HashMap<UserId, Profile>>,
    inserts: AtomicUsize,
}

impl MemoryProfiles {
    pub(super) fn get(&self, id: &str) -> Option<Profile> {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .get(&UserId(id.to_string()))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.rows.lock().expect("profile mutex poisoned").len()
    }

    pub(super) fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl ProfileStore for MemoryProfiles {
    fn find_by_user_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileStoreError> {
        Ok(self
            .rows
            .lock()
            .expect("profile mutex poisoned")
            .get(id)
            .cloned())
    }

    fn insert(&self, profile: Profile) -> Result<(), ProfileStoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().expect("profile mutex poisoned");
        if rows.contains_key(&profile.user_id) {
            return Err(ProfileStoreError::Conflict);
        }
        rows.insert(profile.user_id.clone(), profile);
        Ok(())
    }
}

/// Lookup always misses and inserts always conflict, as when another
/// sign-in notification won the race.
pub(super) struct RacingProfiles;

impl ProfileStore for RacingProfiles {
    fn find_by_user_id(&self, _id: &UserId) -> Result<Option<Profile>, ProfileStoreError> {
        Ok(None)
    }

    fn insert(&self, _profile: Profile) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::Conflict)
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileStore for UnavailableProfiles {
    fn find_by_user_id(&self, _id: &UserId) -> Result<Option<Profile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _profile: Profile) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct StubAuth {
    pub(super) current: Result<Option<AuthenticatedUser>, String>,
    pub(super) sign_out_fails: bool,
    pub(super) sign_out_calls: AtomicUsize,
}

impl StubAuth {
    pub(super) fn signed_in(user: AuthenticatedUser) -> Self {
        Self {
            current: Ok(Some(user)),
            sign_out_fails: false,
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn signed_out() -> Self {
        Self {
            current: Ok(None),
            sign_out_fails: false,
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn offline() -> Self {
        Self {
            current: Err("network unreachable".to_string()),
            sign_out_fails: true,
            sign_out_calls: AtomicUsize::new(0),
        }
    }
}

impl AuthClient for StubAuth {
    fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        self.current.clone().map_err(AuthError::Unavailable)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.sign_out_fails {
            Err(AuthError::Unavailable("network unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}
