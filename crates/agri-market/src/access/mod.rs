//! Session snapshots, role gating for protected views, and first sign-in
//! profile provisioning.

pub mod gate;
pub mod manager;
pub mod provisioning;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use gate::{decide, AccessPolicy, GateDecision, Redirect, RoleSet, AUTH_PATH, HOME_PATH};
pub use manager::{AuthClient, AuthError, AuthEvent, SessionManager};
pub use provisioning::{
    Profile, ProfileProvisioner, ProfileStore, ProfileStoreError, ProvisionOutcome,
    ProvisioningError, DEFAULT_ACCOUNT_TYPE, DEFAULT_USER_ROLE,
};
pub use router::{access_router, DecisionRequest, DecisionResponse};
pub use session::{AuthenticatedUser, Session, UserId, UserMetadata};
