use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::provisioning::{ProfileProvisioner, ProfileStore};
use super::session::{AuthenticatedUser, Session};

/// Port onto the hosted auth platform's client.
pub trait AuthClient: Send + Sync {
    /// Point-in-time lookup of the signed-in user, if any.
    fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError>;
    fn sign_out(&self) -> Result<(), AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth platform unavailable: {0}")]
    Unavailable(String),
    #[error("auth platform rejected the request: {0}")]
    Rejected(String),
}

/// Session change notification emitted by the auth platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthenticatedUser),
    SignedOut,
    /// Token refreshes, user updates, and similar; carries the current user if known.
    Other(Option<AuthenticatedUser>),
}

/// Owns the latest resolved session and reacts to auth events.
///
/// Profile provisioning after sign-in runs on its own blocking task so a slow or
/// failing profile store never delays the session update.
pub struct SessionManager<A, P> {
    auth: Arc<A>,
    provisioner: ProfileProvisioner<P>,
    state: RwLock<Session>,
}

impl<A, P> SessionManager<A, P>
where
    A: AuthClient + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(auth: Arc<A>, profiles: Arc<P>) -> Self {
        Self {
            auth,
            provisioner: ProfileProvisioner::new(profiles),
            state: RwLock::new(Session::loading()),
        }
    }

    /// Snapshot to hand to the access gate.
    pub fn current(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve the initial session. Lookup failures resolve to signed out.
    pub fn initialize(&self) -> Session {
        let session = match self.auth.current_user() {
            Ok(Some(user)) => Session::signed_in(user),
            Ok(None) => Session::anonymous(),
            Err(err) => {
                warn!(error = %err, "could not resolve current session; treating as signed out");
                Session::anonymous()
            }
        };
        self.store(session.clone());
        session
    }

    /// Apply one auth event. Returns the provisioning task spawned for sign-ins.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle_event(&self, event: AuthEvent) -> Option<JoinHandle<()>> {
        match event {
            AuthEvent::SignedIn(user) => {
                info!(user = %user.id.0, "user signed in");
                self.store(Session::signed_in(user.clone()));
                Some(self.spawn_provisioning(user))
            }
            AuthEvent::SignedOut => {
                info!("user signed out");
                self.store(Session::anonymous());
                None
            }
            AuthEvent::Other(Some(user)) => {
                debug!(user = %user.id.0, "session updated");
                self.store(Session::signed_in(user));
                None
            }
            AuthEvent::Other(None) => {
                debug!("session event without user");
                self.store(Session::anonymous());
                None
            }
        }
    }

    /// Consume events until the sender side closes.
    pub async fn run(&self, mut events: mpsc::Receiver<AuthEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        debug!("auth event stream closed");
    }

    /// Clears local state first, then asks the platform to end the session.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store(Session::anonymous());
        self.auth.sign_out().map_err(|err| {
            warn!(error = %err, "remote sign-out failed; local session already cleared");
            err
        })
    }

    fn store(&self, session: Session) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn spawn_provisioning(&self, user: AuthenticatedUser) -> JoinHandle<()> {
        let provisioner = self.provisioner.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = provisioner.ensure_profile(&user) {
                warn!(error = %err, "profile provisioning failed");
            }
        })
    }
}
