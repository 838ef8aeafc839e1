use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::session::Session;

pub const AUTH_PATH: &str = "/auth";
pub const HOME_PATH: &str = "/";

/// Set of role labels, compared exactly.
pub type RoleSet = BTreeSet<String>;

/// Outcome of checking a session against a view's role requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Auth is still resolving; show a waiting indicator, neither render nor redirect.
    Pending,
    Allow,
    RedirectToAuth,
    RedirectToHome,
}

impl GateDecision {
    pub const fn label(self) -> &'static str {
        match self {
            GateDecision::Pending => "pending",
            GateDecision::Allow => "allow",
            GateDecision::RedirectToAuth => "redirect_to_auth",
            GateDecision::RedirectToHome => "redirect_to_home",
        }
    }
}

/// Concrete navigation for a redirect decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub to: String,
    /// Originally requested location, so sign-in can return there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

/// Evaluates `session` against the role sets. First matching rule wins:
/// loading, then missing user, then open views, then role membership.
pub fn decide(
    session: &Session,
    required_roles: &RoleSet,
    view_only_roles: &RoleSet,
) -> GateDecision {
    if session.loading {
        return GateDecision::Pending;
    }

    let Some(user) = session.user.as_ref() else {
        return GateDecision::RedirectToAuth;
    };

    if required_roles.is_empty() {
        return GateDecision::Allow;
    }

    match user.role() {
        Some(role) if required_roles.contains(role) || view_only_roles.contains(role) => {
            GateDecision::Allow
        }
        _ => GateDecision::RedirectToHome,
    }
}

/// Role requirements for one protected view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    pub required_roles: RoleSet,
    #[serde(default)]
    pub view_only_roles: RoleSet,
}

impl AccessPolicy {
    /// Any signed-in user may enter.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn requiring<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            required_roles: roles.into_iter().map(Into::into).collect(),
            view_only_roles: RoleSet::new(),
        }
    }

    pub fn with_view_only<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.view_only_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn decide(&self, session: &Session) -> GateDecision {
        decide(session, &self.required_roles, &self.view_only_roles)
    }

    /// Navigation the caller should perform, if any, for `requested_path`.
    pub fn redirect_for(&self, session: &Session, requested_path: &str) -> Option<Redirect> {
        match self.decide(session) {
            GateDecision::RedirectToAuth => Some(Redirect {
                to: AUTH_PATH.to_string(),
                return_to: Some(requested_path.to_string()),
            }),
            GateDecision::RedirectToHome => Some(Redirect {
                to: HOME_PATH.to_string(),
                return_to: None,
            }),
            GateDecision::Pending | GateDecision::Allow => None,
        }
    }
}
