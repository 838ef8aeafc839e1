use axum::{http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::gate::{AccessPolicy, GateDecision, Redirect, RoleSet};
use super::session::Session;

/// Router exposing the access gate to thin clients.
pub fn access_router() -> Router {
    Router::new().route("/api/v1/access/decision", post(decision_handler))
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub session: Session,
    #[serde(default)]
    pub required_roles: RoleSet,
    #[serde(default)]
    pub view_only_roles: RoleSet,
    #[serde(default)]
    pub requested_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub decision: GateDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

pub(crate) async fn decision_handler(
    Json(request): Json<DecisionRequest>,
) -> (StatusCode, Json<DecisionResponse>) {
    let policy = AccessPolicy {
        required_roles: request.required_roles,
        view_only_roles: request.view_only_roles,
    };
    let requested_path = request.requested_path.as_deref().unwrap_or("/");

    let body = DecisionResponse {
        decision: policy.decide(&request.session),
        redirect: policy.redirect_for(&request.session, requested_path),
    };
    (StatusCode::OK, Json(body))
}
