//! Middleware and extractors for authentication, logging and tracing

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use parley_auth::{AuthError, UserProfile};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, Level};

use crate::error::GatewayError;
use crate::state::GatewayState;
use crate::util::{bearer_token, require_bearer};

/// The user behind a valid bearer token. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

#[async_trait]
impl FromRequestParts<Arc<GatewayState>> for CurrentUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState>,
    ) -> Result<Self, Self::Rejection> {
        let token = require_bearer(&parts.headers)?;
        let (user, _session) = state.authenticator.authenticate_token(&token).await?;
        Ok(Self(user))
    }
}

/// The signed-in user if the request carries a usable token.
///
/// Used by server actions, which answer unauthenticated callers with a
/// tagged result instead of a bare 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<UserProfile>);

impl MaybeUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.id.as_str())
    }
}

#[async_trait]
impl FromRequestParts<Arc<GatewayState>> for MaybeUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState>,
    ) -> Result<Self, Self::Rejection> {
        let Ok(Some(token)) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.authenticator.authenticate_token(&token).await {
            Ok((user, _session)) => Ok(Self(Some(user))),
            Err(AuthError::Database(err)) => Err(GatewayError::from(err)),
            Err(err) => {
                debug!(error = %err, "ignoring unusable session token");
                Ok(Self(None))
            }
        }
    }
}

/// Create tracing middleware
pub fn create_trace_middleware() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
