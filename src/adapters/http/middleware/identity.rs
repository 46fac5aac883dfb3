//! Trusted-header identity middleware and extractors for axum.
//!
//! The gateway in front of this service authenticates callers and forwards
//! their identity in two headers:
//!
//! - `X-Member-Id` - opaque member identifier (required for member routes)
//! - `X-Member-Role` - `member` (default) or `admin`
//!
//! ```text
//! Request → identity_middleware → injects AuthenticatedMember into extensions
//!                                          ↓
//!                                  Handler → RequireMember reads from extensions
//! ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedMember, MemberId, MemberRole};

pub const MEMBER_ID_HEADER: &str = "x-member-id";
pub const MEMBER_ROLE_HEADER: &str = "x-member-role";

/// Resolves the caller from the trusted headers.
///
/// Returns `Ok(None)` when no member id was forwarded.
pub fn member_from_headers(headers: &HeaderMap) -> Result<Option<AuthenticatedMember>, AuthError> {
    let Some(raw_id) = headers.get(MEMBER_ID_HEADER) else {
        return Ok(None);
    };
    let raw_id = raw_id
        .to_str()
        .map_err(|_| AuthError::InvalidIdentity("non-ASCII member id".to_string()))?;
    let id = MemberId::new(raw_id).map_err(|e| AuthError::InvalidIdentity(e.to_string()))?;

    let role = match headers.get(MEMBER_ROLE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::UnknownRole("non-ASCII role".to_string()))?
            .parse::<MemberRole>()?,
        None => MemberRole::default(),
    };

    Ok(Some(AuthenticatedMember::new(id, role)))
}

/// Middleware that injects the forwarded caller into request extensions.
///
/// Requests without `X-Member-Id` pass through anonymously; handlers that
/// need a member use [`RequireMember`]. Malformed identity headers are
/// rejected with 401.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    match member_from_headers(request.headers()) {
        Ok(Some(member)) => {
            request.extensions_mut().insert(member);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed identity headers");
            IdentityRejection::Invalid(e.to_string()).into_response()
        }
    }
}

/// Extractor that requires a forwarded member identity.
#[derive(Debug, Clone)]
pub struct RequireMember(pub AuthenticatedMember);

#[async_trait]
impl<S> FromRequestParts<S> for RequireMember
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedMember>()
            .cloned()
            .map(RequireMember)
            .ok_or(IdentityRejection::Missing)
    }
}

/// Rejection type for identity failures.
#[derive(Debug, Clone)]
pub enum IdentityRejection {
    /// No member identity was forwarded.
    Missing,
    /// The forwarded identity headers could not be parsed.
    Invalid(String),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let message = match self {
            IdentityRejection::Missing => "Member identity required".to_string(),
            IdentityRejection::Invalid(reason) => reason,
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "code": "UNAUTHORIZED",
                "message": message
            })),
        )
            .into_response()
    }
}
