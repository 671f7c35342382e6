use axum::{
    extract::Request,
    http::header::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Identity forwarded by the upstream gateway after it has authenticated the
/// request. This service never verifies credentials itself; it only consumes
/// the already-trusted user id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLES_HEADER: &str = "x-user-roles";

fn parse_identity(headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()))?
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Invalid X-User-Id header".to_string()))?;

    let roles = headers
        .get(USER_ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(AuthenticatedUser { user_id, roles })
}

/// Reads the gateway identity headers and inserts [`AuthenticatedUser`] into
/// request extensions. Requests without a valid user id are rejected with 401.
pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let user = parse_identity(req.headers())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                axum::http::header::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn parses_user_id_and_roles() {
        let user =
            parse_identity(&headers(&[("x-user-id", "42"), ("x-user-roles", "admin, safety")]))
                .unwrap();
        assert_eq!(user.user_id, 42);
        assert!(user.has_role("admin"));
        assert!(user.has_role("safety"));
        assert!(!user.has_role("reporter"));
    }

    #[test]
    fn missing_user_id_is_unauthorized() {
        let err = parse_identity(&headers(&[])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn non_numeric_user_id_is_unauthorized() {
        let err = parse_identity(&headers(&[("x-user-id", "abc")])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
