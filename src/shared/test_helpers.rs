#[cfg(test)]
use crate::core::identity::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_safety_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 1,
        roles: vec![crate::shared::constants::ROLE_SAFETY_ADMIN.to_string()],
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_reporter_user(user_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        roles: vec![crate::shared::constants::ROLE_REPORTER.to_string()],
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_safety_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_safety_admin_user());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_safety_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_safety_admin_middleware))
}
