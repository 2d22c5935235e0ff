use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::auth::TokenKeys;
use crate::error::WebError;

/// Identity established from a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Rejects requests without a valid bearer token and exposes the caller as
/// an [`AuthUser`] request extension.
pub async fn require_auth(
    State(keys): State<TokenKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers()).ok_or(WebError::Unauthorized)?;

    let claims = keys.verify(token).map_err(|e| {
        tracing::warn!("Invalid access token attempt: {}", e);
        WebError::Forbidden("Invalid or expired token".to_string())
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Access token with malformed subject: {}", claims.sub);
        WebError::Forbidden("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    fn protected_app(keys: TokenKeys) -> Router {
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthUser>| async move {
                    format!("{}:{}", user.user_id, user.username)
                }),
            )
            .route_layer(from_fn_with_state(keys, require_auth))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/me");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_exposes_caller() {
        let keys = TokenKeys::new("test-secret", 60);
        let token = keys.issue(7, "alice").unwrap();

        let (status, body) = call(protected_app(keys), Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7:alice");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let keys = TokenKeys::new("test-secret", 60);

        let (status, _) = call(protected_app(keys), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_is_forbidden() {
        let keys = TokenKeys::new("test-secret", 60);
        let foreign = TokenKeys::new("other-secret", 60).issue(7, "alice").unwrap();

        let (status, _) = call(protected_app(keys.clone()), Some("Bearer garbage")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(protected_app(keys), Some(&format!("Bearer {}", foreign))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed_header_has_no_token() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
    }
}
