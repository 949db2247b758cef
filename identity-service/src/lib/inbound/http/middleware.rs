use auth::Authenticator;
use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Header carrying the bearer token, both on requests and on the login response.
pub const TOKEN_HEADER: HeaderName = HeaderName::from_static("tokenid");

/// Endpoints reachable without a token. The token header is ignored on these.
const PUBLIC_ENDPOINTS: [(Method, &str); 3] = [
    (Method::POST, "/login"),
    (Method::POST, "/validate"),
    (Method::POST, "/systemuser"),
];

/// Authenticated caller bound to a single request's extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub subject: UserId,
}

/// Result of running the token filter over one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// Public endpoint; no token processing.
    Bypassed,
    /// No token presented; authorization decides later.
    Anonymous,
    Authenticated(CallerIdentity),
    Rejected(TokenError),
}

pub fn is_public(method: &Method, path: &str) -> bool {
    PUBLIC_ENDPOINTS
        .iter()
        .any(|(public_method, public_path)| public_method == method && *public_path == path)
}

/// Decide the authentication state of a request from its method, path and headers.
pub fn resolve_caller(
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    authenticator: &Authenticator,
) -> AuthenticationOutcome {
    if is_public(method, path) {
        return AuthenticationOutcome::Bypassed;
    }

    let Some(value) = headers.get(TOKEN_HEADER) else {
        return AuthenticationOutcome::Anonymous;
    };

    let token = match value.to_str() {
        Ok(token) => token.trim(),
        Err(_) => {
            return AuthenticationOutcome::Rejected(TokenError::Malformed(
                "token header is not valid ASCII".to_string(),
            ))
        }
    };

    if token.is_empty() {
        return AuthenticationOutcome::Anonymous;
    }

    let claims = match authenticator.verify_token(token) {
        Ok(claims) => claims,
        Err(e) => return AuthenticationOutcome::Rejected(e),
    };

    match UserId::parse(&claims.sub) {
        Some(subject) => AuthenticationOutcome::Authenticated(CallerIdentity { subject }),
        None => AuthenticationOutcome::Rejected(TokenError::Malformed(
            "subject is not a user id".to_string(),
        )),
    }
}

/// Token filter in front of every route.
///
/// Binds a [`CallerIdentity`] for valid tokens and rejects requests carrying
/// an invalid one. Requests without a token pass through unbound.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let outcome = resolve_caller(
        req.method(),
        req.uri().path(),
        req.headers(),
        &state.authenticator,
    );

    match outcome {
        AuthenticationOutcome::Bypassed | AuthenticationOutcome::Anonymous => {}
        AuthenticationOutcome::Authenticated(caller) => {
            tracing::debug!(user_id = %caller.subject, "Caller authenticated");
            req.extensions_mut().insert(caller);
        }
        AuthenticationOutcome::Rejected(e) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                error = %e,
                "Token rejected"
            );
            return Err(ApiError::from(e));
        }
    }

    Ok(next.run(req).await)
}

/// Deny-by-default guard for protected routes.
pub async fn require_identity(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<CallerIdentity>().is_none() {
        return Err(ApiError::unauthorized("Authentication required"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use auth::HashingParams;
    use auth::PasswordHasher;
    use auth::TokenCodec;
    use auth::TokenSettings;
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_params(HashingParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            hash_length: 32,
        })
        .unwrap();

        Authenticator::new(
            SECRET,
            hasher,
            TokenSettings::new("org.example.identity", "expenser", 20_000_000),
        )
    }

    fn with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_public_post_without_header_is_bypassed() {
        let outcome = resolve_caller(
            &Method::POST,
            "/login",
            &HeaderMap::new(),
            &authenticator(),
        );

        assert_eq!(outcome, AuthenticationOutcome::Bypassed);
    }

    #[test]
    fn test_public_endpoint_ignores_invalid_token() {
        let outcome = resolve_caller(
            &Method::POST,
            "/systemuser",
            &with_token("garbage"),
            &authenticator(),
        );

        assert_eq!(outcome, AuthenticationOutcome::Bypassed);
    }

    #[test]
    fn test_allowlist_matches_method_and_path() {
        assert!(is_public(&Method::POST, "/validate"));
        assert!(!is_public(&Method::GET, "/systemuser"));
        assert!(!is_public(&Method::POST, "/systemuser/1"));
    }

    #[test]
    fn test_protected_get_without_header_is_anonymous() {
        let authenticator = authenticator();

        assert_eq!(
            resolve_caller(&Method::GET, "/systemuser", &HeaderMap::new(), &authenticator),
            AuthenticationOutcome::Anonymous
        );
        assert_eq!(
            resolve_caller(&Method::GET, "/systemuser", &with_token(""), &authenticator),
            AuthenticationOutcome::Anonymous
        );
    }

    #[test]
    fn test_valid_token_binds_subject() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("1").unwrap();

        let outcome = resolve_caller(
            &Method::GET,
            "/systemuser",
            &with_token(&token),
            &authenticator,
        );

        assert_eq!(
            outcome,
            AuthenticationOutcome::Authenticated(CallerIdentity { subject: UserId(1) })
        );
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"TokenId").unwrap(),
            HeaderValue::from_str(&token).unwrap(),
        );

        let outcome = resolve_caller(&Method::DELETE, "/systemuser/1", &headers, &authenticator);

        assert!(matches!(outcome, AuthenticationOutcome::Authenticated(_)));
    }

    #[test]
    fn test_invalid_tokens_are_rejected() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("1").unwrap();
        let truncated = &token[..token.len() - 2];

        assert!(matches!(
            resolve_caller(&Method::GET, "/systemuser", &with_token(truncated), &authenticator),
            AuthenticationOutcome::Rejected(_)
        ));
        assert!(matches!(
            resolve_caller(&Method::GET, "/systemuser", &with_token("a.b"), &authenticator),
            AuthenticationOutcome::Rejected(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let authenticator = authenticator();
        let token = TokenCodec::new(SECRET)
            .issue("alice", "org.example.identity", "expenser", 20_000_000)
            .unwrap();

        let outcome = resolve_caller(
            &Method::GET,
            "/systemuser",
            &with_token(&token),
            &authenticator,
        );

        assert!(matches!(
            outcome,
            AuthenticationOutcome::Rejected(TokenError::Malformed(_))
        ));
    }
}
