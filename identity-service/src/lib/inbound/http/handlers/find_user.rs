use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserQuery;
use crate::domain::user::models::Username;
use crate::inbound::http::middleware::CallerIdentity;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Look a user up by `id`, `username` or `email`, in that order of precedence.
///
/// Without any query string the caller's own record is returned.
pub async fn find_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    RawQuery(raw_query): RawQuery,
    params: Result<Query<FindUserParams>, QueryRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Query(params) = params?;
    let query = params.into_query(raw_query.as_deref(), &caller)?;

    state
        .user_service
        .find_user(&query)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FindUserParams {
    id: Option<String>,
    username: Option<String>,
    email: Option<String>,
}

impl FindUserParams {
    fn into_query(
        self,
        raw_query: Option<&str>,
        caller: &CallerIdentity,
    ) -> Result<UserQuery, UserError> {
        if let Some(id) = self.id {
            return UserId::parse(&id)
                .map(UserQuery::ById)
                .ok_or(UserError::BadParameter(format!("id={}", id)));
        }

        if let Some(username) = self.username {
            return Username::new(username)
                .map(UserQuery::ByUsername)
                .map_err(|e| UserError::BadParameter(e.to_string()));
        }

        if let Some(email) = self.email {
            return EmailAddress::new(email)
                .map(UserQuery::ByEmail)
                .map_err(|e| UserError::BadParameter(e.to_string()));
        }

        match raw_query {
            Some(raw) if !raw.is_empty() => Err(UserError::BadParameter(raw.to_string())),
            _ => Ok(UserQuery::ById(caller.subject)),
        }
    }
}
