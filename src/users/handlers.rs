use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateUserRequest, CreatedUserResponse, PublicUser},
    model::{NewUser, EMAIL_MAX, NAME_MAX, USERNAME_MAX},
    repo::RepoError,
};
use crate::{error::AppError, state::UsersState};

const MISSING_FIELDS: &str = "username, name, email, and password are required";
const DUPLICATE: &str = "username or email already exists";

pub fn user_routes() -> Router<UsersState> {
    Router::new()
        .route("/api/users/", get(list_users).post(create_user))
        .route("/api/users", get(list_users).post(create_user))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// A missing or unparsable body counts as every field missing.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<UsersState>,
    payload: Option<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let (Some(username), Some(name), Some(email), Some(password)) = (
        non_empty(payload.username),
        non_empty(payload.name),
        non_empty(payload.email),
        non_empty(payload.password),
    ) else {
        warn!("create user with missing fields");
        return Err(AppError::Validation(MISSING_FIELDS.into()));
    };

    for (field, value, max) in [
        ("username", &username, USERNAME_MAX),
        ("name", &name, NAME_MAX),
        ("email", &email, EMAIL_MAX),
    ] {
        if value.chars().count() > max {
            warn!(field, "create user field too long");
            return Err(AppError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }

    if let Some(existing) = state.users.find_by_username_or_email(&username, &email).await? {
        warn!(%username, %email, existing_id = %existing.id, "username or email already taken");
        return Err(AppError::Conflict(DUPLICATE.into()));
    }

    let new_user = NewUser::new(username, name, email, &password)?;

    let user = match state.users.insert(new_user).await {
        Ok(u) => u,
        Err(RepoError::Duplicate) => {
            warn!("unique constraint hit on insert");
            return Err(AppError::Conflict(DUPLICATE.into()));
        }
        Err(RepoError::Other(e)) => return Err(AppError::Internal(e)),
    };

    info!(user_id = %user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<UsersState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list_all().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}
