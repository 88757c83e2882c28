use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::auth::password::digest_password;
use crate::dto::{AuthRequest, AuthResponse, ACTION_LOGIN, ACTION_REGISTER};
use crate::error::{AppError, AppResult};
use crate::models::user::UserSummary;
use crate::AppState;

/// POST /auth: dispatches on `action`.
pub async fn authenticate(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<AuthRequest>, AppError>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    match body.action.as_str() {
        ACTION_REGISTER => {
            let (username, password) = required_credentials(&body)?;
            register(&state.db, username, password).await
        }
        ACTION_LOGIN => {
            let (username, password) = required_credentials(&body)?;
            login(&state.db, username, password).await
        }
        other => {
            tracing::debug!(action = other, "Rejected unknown auth action");
            Err(AppError::InvalidAction)
        }
    }
}

fn required_credentials(body: &AuthRequest) -> AppResult<(&str, &str)> {
    body.credentials()
        .ok_or_else(|| AppError::MalformedBody("username and password are required".into()))
}

pub async fn register(
    db: &sqlx::PgPool,
    username: &str,
    password: &str,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = digest_password(password);

    let user = sqlx::query_as::<_, UserSummary>(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        RETURNING id, username, created_at
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .fetch_one(db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username already exists".into())
        }
        other => AppError::Database(other),
    })?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: Some("User registered successfully".into()),
            user,
        }),
    ))
}

/// Unknown usernames and wrong passwords both come back as `Unauthorized`.
pub async fn login(
    db: &sqlx::PgPool,
    username: &str,
    password: &str,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = digest_password(password);

    let user = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username, created_at FROM users
        WHERE username = $1 AND password_hash = $2
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .fetch_optional(db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    tracing::debug!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            success: true,
            message: None,
            user,
        }),
    ))
}
