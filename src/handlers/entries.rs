use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::dto::{DeleteEntryRequest, MessageResponse, SaveEntryRequest, UserSelector};
use crate::error::{AppError, AppResult};
use crate::models::entry::{WellnessEntry, ENTRY_COLUMNS};
use crate::AppState;

/// Used when a request names no user at all.
pub const DEFAULT_USER_ID: i32 = 1;

/// The caller-supplied id is trusted without any session check: any client
/// can act on any user's entries. Kept for compatibility with existing
/// clients; `0` is treated as absent.
pub fn resolve_user_id(candidates: &[Option<i32>]) -> i32 {
    match candidates.iter().flatten().find(|id| **id != 0) {
        Some(id) => *id,
        None => {
            tracing::debug!(user_id = DEFAULT_USER_ID, "No user_id supplied, using default");
            DEFAULT_USER_ID
        }
    }
}

/// POST /entries: insert, or fully replace the entry for `(user_id, date)`.
pub async fn upsert_entry(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SaveEntryRequest>, AppError>,
) -> AppResult<(StatusCode, Json<WellnessEntry>)> {
    let user_id = resolve_user_id(&[body.user_id]);

    let sql = format!(
        r#"
        INSERT INTO wellness_entries (user_id, date, mood, sleep, stress, journal, activities)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, date) DO UPDATE SET
            mood = EXCLUDED.mood,
            sleep = EXCLUDED.sleep,
            stress = EXCLUDED.stress,
            journal = EXCLUDED.journal,
            activities = EXCLUDED.activities,
            updated_at = CURRENT_TIMESTAMP
        RETURNING {ENTRY_COLUMNS}
        "#
    );

    let entry = sqlx::query_as::<_, WellnessEntry>(&sql)
        .bind(user_id)
        .bind(body.date)
        .bind(body.mood)
        .bind(body.sleep)
        .bind(body.stress)
        .bind(&body.journal)
        .bind(&body.activities)
        .fetch_one(&state.db)
        .await?;

    tracing::debug!(user_id, date = %entry.date, entry_id = entry.id, "Entry saved");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /entries: newest first. The user comes from an optional JSON body,
/// then the `user_id` query parameter. A `user_id` that is not an integer
/// is rejected rather than falling back to the default user.
pub async fn list_entries(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserSelector>, AppError>,
    body: Bytes,
) -> AppResult<Json<Vec<WellnessEntry>>> {
    let from_body = parse_optional_body::<UserSelector>(&body)?.and_then(|s| s.user_id);
    let from_query = query.user_id;
    let user_id = resolve_user_id(&[from_body, from_query]);

    let sql = format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM wellness_entries
        WHERE user_id = $1
        ORDER BY date DESC
        "#
    );

    let entries = sqlx::query_as::<_, WellnessEntry>(&sql)
        .bind(user_id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(entries))
}

/// DELETE /entries: succeeds whether or not the entry existed.
pub async fn delete_entry(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<DeleteEntryRequest>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    let user_id = resolve_user_id(&[body.user_id]);

    let result = sqlx::query("DELETE FROM wellness_entries WHERE user_id = $1 AND date = $2")
        .bind(user_id)
        .bind(body.date)
        .execute(&state.db)
        .await?;

    tracing::debug!(
        user_id,
        date = %body.date,
        rows = result.rows_affected(),
        "Entry delete processed"
    );

    Ok(Json(MessageResponse::new("Entry deleted successfully")))
}

fn parse_optional_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> AppResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    // A literal `null` body counts as absent.
    let value: Option<T> = serde_json::from_slice(body)?;
    Ok(value)
}
