use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ready once the database answers and both tables exist.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let schema = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT to_regclass('public.users') IS NOT NULL
           AND to_regclass('public.wellness_entries') IS NOT NULL
        "#,
    )
    .fetch_one(&state.db)
    .await;

    let (database, tables) = match schema {
        Ok(present) => ("ok", if present { "ok" } else { "missing" }),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            ("failed", "unknown")
        }
    };

    let status = if database == "ok" && tables == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "checks": { "database": database, "tables": tables },
        })),
    )
}
