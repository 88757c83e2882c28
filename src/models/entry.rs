use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One wellness entry; at most one per `(user_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WellnessEntry {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub mood: Option<i32>,
    pub sleep: Option<f64>,
    pub stress: Option<i32>,
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "deserialize_activities")]
    pub activities: Vec<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Columns selected for every entry read. `sleep` is stored as NUMERIC and
/// read back as float; absent activities read as an empty array.
pub const ENTRY_COLUMNS: &str = "id, user_id, date, mood, sleep::float8 AS sleep, stress, journal, \
     COALESCE(activities, '{}') AS activities, created_at, updated_at";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawActivities {
    List(Vec<String>),
    Encoded(String),
}

/// Accepts `null`, a JSON array, or a string holding a JSON array. Older rows
/// served by the previous backend carried the string form.
pub fn deserialize_activities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawActivities>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(RawActivities::List(list)) => Ok(list),
        Some(RawActivities::Encoded(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(RawActivities::Encoded(s)) => {
            serde_json::from_str(&s).map_err(serde::de::Error::custom)
        }
    }
}
