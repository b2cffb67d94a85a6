use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One issued certificate. `learning_id` and `creation_date` are immutable
/// after insert; only the candidate and course names may be corrected.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: i32,
    pub candidate_name: String,
    pub course_name: String,
    pub learning_id: String,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
