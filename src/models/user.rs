use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ______________________________________ User ______________________________________
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// A user together with the ids of the snippets they own, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithSnippets {
    pub id: i64,
    pub username: String,
    pub snippets: Vec<i64>,
}
