use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::{ApiError, FieldErrors},
    models::{User, UserWithSnippets},
};

#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts a user; a taken username is a field error on `username`.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, ApiError> {
        let date_joined = Utc::now();
        let res = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, date_joined)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(date_joined)
        .execute(&self.db)
        .await;

        match res {
            Ok(done) => {
                let id = done.last_insert_rowid();
                log::info!("registered user {username} ({id})");
                Ok(User {
                    id,
                    username: username.to_owned(),
                    password_hash: password_hash.to_owned(),
                    date_joined,
                })
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(ApiError::Validation(FieldErrors::single(
                    "username",
                    "A user with that username already exists.",
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<UserWithSnippets, ApiError> {
        let (id, username): (i64, String) =
            sqlx::query_as("SELECT id, username FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?
                .ok_or(ApiError::NotFound)?;

        let snippets: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM snippets WHERE owner_id = $1 ORDER BY id")
                .bind(id)
                .fetch_all(&self.db)
                .await?;

        Ok(UserWithSnippets {
            id,
            username,
            snippets: snippets.into_iter().map(|(id,)| id).collect(),
        })
    }

    /// All users in id order.
    pub async fn list(&self) -> Result<Vec<UserWithSnippets>, ApiError> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, username FROM users ORDER BY id")
            .fetch_all(&self.db)
            .await?;
        self.attach_snippets(rows).await
    }

    pub async fn page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(i64, Vec<UserWithSnippets>), ApiError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, username FROM users ORDER BY id LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.db)
                .await?;
        Ok((total, self.attach_snippets(rows).await?))
    }

    async fn attach_snippets(
        &self,
        rows: Vec<(i64, String)>,
    ) -> Result<Vec<UserWithSnippets>, ApiError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, owner_id FROM snippets WHERE owner_id IN (");
        let mut ids = qb.separated(", ");
        for (id, _) in &rows {
            ids.push_bind(*id);
        }
        qb.push(") ORDER BY id");

        let owned: Vec<(i64, i64)> = qb.build_query_as().fetch_all(&self.db).await?;
        let mut by_owner: HashMap<i64, Vec<i64>> = HashMap::new();
        for (snippet_id, owner_id) in owned {
            by_owner.entry(owner_id).or_default().push(snippet_id);
        }

        Ok(rows
            .into_iter()
            .map(|(id, username)| UserWithSnippets {
                id,
                username,
                snippets: by_owner.remove(&id).unwrap_or_default(),
            })
            .collect())
    }
}
