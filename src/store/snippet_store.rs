use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    error::ApiError,
    models::{Snippet, SnippetFields, UserData},
    policy::{Caller, OwnershipPolicy},
    validation::validate_snippet,
};

const SELECT_SNIPPETS: &str = r#"
    SELECT
        s.id,
        s.created,
        s.title,
        s.code,
        s.linenos,
        s.language,
        s.style,
        s.owner_id,
        u.username AS owner_username
    FROM snippets s
    LEFT JOIN users u
      ON u.id = s.owner_id
"#;

#[derive(Clone)]
pub struct SnippetStore {
    db: SqlitePool,
}

impl SnippetStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        fields: SnippetFields,
        owner: Option<&UserData>,
    ) -> Result<Snippet, ApiError> {
        validate_snippet(&fields).map_err(ApiError::Validation)?;

        let created = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO snippets (created, title, code, linenos, language, style, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(created)
        .bind(&fields.title)
        .bind(&fields.code)
        .bind(fields.linenos)
        .bind(&fields.language)
        .bind(&fields.style)
        .bind(owner.map(|u| u.id))
        .execute(&self.db)
        .await?
        .last_insert_rowid();

        log::debug!("created snippet {id} for {:?}", owner.map(|u| &u.username));

        Ok(Snippet {
            id,
            created,
            title: fields.title,
            code: fields.code,
            linenos: fields.linenos,
            language: fields.language,
            style: fields.style,
            owner_id: owner.map(|u| u.id),
            owner_username: owner.map(|u| u.username.clone()),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Snippet, ApiError> {
        find(&self.db, id).await
    }

    /// All snippets, oldest first.
    pub async fn list(&self) -> Result<Vec<Snippet>, ApiError> {
        let snippets = sqlx::query_as::<_, Snippet>(&format!("{SELECT_SNIPPETS} ORDER BY s.id"))
            .fetch_all(&self.db)
            .await?;
        Ok(snippets)
    }

    /// One window of the creation-ordered list, plus the total count.
    pub async fn page(&self, offset: i64, limit: i64) -> Result<(i64, Vec<Snippet>), ApiError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM snippets")
            .fetch_one(&self.db)
            .await?;
        let records = sqlx::query_as::<_, Snippet>(&format!(
            "{SELECT_SNIPPETS} ORDER BY s.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok((total, records))
    }

    /// Replaces the writable fields of snippet `id` on behalf of `caller`.
    ///
    /// Runs in one transaction: the caller is checked, the row is loaded and
    /// authorized, and only then does `build` turn it into the new fields.
    /// Nothing is written unless every step succeeds.
    pub async fn update<F>(
        &self,
        id: i64,
        caller: &Caller,
        policy: &OwnershipPolicy,
        build: F,
    ) -> Result<Snippet, ApiError>
    where
        F: FnOnce(&Snippet) -> Result<SnippetFields, ApiError>,
    {
        policy.check_mutation(caller)?;
        let mut tx = self.db.begin().await?;
        let current = find(&mut *tx, id).await?;
        policy.authorize_write(caller, &current)?;

        let fields = build(&current)?;
        validate_snippet(&fields).map_err(ApiError::Validation)?;

        sqlx::query(
            r#"
            UPDATE snippets
            SET
                title    = $1,
                code     = $2,
                linenos  = $3,
                language = $4,
                style    = $5
            WHERE id = $6
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.code)
        .bind(fields.linenos)
        .bind(&fields.language)
        .bind(&fields.style)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        log::debug!("updated snippet {id}");

        Ok(Snippet {
            title: fields.title,
            code: fields.code,
            linenos: fields.linenos,
            language: fields.language,
            style: fields.style,
            ..current
        })
    }

    pub async fn delete(
        &self,
        id: i64,
        caller: &Caller,
        policy: &OwnershipPolicy,
    ) -> Result<(), ApiError> {
        policy.check_mutation(caller)?;
        let mut tx = self.db.begin().await?;
        let current = find(&mut *tx, id).await?;
        policy.authorize_write(caller, &current)?;

        sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        log::debug!("deleted snippet {id}");
        Ok(())
    }
}

async fn find<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Snippet, ApiError> {
    sqlx::query_as::<_, Snippet>(&format!("{SELECT_SNIPPETS} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(ApiError::NotFound)
}
