//! A code snippet API: owner-scoped CRUD over snippets, a public user
//! listing, and syntax-highlighted HTML views, served with actix-web on top
//! of SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod highlight;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod serializers;
pub mod store;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;

use sqlx::SqlitePool;

use crate::{
    config::Settings,
    highlight::Highlighter,
    policy::OwnershipPolicy,
    store::{SnippetStore, UserStore},
};

/// Shared handles passed to every handler through `web::Data`.
pub struct AppState {
    pub db: SqlitePool,
    pub settings: Settings,
    pub highlighter: Highlighter,
}

impl AppState {
    pub fn new(db: SqlitePool, settings: Settings) -> Self {
        Self {
            db,
            settings,
            highlighter: Highlighter::new(),
        }
    }

    pub fn snippets(&self) -> SnippetStore {
        SnippetStore::new(self.db.clone())
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.db.clone())
    }

    pub fn policy(&self) -> OwnershipPolicy {
        OwnershipPolicy::new(self.settings.owner_mode)
    }
}
