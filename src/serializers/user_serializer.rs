use serde::{Deserialize, Serialize};

use super::Links;
use crate::models::UserWithSnippets;

/// Outbound form of a user: identity plus the ids of their snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRepr {
    pub url: String,
    pub id: i64,
    pub username: String,
    pub snippets: Vec<i64>,
}

impl UserRepr {
    pub fn new(user: &UserWithSnippets, links: &Links) -> Self {
        Self {
            url: links.user(user.id),
            id: user.id,
            username: user.username.clone(),
            snippets: user.snippets.clone(),
        }
    }
}
