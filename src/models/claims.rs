use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: UserData,
    pub exp: usize,
}

/// The authenticated identity carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserData {
    pub id: i64,
    pub username: String,
}
