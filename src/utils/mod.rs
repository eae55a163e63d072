mod auth;
pub use auth::{decode_access_token, hash_password, issue_access_token, test_password, verify_password};
