pub mod auth_handler;
pub mod snippet_handler;
pub mod user_handler;
