pub mod auth_routes;
pub mod snippet_routes;
pub mod user_routes;

use actix_web::web;

use crate::middleware::jwt_middleware::VerifyJWT;

/// Mounts every endpoint. Snippet and user resources run behind
/// `jwt_middleware`; the `/api-auth` endpoints never look at bearer tokens.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_middleware: VerifyJWT) {
    cfg.configure(auth_routes::config)
        .configure(|cfg| user_routes::config(cfg, jwt_middleware.clone()))
        .configure(|cfg| snippet_routes::config(cfg, jwt_middleware));
}
