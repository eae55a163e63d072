use actix_web::web;

use crate::handlers::auth_handler;

pub fn config(config: &mut web::ServiceConfig) {
    config.service(
        web::scope("/api-auth")
            .service(web::resource(["/register/", "/register"]).route(web::post().to(auth_handler::register)))
            .service(web::resource(["/login/", "/login"]).route(web::post().to(auth_handler::login))),
    );
}
