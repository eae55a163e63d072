use actix_web::web;

use crate::{handlers::user_handler, middleware::jwt_middleware::VerifyJWT};

pub fn config(config: &mut web::ServiceConfig, jwt_middleware: VerifyJWT) {
    config
        .service(web::resource("/").route(web::get().to(user_handler::api_root)))
        .service(
            web::resource(["/users/", "/users", "/users.json"])
                .route(web::get().to(user_handler::list_users))
                .wrap(jwt_middleware.clone()),
        )
        .service(
            web::resource([
                r"/users/{userId:\d+}/",
                r"/users/{userId:\d+}",
                r"/users/{userId:\d+}.json",
            ])
            .route(web::get().to(user_handler::get_user))
            .wrap(jwt_middleware),
        );
}
