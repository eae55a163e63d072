use actix_web::web;

use crate::{handlers::snippet_handler, middleware::jwt_middleware::VerifyJWT};

pub fn config(config: &mut web::ServiceConfig, jwt_middleware: VerifyJWT) {
    config
        .service(
            web::resource(["/snippets/", "/snippets", "/snippets.json"])
                .route(web::get().to(snippet_handler::list_snippets))
                .route(web::post().to(snippet_handler::create_snippet))
                .wrap(jwt_middleware.clone()),
        )
        .service(
            web::resource([
                r"/snippets/{snippetId:\d+}/",
                r"/snippets/{snippetId:\d+}",
                r"/snippets/{snippetId:\d+}.json",
            ])
            .route(web::get().to(snippet_handler::get_snippet))
            .route(web::put().to(snippet_handler::update_snippet))
            .route(web::patch().to(snippet_handler::partial_update_snippet))
            .route(web::delete().to(snippet_handler::delete_snippet))
            .wrap(jwt_middleware.clone()),
        )
        .service(
            web::resource([
                r"/snippets/{snippetId:\d+}/highlight/",
                r"/snippets/{snippetId:\d+}/highlight",
            ])
            .route(web::get().to(snippet_handler::highlight_snippet))
            .wrap(jwt_middleware),
        );
}
