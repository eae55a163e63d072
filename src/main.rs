use actix_cors::Cors;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use env_logger::Env;

use snippets_api::{config::Settings, middleware::jwt_middleware::VerifyJWT, routes, store, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env().context("loading settings")?;

    let pool = store::connect(&settings)
        .await
        .context("Error building a connection pool")?;
    store::migrate(&pool).await.context("running migrations")?;

    let host = settings.host.clone();
    let port = settings.port;
    log::info!(
        "serving on {host}:{port} (owner mode {:?}, page size {:?})",
        settings.owner_mode,
        settings.page_size
    );

    let app_data = Data::new(AppState::new(pool, settings));
    let jwt_middleware = VerifyJWT::new(app_data.clone());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| routes::configure(cfg, jwt_middleware.clone()))
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
