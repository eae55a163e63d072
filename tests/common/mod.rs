#![allow(dead_code)]

use actix_web::web::Data;
use snippets_api::{
    config::Settings,
    models::UserData,
    policy::OwnerMode,
    store,
    utils::{hash_password, issue_access_token},
    AppState,
};

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "Secret123";

pub fn settings(owner_mode: OwnerMode, page_size: Option<u32>) -> Settings {
    Settings {
        database_url: "sqlite::memory:".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: SECRET.into(),
        access_token_ttl_minutes: 5,
        bcrypt_cost: 4,
        page_size,
        owner_mode,
    }
}

pub async fn state_with(owner_mode: OwnerMode, page_size: Option<u32>) -> Data<AppState> {
    let settings = settings(owner_mode, page_size);
    let pool = store::connect(&settings).await.expect("pool");
    store::migrate(&pool).await.expect("migrations");
    Data::new(AppState::new(pool, settings))
}

pub async fn state() -> Data<AppState> {
    state_with(OwnerMode::Required, None).await
}

/// Registers `username` directly in the store and returns a bearer header value.
pub async fn user(state: &AppState, username: &str) -> (UserData, String) {
    let hash = hash_password(PASSWORD, 4).expect("hash");
    let user = state.users().create(username, &hash).await.expect("user");
    let user = UserData {
        id: user.id,
        username: user.username,
    };
    let token = issue_access_token(&user, SECRET, 5).expect("token");
    (user, format!("Bearer {token}"))
}

/// Drops markup, leaving the text content of an HTML document.
pub fn text_of(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[macro_export]
macro_rules! app {
    ($state:expr) => {
        {
            let jwt_middleware =
                snippets_api::middleware::jwt_middleware::VerifyJWT::new($state.clone());
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data($state.clone())
                    .configure(|cfg| snippets_api::routes::configure(cfg, jwt_middleware)),
            )
            .await
        }
    };
}
