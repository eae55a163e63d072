use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::{ApiError, FieldErrors},
    models::{UserData, UserWithSnippets},
    serializers::{expect_object, parse_body, user_serializer::UserRepr, Links},
    utils::{hash_password, issue_access_token, test_password, verify_password},
    validation::{self, not_blank, string_field},
    AppState,
};

#[derive(Debug, Validate)]
struct Credentials {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    username: String,

    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 128, message = "Ensure this field has no more than 128 characters."))]
    password: String,
}

/// Reads `username` and `password`, collecting errors for both.
fn credentials(data: &Value) -> Result<Credentials, ApiError> {
    let map = expect_object(data)?;
    let mut errors = FieldErrors::new();
    let credentials = Credentials {
        username: string_field(map, "username", None, &mut errors).unwrap_or_default(),
        password: string_field(map, "password", None, &mut errors).unwrap_or_default(),
    };
    if let Err(invalid) = credentials.validate() {
        validation::collect(&mut errors, &invalid);
    }
    errors.into_result()?;
    Ok(credentials)
}

pub async fn register(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let Credentials { username, password } = credentials(&parse_body(&req, &body)?)?;

    if let Some(err) = test_password(&password) {
        return Err(ApiError::Validation(FieldErrors::single("password", err)));
    }

    let password_hash = hash_password(&password, app_state.settings.bcrypt_cost)?;
    let user = app_state.users().create(&username, &password_hash).await?;

    let user = UserWithSnippets {
        id: user.id,
        username: user.username,
        snippets: Vec::new(),
    };
    Ok(HttpResponse::Created().json(UserRepr::new(&user, &Links::from_request(&req))))
}

pub async fn login(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let Credentials { username, password } = credentials(&parse_body(&req, &body)?)?;

    let invalid = || {
        ApiError::Validation(FieldErrors::single(
            "non_field_errors",
            "Unable to log in with provided credentials.",
        ))
    };

    let user = app_state
        .users()
        .find_by_username(&username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&password, &user.password_hash)? {
        log::warn!("failed login for {username}");
        return Err(invalid());
    }

    let access_token = issue_access_token(
        &UserData {
            id: user.id,
            username: user.username,
        },
        &app_state.settings.jwt_secret,
        app_state.settings.access_token_ttl_minutes,
    )?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": access_token })))
}
