#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use snippets_api::{policy::OwnerMode, utils::issue_access_token};

use common::{state, state_with, user, PASSWORD, SECRET};

macro_rules! post_snippet {
    ($app:expr, $auth:expr, $code:expr) => {{
        let req = test::TestRequest::post()
            .uri("/snippets/")
            .insert_header(("Authorization", $auth.to_string()))
            .set_json(json!({ "code": $code }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&$app, req).await;
        created["id"].as_i64().unwrap()
    }};
}

#[actix_web::test]
async fn users_list_their_snippet_ids() {
    let state = state().await;
    let (u, u_auth) = user(&state, "u").await;
    let (v, _) = user(&state, "v").await;
    let app = app!(state);

    let first = post_snippet!(app, &u_auth, "a");
    let second = post_snippet!(app, &u_auth, "b");

    let req = test::TestRequest::get().uri("/users/").to_request();
    let users: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "u");
    assert_eq!(users[0]["snippets"], json!([first, second]));
    assert_eq!(users[1]["username"], "v");
    assert_eq!(users[1]["snippets"], json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}/", u.id))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["id"], u.id);
    assert_eq!(detail["snippets"], json!([first, second]));
    assert!(detail["url"].as_str().unwrap().ends_with(&format!("/users/{}/", u.id)));
    assert!(detail.get("password_hash").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}.json", v.id))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["username"], "v");
}

#[actix_web::test]
async fn deleted_snippets_leave_the_owner_list() {
    let state = state().await;
    let (u, auth) = user(&state, "u").await;
    let app = app!(state);

    let kept = post_snippet!(app, &auth, "kept");
    let gone = post_snippet!(app, &auth, "gone");

    let req = test::TestRequest::delete()
        .uri(&format!("/snippets/{gone}/"))
        .insert_header(("Authorization", auth))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}/", u.id))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["snippets"], json!([kept]));
}

#[actix_web::test]
async fn unknown_user_is_not_found() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/users/7/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"detail": "Not found."}));
}

#[actix_web::test]
async fn users_paginate_when_configured() {
    let state = state_with(OwnerMode::Required, Some(1)).await;
    user(&state, "u").await;
    user(&state, "v").await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/users/?page=2").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"][0]["username"], "v");
    assert_eq!(page["next"], Value::Null);
    assert!(page["previous"].as_str().unwrap().ends_with("/users/"));
}

#[actix_web::test]
async fn api_root_links_collections() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let root: Value = test::call_and_read_body_json(&app, req).await;
    assert!(root["users"].as_str().unwrap().ends_with("/users/"));
    assert!(root["snippets"].as_str().unwrap().ends_with("/snippets/"));
}

#[actix_web::test]
async fn register_then_login_then_create() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .set_json(json!({"username": "alice", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["username"], "alice");
    assert_eq!(registered["snippets"], json!([]));

    let req = test::TestRequest::post()
        .uri("/api-auth/login/")
        .set_json(json!({"username": "alice", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap();

    let id = post_snippet!(app, &format!("Bearer {token}"), "x");
    let req = test::TestRequest::get().uri(&format!("/snippets/{id}/")).to_request();
    let snippet: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snippet["owner"], "alice");
}

#[actix_web::test]
async fn register_rejects_duplicates_and_weak_passwords() {
    let state = state().await;
    user(&state, "taken").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .set_json(json!({"username": "taken", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"username": ["A user with that username already exists."]})
    );

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .set_json(json!({"username": "bob", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"password": ["Password must be at least 8 characters long"]})
    );

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "password": ["This field is required."],
            "username": ["This field is required."],
        })
    );
}

#[actix_web::test]
async fn login_with_wrong_password_fails() {
    let state = state().await;
    user(&state, "u").await;
    let app = app!(state);

    for (username, password) in [("u", "Wrong1234"), ("nobody", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api-auth/login/")
            .set_json(json!({"username": username, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"non_field_errors": ["Unable to log in with provided credentials."]})
        );
    }
}

#[actix_web::test]
async fn stale_bearer_token_does_not_block_login() {
    let state = state().await;
    let (u, _) = user(&state, "u").await;
    let expired = issue_access_token(&u, SECRET, -10).unwrap();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api-auth/login/")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .set_json(json!({"username": "u", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .set_json(json!({"username": "w", "password": PASSWORD}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/users/")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .to_request();
    let Err(err) = test::try_call_service(&app, req).await else {
        panic!("an expired token must not reach the user list");
    };
    assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn register_checks_credential_lengths() {
    let state = state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api-auth/register/")
        .set_json(json!({"username": "u".repeat(151), "password": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "password": ["This field may not be blank."],
            "username": ["Ensure this field has no more than 150 characters."],
        })
    );
}
