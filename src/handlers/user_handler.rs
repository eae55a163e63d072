use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    error::ApiError,
    serializers::{
        pagination::{PageParams, PageRequest},
        user_serializer::UserRepr,
        Links,
    },
    AppState,
};

pub async fn list_users(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let links = Links::from_request(&req);
    let store = app_data.users();

    let Some(size) = app_data.settings.page_size else {
        let records: Vec<UserRepr> = store
            .list()
            .await?
            .iter()
            .map(|u| UserRepr::new(u, &links))
            .collect();
        return Ok(HttpResponse::Ok().json(records));
    };

    let page = PageRequest::from_params(&params, size)?;
    let (total_records, users) = store.page(page.offset(), page.limit()).await?;
    page.ensure_exists(total_records)?;

    let records = users.iter().map(|u| UserRepr::new(u, &links)).collect();
    Ok(HttpResponse::Ok().json(page.respond(total_records, records, &links.users())))
}

pub async fn get_user(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = app_data.users().get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserRepr::new(&user, &Links::from_request(&req))))
}

/// Entry point listing the top-level collections.
pub async fn api_root(req: HttpRequest) -> HttpResponse {
    let links = Links::from_request(&req);
    HttpResponse::Ok().json(serde_json::json!({
        "users": links.users(),
        "snippets": links.snippets(),
    }))
}
