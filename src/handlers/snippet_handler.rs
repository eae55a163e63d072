use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    error::ApiError,
    policy::Caller,
    serializers::{
        pagination::{PageParams, PageRequest},
        parse_body,
        snippet_serializer::{self, SnippetRepr},
        Links,
    },
    AppState,
};

// _______________________________________ Collection _______________________________________

pub async fn list_snippets(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let links = Links::from_request(&req);
    let store = app_data.snippets();

    let Some(size) = app_data.settings.page_size else {
        let records: Vec<SnippetRepr> = store
            .list()
            .await?
            .iter()
            .map(|s| SnippetRepr::new(s, &links))
            .collect();
        return Ok(HttpResponse::Ok().json(records));
    };

    let page = PageRequest::from_params(&params, size)?;
    let (total_records, snippets) = store.page(page.offset(), page.limit()).await?;
    page.ensure_exists(total_records)?;

    let records = snippets.iter().map(|s| SnippetRepr::new(s, &links)).collect();
    Ok(HttpResponse::Ok().json(page.respond(total_records, records, &links.snippets())))
}

pub async fn create_snippet(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    caller: Caller,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let owner = app_data.policy().owner_for_create(&caller)?;
    let data = parse_body(&req, &body)?;
    let fields = snippet_serializer::deserialize(&data, None, false)?;

    let snippet = app_data.snippets().create(fields, owner).await?;
    Ok(HttpResponse::Created().json(SnippetRepr::new(&snippet, &Links::from_request(&req))))
}

// _______________________________________ Instance _______________________________________

pub async fn get_snippet(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let snippet = app_data.snippets().get(path.into_inner()).await?;
    app_data.policy().authorize_read(&caller, &snippet)?;
    Ok(HttpResponse::Ok().json(SnippetRepr::new(&snippet, &Links::from_request(&req))))
}

pub async fn update_snippet(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    write_snippet(req, app_data, caller, path.into_inner(), body, false).await
}

pub async fn partial_update_snippet(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    write_snippet(req, app_data, caller, path.into_inner(), body, true).await
}

/// Authentication, then existence, then ownership, then field validation.
async fn write_snippet(
    req: HttpRequest,
    app_data: web::Data<AppState>,
    caller: Caller,
    snippet_id: i64,
    body: web::Bytes,
    partial: bool,
) -> Result<HttpResponse, ApiError> {
    let snippet = app_data
        .snippets()
        .update(snippet_id, &caller, &app_data.policy(), |current| {
            let data = parse_body(&req, &body)?;
            snippet_serializer::deserialize(&data, Some(&current.fields()), partial)
        })
        .await?;
    Ok(HttpResponse::Ok().json(SnippetRepr::new(&snippet, &Links::from_request(&req))))
}

pub async fn delete_snippet(
    app_data: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let snippet_id = path.into_inner();
    app_data
        .snippets()
        .delete(snippet_id, &caller, &app_data.policy())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn highlight_snippet(
    app_data: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let snippet = app_data.snippets().get(path.into_inner()).await?;
    app_data.policy().authorize_read(&caller, &snippet)?;
    let html = app_data.highlighter.render(&snippet)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
