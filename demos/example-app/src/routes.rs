use crate::models::{ClientHeaders, CreateUserRequest, Pagination, User, UserList};
use crate::services::UserService;
use axum::http::{Method, StatusCode};
use axum::{Extension, Json, Router};
use serde_json::json;
use spectree::spectree_axum::{ApiRouter, AxumAdapter};
use spectree::{DeclarationError, Reply, ResponseSpec, RouteDoc, SpecTree, ValidatedRequest};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

fn service(req: &ValidatedRequest) -> Result<UserService, Reply> {
    req.extension::<UserService>()
        .cloned()
        .ok_or_else(|| Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "UserService missing"))
}

fn bad_request(err: serde_json::Error) -> Reply {
    Reply::error(StatusCode::BAD_REQUEST, err.to_string())
}

fn user_id(req: &ValidatedRequest) -> Result<u64, Reply> {
    req.path_param("id")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| Reply::error(StatusCode::NOT_FOUND, "User not found"))
}

async fn list_users(req: ValidatedRequest) -> Result<Reply, Reply> {
    let service = service(&req)?;
    let page: Pagination = req.query().map_err(bad_request)?;
    let headers: ClientHeaders = req.headers().map_err(bad_request)?;
    if let Some(client) = headers.x_client_id {
        tracing::info!(client = %client, "listing users");
    }

    let offset = page.offset.unwrap_or(0) as usize;
    let (users, total) = service.list(page.limit as usize, offset).await;
    Ok(Reply::json(StatusCode::OK, &UserList { users, total }))
}

async fn create_user(req: ValidatedRequest) -> Result<Reply, Reply> {
    let service = service(&req)?;
    let body: CreateUserRequest = req.json().map_err(bad_request)?;
    let user = service.create(body).await;
    Ok(Reply::json(StatusCode::CREATED, &user))
}

async fn get_user(req: ValidatedRequest) -> Result<Reply, Reply> {
    let service = service(&req)?;
    let id = user_id(&req)?;
    match service.get(id).await {
        Some(user) => Ok(Reply::json(StatusCode::OK, &user)),
        None => Err(Reply::error(StatusCode::NOT_FOUND, "User not found")),
    }
}

async fn delete_user(req: ValidatedRequest) -> Result<Reply, Reply> {
    let service = service(&req)?;
    let id = user_id(&req)?;
    if service.delete(id).await {
        Ok(Reply::empty(StatusCode::NO_CONTENT))
    } else {
        Err(Reply::error(StatusCode::NOT_FOUND, "User not found"))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "UP" }))
}

/// Decorate the user routes and build the application router, document
/// routes included.
pub fn build_app(
    tree: &Arc<SpecTree<AxumAdapter>>,
    service: UserService,
) -> Result<Router, DeclarationError> {
    let list = tree.validate(
        RouteDoc::new()
            .query::<Pagination>()
            .headers::<ClientHeaders>()
            .response(ResponseSpec::new().model::<UserList>(StatusCode::OK))
            .tags(["users"])
            .comment("List users\n\nReturns at most `limit` users, starting at `offset`."),
        list_users,
    )?;

    let create = tree.validate(
        RouteDoc::new()
            .json::<CreateUserRequest>()
            .response(ResponseSpec::new().model::<User>(StatusCode::CREATED))
            .tags(["users"])
            .comment("Create a user"),
        create_user,
    )?;

    let get = tree.validate(
        RouteDoc::new()
            .response(
                ResponseSpec::new()
                    .model::<User>(StatusCode::OK)
                    .empty(StatusCode::NOT_FOUND),
            )
            .tags(["users"])
            .comment("Fetch one user"),
        get_user,
    )?;

    let delete = tree.doc(
        RouteDoc::new()
            .response(
                ResponseSpec::new()
                    .empty(StatusCode::NO_CONTENT)
                    .empty(StatusCode::NOT_FOUND),
            )
            .tags(["users", "admin"]),
        delete_user,
    )?;

    let router = ApiRouter::new(tree)
        .endpoint(Method::GET, "/users", list)
        .endpoint(Method::POST, "/users", create)
        .endpoint(Method::GET, "/users/{id}", get)
        .endpoint(Method::DELETE, "/users/{id}", delete)
        .handler(Method::GET, "/health", health)
        .into_router()
        .layer(Extension(service));

    Ok(tree.register(router).layer(TraceLayer::new_for_http()))
}
