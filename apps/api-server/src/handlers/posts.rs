//! Post endpoints.

use actix_web::{HttpRequest, HttpResponse, web};
use quill_core::domain::PostWithCategory;
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryRef, PostQuery, PostResponse};

use super::transport::{PostWrite, read_post_write};
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn post_response(view: PostWithCategory) -> PostResponse {
    let PostWithCategory { post, category } = view;
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        category: category.map(|c| CategoryRef {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }),
        featured_image: post.featured_image,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// GET /api/posts?search=&category=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostQuery>,
) -> AppResult<HttpResponse> {
    let PostQuery { search, category } = query.into_inner();
    let posts = state
        .posts
        .list(search.as_deref(), category.as_deref())
        .await?;
    let data: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::list(data)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let PostWrite { fields, image } = read_post_write(&req, payload, state.max_body_bytes).await?;
    let post = state.posts.create(fields, image).await?;

    tracing::info!(post_id = %post.post.id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let PostWrite { fields, image } = read_post_write(&req, payload, state.max_body_bytes).await?;
    let post = state.posts.update(&path, fields, image).await?;

    tracing::info!(post_id = %post.post.id, "Post updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&path).await?;

    tracing::info!(post_id = %path.as_str(), "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        serde_json::json!({}),
        "Post deleted successfully",
    )))
}
