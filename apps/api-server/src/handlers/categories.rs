//! Category endpoints.

use actix_web::{HttpResponse, web};
use quill_core::domain::Category;
use quill_core::validation::CategoryFields;
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryPayload, CategoryResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    let data: Vec<CategoryResponse> = categories.into_iter().map(category_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::list(data)))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CategoryPayload>,
) -> AppResult<HttpResponse> {
    let fields = CategoryFields {
        name: body.into_inner().name,
    };
    let category = state.categories.create(fields).await?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(category_response(category))))
}
