// handlers/protected/products.rs - /api/products CRUD
//
// Every route here sits behind the bearer gate and the RBAC gate for the
// `products` resource. Update and delete additionally demand an editor tier.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{Map, Value};

use crate::api::format::{fold_product, fold_products, normalize_meta_key, split_product_body};
use crate::auth::rbac::{meets_tier, ROLE_EDITOR};
use crate::database::products;
use crate::error::ApiError;
use crate::handlers::{db_failure, parse_id};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::PRODUCT_WRITE;

fn require_editor(user: &AuthUser) -> Result<(), ApiError> {
    if !meets_tier(user.role, ROLE_EDITOR) {
        return Err(ApiError::forbidden("Forbidden [role]"));
    }
    Ok(())
}

/// GET /api/products - live products, each flattened with its metadata
///
/// Expected Output:
/// ```json
/// [
///   {
///     "id": "uuid", "name": "Lamp", "description": "Desk lamp",
///     "thumbnail": "lamp.png", "created_by": "uuid", "created_at": "...",
///     "price": "12", "stock": "4", "custom_color": "red"
///   }
/// ]
/// ```
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let records = products::list(state.pool())
        .await
        .map_err(db_failure("Failed to fetch products"))?;
    Ok(ApiResponse::success(fold_products(&records)))
}

/// GET /api/products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let record = products::get(state.pool(), id)
        .await
        .map_err(db_failure("Failed to fetch products"))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(ApiResponse::success(fold_product(&record)))
}

/// POST /api/products
///
/// Expected Input:
/// ```json
/// {
///   "name": "Lamp",            // Required
///   "description": "Desk lamp", // Required
///   "thumbnail": "lamp.png",    // Required
///   "price": 12,                // Required, stored as metadata
///   "stock": 4,                 // Required, stored as metadata
///   "custom color": "red"       // Any other key becomes metadata (`custom_color`)
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    PRODUCT_WRITE.check(&body)?;

    let (base, meta) = split_product_body(&body);
    let record = products::create(state.pool(), base, meta, user.user_id)
        .await
        .map_err(db_failure("Failed to create product"))?;

    tracing::info!(product_id = %record.product.id, user_id = %user.user_id, "Product created");
    Ok(ApiResponse::created(fold_product(&record)))
}

/// PUT /api/products/:id - base columns replaced, metadata keys upserted
///
/// Keys absent from the body keep their stored metadata values.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    require_editor(&user)?;
    PRODUCT_WRITE.check(&body)?;
    let id = parse_id(&id)?;

    let (base, meta) = split_product_body(&body);
    let record = products::update(state.pool(), id, base, meta, user.user_id)
        .await
        .map_err(db_failure("Failed to update product"))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    tracing::info!(product_id = %id, user_id = %user.user_id, "Product updated");
    Ok(ApiResponse::success(fold_product(&record)))
}

/// DELETE /api/products/:id - soft delete, recording the caller
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    require_editor(&user)?;
    let id = parse_id(&id)?;

    let deleted = products::soft_delete(state.pool(), id, user.user_id)
        .await
        .map_err(db_failure("Failed to delete product"))?;
    if !deleted {
        return Err(ApiError::not_found("Product not found"));
    }

    tracing::info!(product_id = %id, user_id = %user.user_id, "Product deleted");
    Ok(ApiResponse::message("Product deleted"))
}

/// DELETE /api/products/:id/:key - drop one metadata key
pub async fn delete_meta(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, key)): Path<(String, String)>,
) -> ApiResult<Value> {
    require_editor(&user)?;
    let id = parse_id(&id)?;
    let key = normalize_meta_key(&key);

    let removed = products::delete_meta_key(state.pool(), id, &key)
        .await
        .map_err(db_failure("Failed to delete product meta"))?;
    if !removed {
        return Err(ApiError::not_found("Product meta not found"));
    }
    Ok(ApiResponse::message("Product meta deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: i32) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn editor_tier_required_for_mutations() {
        assert!(require_editor(&user(1)).is_err());
        assert!(require_editor(&user(2)).is_ok());
        assert!(require_editor(&user(3)).is_ok());
    }
}
