use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Product, ProductMeta};

/// A product row together with its metadata rows
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub product: Product,
    pub meta: Vec<ProductMeta>,
}

/// Fixed product columns accepted from a request body
#[derive(Debug, Clone)]
pub struct ProductBase {
    pub name: String,
    pub description: String,
    pub thumbnail: String,
}

/// Live products with their metadata, oldest first
pub async fn list(pool: &PgPool) -> Result<Vec<ProductRecord>, DatabaseError> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE deleted_at IS NULL ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let rows = sqlx::query_as::<_, ProductMeta>(
        "SELECT product_id, meta_key, meta_value FROM product_meta
         WHERE product_id = ANY($1)
         ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_product: HashMap<Uuid, Vec<ProductMeta>> = HashMap::new();
    for row in rows {
        by_product.entry(row.product_id).or_default().push(row);
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let meta = by_product.remove(&product.id).unwrap_or_default();
            ProductRecord { product, meta }
        })
        .collect())
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<ProductRecord>, DatabaseError> {
    let Some(product) = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let meta = meta_of(pool, id).await?;
    Ok(Some(ProductRecord { product, meta }))
}

async fn meta_of(pool: &PgPool, product_id: Uuid) -> Result<Vec<ProductMeta>, DatabaseError> {
    Ok(sqlx::query_as::<_, ProductMeta>(
        "SELECT product_id, meta_key, meta_value FROM product_meta
         WHERE product_id = $1
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?)
}

/// Insert a product and its metadata rows in one transaction.
/// `meta` keys must already be normalized.
pub async fn create(
    pool: &PgPool,
    base: ProductBase,
    meta: Vec<(String, String)>,
    created_by: Uuid,
) -> Result<ProductRecord, DatabaseError> {
    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, description, thumbnail, created_by, created_at)
         VALUES ($1, $2, $3, $4, $5, now())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&base.name)
    .bind(&base.description)
    .bind(&base.thumbnail)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await?;

    let mut rows = Vec::with_capacity(meta.len());
    for (key, value) in meta {
        let row = sqlx::query_as::<_, ProductMeta>(
            "INSERT INTO product_meta (product_id, meta_key, meta_value)
             VALUES ($1, $2, $3)
             ON CONFLICT (product_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
             RETURNING product_id, meta_key, meta_value",
        )
        .bind(product.id)
        .bind(key)
        .bind(value)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok(ProductRecord { product, meta: rows })
}

/// Update the base columns and upsert each metadata key in one transaction.
/// Keys not present in `meta` keep their stored values. Returns `None` when
/// the product is absent or soft-deleted.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    base: ProductBase,
    meta: Vec<(String, String)>,
    updated_by: Uuid,
) -> Result<Option<ProductRecord>, DatabaseError> {
    let mut tx = pool.begin().await?;

    let Some(product) = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $2, description = $3, thumbnail = $4,
             updated_at = now(), updated_by = $5
         WHERE id = $1 AND deleted_at IS NULL
         RETURNING *",
    )
    .bind(id)
    .bind(&base.name)
    .bind(&base.description)
    .bind(&base.thumbnail)
    .bind(updated_by)
    .fetch_optional(&mut *tx)
    .await?
    else {
        tx.rollback().await?;
        return Ok(None);
    };

    for (key, value) in meta {
        sqlx::query(
            "INSERT INTO product_meta (product_id, meta_key, meta_value)
             VALUES ($1, $2, $3)
             ON CONFLICT (product_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value",
        )
        .bind(id)
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }

    let rows = sqlx::query_as::<_, ProductMeta>(
        "SELECT product_id, meta_key, meta_value FROM product_meta
         WHERE product_id = $1
         ORDER BY id",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(ProductRecord { product, meta: rows }))
}

/// Hide a live product and record who did it. False when absent or already deleted.
pub async fn soft_delete(pool: &PgPool, id: Uuid, deleted_by: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "UPDATE products SET deleted_at = now(), deleted_by = $2
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(deleted_by)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove one metadata key from a live product. False when the product is
/// gone or the key was never set.
pub async fn delete_meta_key(pool: &PgPool, id: Uuid, key: &str) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "DELETE FROM product_meta m
         USING products p
         WHERE m.product_id = p.id
           AND p.id = $1
           AND p.deleted_at IS NULL
           AND m.meta_key = $2",
    )
    .bind(id)
    .bind(key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
