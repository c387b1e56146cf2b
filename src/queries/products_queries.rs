use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductImage, ProductListing},
};

pub async fn count_products(pool: &PgPool, search: Option<&str>) -> Result<i64> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
    push_name_filter(&mut query, search);

    let count = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(count)
}

/// One page of products in insertion order, each with its images.
pub async fn find_products_page(
    pool: &PgPool,
    search: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<ProductListing>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT id, name, price, description FROM products WHERE 1=1");
    push_name_filter(&mut query, search);

    query.push(" ORDER BY id ASC LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();

    let all_images = sqlx::query_as::<_, ProductImage>(
        "SELECT id, image, product_id
         FROM product_images
         WHERE product_id = ANY($1)
         ORDER BY product_id, id ASC",
    )
    .bind(&product_ids)
    .fetch_all(pool)
    .await?;

    let mut images_map: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in all_images {
        images_map.entry(image.product_id).or_default().push(image);
    }

    let result = products
        .into_iter()
        .map(|product| {
            let images = images_map.remove(&product.id).unwrap_or_default();
            ProductListing { product, images }
        })
        .collect();

    Ok(result)
}

/// Inserts the product and one image row per stored file in a single transaction.
pub async fn create_product(
    pool: &PgPool,
    new_product: &NewProduct,
    image_paths: &[String],
) -> Result<(Product, Vec<ProductImage>)> {
    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, price, description)
        VALUES ($1, $2, $3)
        RETURNING id, name, price, description
        "#,
    )
    .bind(&new_product.name)
    .bind(new_product.price)
    .bind(&new_product.description)
    .fetch_one(&mut *tx)
    .await?;

    let mut images = Vec::with_capacity(image_paths.len());
    for image_path in image_paths {
        let image = sqlx::query_as::<_, ProductImage>(
            r#"
            INSERT INTO product_images (image, product_id)
            VALUES ($1, $2)
            RETURNING id, image, product_id
            "#,
        )
        .bind(image_path)
        .bind(product.id)
        .fetch_one(&mut *tx)
        .await?;

        images.push(image);
    }

    tx.commit().await?;

    Ok((product, images))
}

/// Deletes a product. Its images are removed by the foreign key cascade.
pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn push_name_filter(query: &mut QueryBuilder<Postgres>, search: Option<&str>) {
    if let Some(term) = search.filter(|term| !term.is_empty()) {
        query.push(" AND name ILIKE ");
        query.push_bind(format!("%{}%", escape_like(term)));
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
