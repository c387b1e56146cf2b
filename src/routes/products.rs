use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use http::{StatusCode, header};

use crate::{
    AppState,
    error::Result,
    forms::{FormSubmission, IMAGES_FIELD, ProductForm},
    models::ProductListQuery,
    pagination::{PRODUCTS_PER_PAGE, Paginator},
    queries::products_queries,
    storage::IMAGE_NAMESPACE,
    templates,
};

pub async fn product_list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>> {
    let params = ProductListQuery::from_pairs(pairs);
    let search = params.search_term();
    if let Some(term) = search {
        tracing::debug!("Searching products for {:?}", term);
    }

    let count = products_queries::count_products(&state.db, search).await?;
    let paginator = Paginator::new(count, PRODUCTS_PER_PAGE);
    let number = paginator.resolve(params.page.as_deref());
    let (offset, limit) = paginator.bounds(number);

    let products = products_queries::find_products_page(&state.db, search, offset, limit).await?;
    let page_obj = paginator.page(number, products);

    Ok(Html(templates::render_product_list(
        &page_obj,
        search,
        &state.storage,
    )))
}

pub async fn product_form() -> Html<String> {
    Html(templates::render_product_form(&ProductForm::new()))
}

pub async fn create_product(
    State(state): State<AppState>,
    submission: FormSubmission,
) -> Result<Response> {
    let new_product = match ProductForm::bound(submission.fields.clone()).validate() {
        Ok(new_product) => new_product,
        Err(form) => {
            return Ok(Html(templates::render_product_form(&form)).into_response());
        }
    };

    let mut stored = Vec::new();
    for upload in submission.files_for(IMAGES_FIELD) {
        match state
            .storage
            .save(IMAGE_NAMESPACE, &upload.file_name, &upload.bytes)
            .await
        {
            Ok(path) => stored.push(path),
            Err(e) => {
                state.storage.discard(&stored).await;
                return Err(e);
            }
        }
    }

    let (product, images) =
        match products_queries::create_product(&state.db, &new_product, &stored).await {
            Ok(created) => created,
            Err(e) => {
                state.storage.discard(&stored).await;
                return Err(e);
            }
        };

    tracing::info!(
        "Created product {} ({}) with {} images",
        product.id,
        product.name,
        images.len()
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response())
}
