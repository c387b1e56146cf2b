mod health;
mod products;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::product_list))
        .route(
            "/create-product/",
            get(products::product_form).post(products::create_product),
        )
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
