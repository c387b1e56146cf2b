use std::fmt::Write;

use super::layout::{escape_html, page};
use crate::{models::ProductListing, pagination::Page, storage::MediaStorage};

pub fn render_product_list(
    page_obj: &Page<ProductListing>,
    search: Option<&str>,
    storage: &MediaStorage,
) -> String {
    let mut body = String::from("<h1>Products</h1>\n");

    let _ = write!(
        body,
        r#"<form method="get" action="/" class="d-flex gap-2 mb-4">
<input type="search" name="obj" class="form-control" placeholder="Search products" value="{}">
<button type="submit" class="btn btn-outline-primary">Search</button>
<a class="btn btn-primary text-nowrap" href="/create-product/">New product</a>
</form>
"#,
        escape_html(search.unwrap_or_default())
    );

    if page_obj.items.is_empty() {
        body.push_str("<p>No products found.</p>\n");
    } else {
        let _ = writeln!(
            body,
            r#"<p class="text-muted">{} product{}</p>"#,
            page_obj.count,
            if page_obj.count == 1 { "" } else { "s" }
        );
    }

    for listing in &page_obj.items {
        let product = &listing.product;
        let _ = write!(
            body,
            r#"<article class="card mb-3"><div class="card-body">
<h2 class="h5 card-title">{}</h2>
<p class="fw-bold">{}</p>
<p class="card-text">{}</p>
"#,
            escape_html(&product.name),
            product.price,
            escape_html(&product.description)
        );

        for image in &listing.images {
            let _ = write!(
                body,
                r#"<img src="{}" alt="{}" class="img-thumbnail me-2" width="150">"#,
                escape_html(&storage.url(&image.image)),
                escape_html(&product.name)
            );
        }
        body.push_str("</div></article>\n");
    }

    body.push_str(&pagination_nav(page_obj, search));

    page("Products", &body)
}

fn pagination_nav(page_obj: &Page<ProductListing>, search: Option<&str>) -> String {
    let mut nav = String::from(r#"<nav class="pagination gap-2 align-items-center">"#);

    if let Some(previous) = page_obj.previous_page_number() {
        let _ = write!(
            nav,
            r#"<a href="{}">&laquo; first</a><a href="{}">previous</a>"#,
            page_link(1, search),
            page_link(previous, search)
        );
    }

    let _ = write!(
        nav,
        r#"<span class="current">Page {} of {}.</span>"#,
        page_obj.number, page_obj.num_pages
    );

    if let Some(next) = page_obj.next_page_number() {
        let _ = write!(
            nav,
            r#"<a href="{}">next</a><a href="{}">last &raquo;</a>"#,
            page_link(next, search),
            page_link(page_obj.num_pages, search)
        );
    }

    nav.push_str("</nav>\n");
    nav
}

fn page_link(number: i64, search: Option<&str>) -> String {
    let number = number.to_string();
    let mut params = vec![("page", number.as_str())];
    if let Some(term) = search {
        params.push(("obj", term));
    }

    let query = serde_urlencoded::to_string(&params).unwrap_or_default();
    escape_html(&format!("?{}", query))
}
