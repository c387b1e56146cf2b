//! Server-rendered HTML pages.

mod layout;
mod product_form;
mod product_list;

pub use layout::{escape_html, render_error_page};
pub use product_form::render_product_form;
pub use product_list::render_product_list;
