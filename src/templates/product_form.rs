use std::fmt::Write;

use super::layout::{escape_html, page};
use crate::forms::ProductForm;

pub fn render_product_form(form: &ProductForm) -> String {
    let mut body = String::from("<h1>New product</h1>\n");
    body.push_str(
        r#"<form method="post" action="/create-product/" enctype="multipart/form-data">"#,
    );
    body.push('\n');

    for field in form.fields() {
        let errors = form.field_errors(field.name);

        let _ = write!(
            body,
            r#"<div class="mb-3"><label class="form-label" for="id_{}">{}:</label>"#,
            field.name,
            escape_html(field.label)
        );
        body.push_str(&field.widget.render(field.name, form.value(field.name)));

        if !errors.is_empty() {
            body.push_str(r#"<ul class="errorlist text-danger">"#);
            for error in errors {
                let _ = write!(body, "<li>{}</li>", escape_html(error));
            }
            body.push_str("</ul>");
        }
        body.push_str("</div>\n");
    }

    body.push_str(
        r#"<button type="submit" class="btn btn-primary">Save</button>
<a class="btn btn-link" href="/">Back to products</a>
</form>"#,
    );

    page("New product", &body)
}
