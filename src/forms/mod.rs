mod product_form;
mod submission;
mod widgets;

pub use product_form::{FormField, ProductForm, IMAGES_FIELD};
pub use submission::{FormSubmission, UploadedFile};
pub use widgets::{Widget, WidgetKind};
