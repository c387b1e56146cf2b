use std::collections::BTreeMap;
use std::fmt::Write;

use crate::templates::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    TextInput,
    NumberInput,
    Textarea,
    FileInput,
}

/// HTML control for a single form field.
///
/// Attributes with an empty value render as boolean attributes (`multiple`, `required`).
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub attrs: BTreeMap<String, String>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn render(&self, name: &str, value: Option<&str>) -> String {
        let mut html = String::new();
        let attrs = self.render_attrs(name);

        match self.kind {
            WidgetKind::TextInput | WidgetKind::NumberInput => {
                let input_type = if self.kind == WidgetKind::TextInput {
                    "text"
                } else {
                    "number"
                };
                let _ = write!(html, r#"<input type="{}"{}"#, input_type, attrs);
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    let _ = write!(html, r#" value="{}""#, escape_html(value));
                }
                html.push('>');
            }
            WidgetKind::Textarea => {
                let _ = write!(
                    html,
                    "<textarea{}>\n{}</textarea>",
                    attrs,
                    escape_html(value.unwrap_or_default())
                );
            }
            // browsers never accept a prefilled value for file inputs
            WidgetKind::FileInput => {
                let _ = write!(html, r#"<input type="file"{}>"#, attrs);
            }
        }

        html
    }

    fn render_attrs(&self, name: &str) -> String {
        let mut out = format!(r#" name="{}" id="id_{}""#, escape_html(name), escape_html(name));
        for (key, value) in &self.attrs {
            if value.is_empty() {
                let _ = write!(out, " {}", escape_html(key));
            } else {
                let _ = write!(out, r#" {}="{}""#, escape_html(key), escape_html(value));
            }
        }
        out
    }
}
