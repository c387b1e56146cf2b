use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use rust_decimal::Decimal;

use super::widgets::{Widget, WidgetKind};
use crate::models::NewProduct;

pub const IMAGES_FIELD: &str = "products";

const WIDGET_CLASS: &str = "form-control";
const NAME_MAX_LENGTH: usize = 100;
const PRICE_MAX_DIGITS: u32 = 8;
const PRICE_DECIMAL_PLACES: u32 = 2;

const REQUIRED: &str = "This field is required.";
const NULL_CHARACTERS: &str = "Null characters are not allowed.";

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub widget: Widget,
}

/// Create form for a product and its images.
///
/// Holds the submitted values and per-field errors so an invalid submission
/// can be rendered again as it was entered.
#[derive(Debug, Clone)]
pub struct ProductForm {
    fields: Vec<FormField>,
    data: HashMap<String, String>,
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductForm {
    pub fn new() -> Self {
        Self::bound(HashMap::new())
    }

    pub fn bound(data: HashMap<String, String>) -> Self {
        let mut fields = declared_fields();

        for field in &mut fields {
            field.widget.set_attr("class", WIDGET_CLASS);
        }

        Self {
            fields,
            data,
            errors: BTreeMap::new(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, Vec<String>> {
        &self.errors
    }

    pub fn field_errors(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Cleans every field. On failure the form comes back with its errors attached.
    pub fn validate(mut self) -> Result<NewProduct, ProductForm> {
        let name = self.clean_text("name").and_then(|name| {
            let length = name.chars().count();
            if length > NAME_MAX_LENGTH {
                self.add_error(
                    "name",
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        NAME_MAX_LENGTH, length
                    ),
                );
                None
            } else {
                Some(name)
            }
        });

        let price = self
            .clean_text("price")
            .and_then(|raw| match clean_price(&raw) {
                Ok(price) => Some(price),
                Err(message) => {
                    self.add_error("price", message);
                    None
                }
            });

        let description = self.clean_text("description");

        match (name, price, description) {
            (Some(name), Some(price), Some(description)) if self.errors.is_empty() => {
                Ok(NewProduct {
                    name,
                    price,
                    description,
                })
            }
            _ => Err(self),
        }
    }

    fn clean_text(&mut self, name: &'static str) -> Option<String> {
        let value = self.value(name).map(str::trim).unwrap_or_default().to_string();

        if value.is_empty() {
            self.add_error(name, REQUIRED.to_string());
            return None;
        }
        if value.contains('\0') {
            self.add_error(name, NULL_CHARACTERS.to_string());
            return None;
        }

        Some(value)
    }

    fn add_error(&mut self, name: &'static str, message: String) {
        self.errors.entry(name).or_default().push(message);
    }
}

fn declared_fields() -> Vec<FormField> {
    vec![
        FormField {
            name: "name",
            label: "Name",
            required: true,
            widget: Widget::new(WidgetKind::TextInput)
                .with_attr("maxlength", &NAME_MAX_LENGTH.to_string())
                .with_attr("required", ""),
        },
        FormField {
            name: "price",
            label: "Price",
            required: true,
            widget: Widget::new(WidgetKind::NumberInput)
                .with_attr("step", "0.01")
                .with_attr("required", ""),
        },
        FormField {
            name: "description",
            label: "Description",
            required: true,
            widget: Widget::new(WidgetKind::Textarea)
                .with_attr("cols", "40")
                .with_attr("rows", "10")
                .with_attr("required", ""),
        },
        FormField {
            name: IMAGES_FIELD,
            label: "Products",
            required: false,
            widget: Widget::new(WidgetKind::FileInput).with_attr("multiple", ""),
        },
    ]
}

fn clean_price(raw: &str) -> Result<Decimal, String> {
    let price = canonical_decimal(raw)
        .and_then(|literal| {
            if literal.contains('e') {
                Decimal::from_scientific(&literal).ok()
            } else {
                Decimal::from_str(&literal).ok()
            }
        })
        .ok_or_else(|| "Enter a number.".to_string())?;

    let (digits, decimals) = digit_counts(&price);
    let whole_digits = digits.saturating_sub(decimals);

    if digits > PRICE_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            PRICE_MAX_DIGITS
        ));
    }
    if decimals > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            PRICE_DECIMAL_PLACES
        ));
    }
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
        ));
    }

    Ok(price)
}

/// Rewrites plain decimal notation (optional sign, digits with at most one
/// point, optional exponent) into a form the `Decimal` parsers accept.
/// Anything else, including digit separators, yields `None`.
fn canonical_decimal(raw: &str) -> Option<String> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (number, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((number, exponent)) => (number, Some(exponent)),
        None => (unsigned, None),
    };
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));

    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return None;
    }

    let mut literal = String::with_capacity(raw.len() + 1);
    if negative {
        literal.push('-');
    }
    literal.push_str(if whole.is_empty() { "0" } else { whole });
    if !fraction.is_empty() {
        literal.push('.');
        literal.push_str(fraction);
    }

    if let Some(exponent) = exponent {
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("", exponent.strip_prefix('+').unwrap_or(exponent)),
        };
        if digits.is_empty() || !digits_only(digits) {
            return None;
        }
        literal.push('e');
        literal.push_str(sign);
        literal.push_str(digits);
    }

    Some(literal)
}

/// `(total digits, decimal places)` as written, so trailing zeros after the point count.
fn digit_counts(value: &Decimal) -> (u32, u32) {
    let scale = value.scale();
    let mantissa = value.mantissa().unsigned_abs();
    let length = if mantissa == 0 { 1 } else { mantissa.ilog10() + 1 };

    if scale > length {
        (scale, scale)
    } else {
        (length, scale)
    }
}
