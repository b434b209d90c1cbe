//! Form-model seam and validation error collection.
//!
//! The widget and validator never own form state; they talk to the host
//! application through [`FormModel`], the smallest surface the rest of the
//! crate needs: a form name for nested input naming, attribute values, and
//! display labels. Validation failures are recorded as data in
//! [`ValidationErrors`]; the caller decides how to surface them.

use std::collections::BTreeMap;

/// A named form whose attributes can be read and labeled.
pub trait FormModel {
    /// Form name used to nest input names (`Form[attribute]`).
    fn form_name(&self) -> &str;

    /// Current submitted value of an attribute, if any.
    fn value(&self, attribute: &str) -> Option<String>;

    /// Human-readable label for an attribute, used in error messages.
    ///
    /// The default turns `crop_data` / `crop-data` into "Crop Data".
    fn label(&self, attribute: &str) -> String {
        humanize(attribute)
    }
}

/// Turn an attribute name into a display label: split on `_`/`-`, capitalize
/// each word.
pub fn humanize(attribute: &str) -> String {
    attribute
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-attribute validation error collection.
///
/// Messages are kept in insertion order per attribute; attributes are sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against an attribute.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        self.errors
            .entry(attribute.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one attribute.
    pub fn attribute(&self, attribute: &str) -> &[String] {
        self.errors
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(attribute, messages)| (attribute.as_str(), messages.as_slice()))
    }
}
