//! Link placeholders.
//!
//! A [`Field`](crate::node::Field) that stands for data stored elsewhere converts to a [`DataArray`] carrying [`ArrayValues::Link`], and back.
//! Links are copied as opaque target paths, they are never followed.

use crate::{
    attributes::TARGET,
    dataset::{ArrayValues, DataArray},
    node::{FieldValue, Link},
};

/// Convert the value of a field to the values of an array.
#[must_use]
pub fn to_array_values(value: &FieldValue) -> ArrayValues {
    match value {
        FieldValue::Array(array) => ArrayValues::Inline(array.clone()),
        FieldValue::Link(link) => ArrayValues::Link(link.clone()),
    }
}

/// Returns the link `array` is written as, if any.
///
/// The link held by the array wins.
/// Otherwise a string `target` attribute makes an inline array a link.
#[must_use]
pub fn array_link(array: &DataArray) -> Option<Link> {
    match array.values() {
        ArrayValues::Link(link) => Some(link.clone()),
        ArrayValues::Inline(values) => array
            .attributes()
            .get(TARGET)
            .and_then(serde_json::Value::as_str)
            .map(|target| Link::new(target).with_shape(Some(values.shape().to_vec()))),
    }
}

/// Convert the values of an array to the value of a field.
#[must_use]
pub fn to_field_value(array: &DataArray) -> FieldValue {
    if let Some(link) = array_link(array) {
        return FieldValue::Link(link);
    }
    match array.values() {
        ArrayValues::Inline(values) => FieldValue::Array(values.clone()),
        ArrayValues::Link(link) => FieldValue::Link(link.clone()),
    }
}
