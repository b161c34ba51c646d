//! Axis inference.
//!
//! A group declares its primary field with `signal` and the dimension names of that field with `axes`.
//! [`AxisInference`] classifies every field of such a group as a data variable or a coordinate and binds its dimension names.
//!
//! A field is classified by the first rule that applies:
//!  1. the field is the signal: a data variable spanning all axes,
//!  2. the field is named in the axes: a coordinate spanning its own name,
//!  3. the group has a valid `<field>_indices` hint `i`: a coordinate spanning `axes[i]`,
//!  4. the field has the shape of the signal: a secondary data variable spanning all axes.
//!
//! Any other field is dropped with a warning.
//! A malformed index hint is reported and the field falls through to the shape rule.

use crate::node::{Field, Group};

/// The role of a classified field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// A data variable.
    DataVariable,
    /// A one-dimensional coordinate.
    Coordinate,
}

/// A classified field and its dimension names.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding<'a> {
    field: &'a Field,
    role: FieldRole,
    dims: Vec<String>,
}

impl<'a> FieldBinding<'a> {
    /// The classified field.
    #[must_use]
    pub const fn field(&self) -> &'a Field {
        self.field
    }

    /// The role of the field.
    #[must_use]
    pub const fn role(&self) -> FieldRole {
        self.role
    }

    /// The dimension names bound to the field.
    #[must_use]
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Consume the binding, returning the dimension names.
    #[must_use]
    pub fn into_dims(self) -> Vec<String> {
        self.dims
    }
}

/// Interpret an `axes` declaration.
///
/// A string is a single axis. An array must hold only strings.
#[must_use]
pub fn parse_axes(value: &serde_json::Value) -> Option<Vec<String>> {
    match value {
        serde_json::Value::String(axis) => Some(vec![axis.clone()]),
        serde_json::Value::Array(axes) => axes
            .iter()
            .map(|axis| axis.as_str().map(ToString::to_string))
            .collect(),
        _ => None,
    }
}

/// Interpret a `<field>_indices` declaration.
///
/// A non-negative integer or a one-element array holding one is an index.
#[must_use]
pub fn parse_index_hint(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(index) => index.as_u64().and_then(|i| usize::try_from(i).ok()),
        serde_json::Value::Array(indices) if indices.len() == 1 => parse_index_hint(&indices[0])
            .filter(|_| indices[0].is_number()),
        _ => None,
    }
}

/// The signal and axes declarations of a group.
#[derive(Debug, Clone)]
pub struct AxisInference<'a> {
    group: &'a Group,
    signal: &'a Field,
    axes: Vec<String>,
}

impl<'a> AxisInference<'a> {
    /// Read the declarations of `group`.
    ///
    /// Returns [`None`] if the group does not declare both a signal and axes, or if the declarations are inconsistent with the fields.
    /// Such a group contributes nothing to a dataset.
    #[must_use]
    pub fn new(group: &'a Group) -> Option<Self> {
        let name = group.name();
        let (Some(signal), Some(axes)) = (group.signal(), group.axes()) else {
            log::debug!("Group {name} does not declare a signal and axes. Ignoring.");
            return None;
        };
        let Some(signal_name) = signal.as_str() else {
            log::warn!("Group {name} has a signal declaration {signal} that is not a field name. Ignoring.");
            return None;
        };
        let Some(axes) = parse_axes(axes) else {
            log::warn!("Group {name} has an axes declaration {axes} that is not a list of names. Ignoring.");
            return None;
        };
        let Some(signal) = group.field(signal_name) else {
            log::warn!("Signal {signal_name} of group {name} is not a field of the group. Ignoring.");
            return None;
        };
        if let Some(shape) = signal.shape() {
            if shape.len() != axes.len() {
                log::warn!(
                    "Group {name} declares {} axes for signal {signal_name} with {} dimensions. Ignoring.",
                    axes.len(),
                    shape.len()
                );
                return None;
            }
        }
        Some(Self {
            group,
            signal,
            axes,
        })
    }

    /// The signal field.
    #[must_use]
    pub const fn signal(&self) -> &'a Field {
        self.signal
    }

    /// The axes.
    #[must_use]
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Classify `field`, returning [`None`] if it is dropped.
    #[must_use]
    pub fn classify(&self, field: &'a Field) -> Option<FieldBinding<'a>> {
        let name = field.name();
        if name == self.signal.name() {
            return Some(self.data_variable(field));
        }
        if self.axes.iter().any(|axis| axis == name) {
            return self.coordinate(field, name);
        }

        let mut malformed_hint = false;
        if let Some(hint) = self.group.index_hint(name) {
            match parse_index_hint(hint).and_then(|i| self.axes.get(i)) {
                Some(axis) => return self.coordinate(field, axis),
                None => {
                    log::warn!(
                        "Field {name} in group {} has a malformed index hint {hint} for {} axes.",
                        self.group.name(),
                        self.axes.len()
                    );
                    malformed_hint = true;
                }
            }
        }

        if field.shape().is_some() && field.shape() == self.signal.shape() {
            return Some(self.data_variable(field));
        }

        if !malformed_hint {
            log::warn!(
                "Field {name} in group {} cannot be classified. Ignoring.",
                self.group.name()
            );
        }
        None
    }

    fn data_variable(&self, field: &'a Field) -> FieldBinding<'a> {
        FieldBinding {
            field,
            role: FieldRole::DataVariable,
            dims: self.axes.clone(),
        }
    }

    fn coordinate(&self, field: &'a Field, dim: &str) -> Option<FieldBinding<'a>> {
        match field.shape() {
            Some(shape) if shape.len() != 1 => {
                log::warn!(
                    "Coordinate {} in group {} has {} dimensions, expected 1. Ignoring.",
                    field.name(),
                    self.group.name(),
                    shape.len()
                );
                None
            }
            _ => Some(FieldBinding {
                field,
                role: FieldRole::Coordinate,
                dims: vec![dim.to_string()],
            }),
        }
    }
}

/// Classify every field of `group`, in field order.
///
/// Returns an empty list if the group lacks a signal or axes declaration.
#[must_use]
pub fn infer_group(group: &Group) -> Vec<FieldBinding<'_>> {
    let Some(inference) = AxisInference::new(group) else {
        return Vec::new();
    };
    group
        .fields()
        .iter()
        .filter_map(|field| inference.classify(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};
    use serde_json::json;

    use super::*;
    use crate::node::Link;

    fn field(name: &str, shape: &[usize]) -> Field {
        Field::new(name, ArrayD::<f64>::zeros(IxDyn(shape)))
    }

    fn group(attributes: serde_json::Value, fields: Vec<Field>) -> Group {
        let mut group = Group::new("data").with_attributes(attributes.as_object().cloned().unwrap());
        for field in fields {
            group.add_field(field);
        }
        group
    }

    fn bindings(group: &Group) -> Vec<(String, FieldRole, Vec<String>)> {
        infer_group(group)
            .into_iter()
            .map(|b| (b.field().name().to_string(), b.role(), b.into_dims()))
            .collect()
    }

    fn dims(dims: &[&str]) -> Vec<String> {
        dims.iter().map(ToString::to_string).collect()
    }

    fn warnings(captured_logs: &[testing_logger::CapturedLog]) -> Vec<String> {
        captured_logs
            .iter()
            .filter(|log| log.level == log::Level::Warn)
            .map(|log| log.body.clone())
            .collect()
    }

    #[test]
    fn axes_parse() {
        assert_eq!(parse_axes(&json!("x")), Some(dims(&["x"])));
        assert_eq!(parse_axes(&json!(["x", "y"])), Some(dims(&["x", "y"])));
        assert_eq!(parse_axes(&json!(["x", 1])), None);
        assert_eq!(parse_axes(&json!(1)), None);
    }

    #[test]
    fn index_hint_parse() {
        assert_eq!(parse_index_hint(&json!(1)), Some(1));
        assert_eq!(parse_index_hint(&json!([0])), Some(0));
        assert_eq!(parse_index_hint(&json!(-1)), None);
        assert_eq!(parse_index_hint(&json!(1.5)), None);
        assert_eq!(parse_index_hint(&json!([0, 1])), None);
        assert_eq!(parse_index_hint(&json!([[0]])), None);
        assert_eq!(parse_index_hint(&json!("0")), None);
    }

    #[test]
    fn axes_classify() {
        let group = group(
            json!({"signal": "counts", "axes": ["x", "y"], "temperature_indices": 1}),
            vec![
                field("counts", &[3, 4]),
                field("x", &[3]),
                field("y", &[4]),
                field("temperature", &[4]),
                field("errors", &[3, 4]),
            ],
        );
        assert_eq!(
            bindings(&group),
            vec![
                ("counts".to_string(), FieldRole::DataVariable, dims(&["x", "y"])),
                ("x".to_string(), FieldRole::Coordinate, dims(&["x"])),
                ("y".to_string(), FieldRole::Coordinate, dims(&["y"])),
                ("temperature".to_string(), FieldRole::Coordinate, dims(&["y"])),
                ("errors".to_string(), FieldRole::DataVariable, dims(&["x", "y"])),
            ]
        );
    }

    #[test]
    fn axes_membership_wins_over_index_hint() {
        let group = group(
            json!({"signal": "counts", "axes": ["x", "y"], "x_indices": 1}),
            vec![field("counts", &[3, 4]), field("x", &[3])],
        );
        assert_eq!(
            bindings(&group)[1],
            ("x".to_string(), FieldRole::Coordinate, dims(&["x"]))
        );
    }

    #[test]
    fn axes_malformed_hint_falls_back_to_shape() {
        testing_logger::setup();
        let group = group(
            json!({"signal": "counts", "axes": ["x", "y"], "errors_indices": 7, "junk_indices": 2}),
            vec![field("counts", &[3, 4]), field("errors", &[3, 4]), field("junk", &[5])],
        );
        assert_eq!(
            bindings(&group),
            vec![
                ("counts".to_string(), FieldRole::DataVariable, dims(&["x", "y"])),
                ("errors".to_string(), FieldRole::DataVariable, dims(&["x", "y"])),
            ]
        );
        testing_logger::validate(|captured_logs| {
            assert_eq!(
                warnings(captured_logs),
                vec![
                    "Field errors in group data has a malformed index hint 7 for 2 axes.",
                    "Field junk in group data has a malformed index hint 2 for 2 axes.",
                ]
            );
        });
    }

    #[test]
    fn axes_unclassified_field() {
        testing_logger::setup();
        let group = group(
            json!({"signal": "signal_field", "axes": ["axis0", "axis1"]}),
            vec![field("signal_field", &[3, 4]), field("axis0", &[3]), field("junk", &[5])],
        );
        assert_eq!(
            bindings(&group)
                .into_iter()
                .map(|(name, _, _)| name)
                .collect::<Vec<_>>(),
            ["signal_field", "axis0"]
        );
        testing_logger::validate(|captured_logs| {
            assert_eq!(
                warnings(captured_logs),
                vec!["Field junk in group data cannot be classified. Ignoring."]
            );
        });
    }

    #[test]
    fn axes_missing_declarations() {
        testing_logger::setup();
        let fields = vec![field("counts", &[3]), field("x", &[3])];
        assert!(bindings(&group(json!({"signal": "counts"}), fields.clone())).is_empty());
        assert!(bindings(&group(json!({"axes": ["x"]}), fields.clone())).is_empty());
        testing_logger::validate(|captured_logs| {
            assert!(warnings(captured_logs).is_empty());
        });
    }

    #[test]
    fn axes_inconsistent_declarations() {
        testing_logger::setup();
        let fields = vec![field("counts", &[3]), field("x", &[3])];
        assert!(bindings(&group(json!({"signal": "missing", "axes": ["x"]}), fields.clone())).is_empty());
        assert!(bindings(&group(json!({"signal": "counts", "axes": ["x", "y"]}), fields.clone())).is_empty());
        assert!(bindings(&group(json!({"signal": "counts", "axes": 3}), fields)).is_empty());
        testing_logger::validate(|captured_logs| {
            assert_eq!(
                warnings(captured_logs),
                vec![
                    "Signal missing of group data is not a field of the group. Ignoring.",
                    "Group data declares 2 axes for signal counts with 1 dimensions. Ignoring.",
                    "Group data has an axes declaration 3 that is not a list of names. Ignoring.",
                ]
            );
        });
    }

    #[test]
    fn axes_single_string() {
        let group = group(
            json!({"signal": "counts", "axes": "x"}),
            vec![field("counts", &[3]), field("x", &[3])],
        );
        assert_eq!(
            bindings(&group),
            vec![
                ("counts".to_string(), FieldRole::DataVariable, dims(&["x"])),
                ("x".to_string(), FieldRole::Coordinate, dims(&["x"])),
            ]
        );
    }

    #[test]
    fn axes_coordinate_not_one_dimensional() {
        testing_logger::setup();
        let group = group(
            json!({"signal": "counts", "axes": ["x", "y"]}),
            vec![field("counts", &[3, 4]), field("x", &[3, 4])],
        );
        assert_eq!(bindings(&group).len(), 1);
        testing_logger::validate(|captured_logs| {
            assert_eq!(
                warnings(captured_logs),
                vec!["Coordinate x in group data has 2 dimensions, expected 1. Ignoring."]
            );
        });
    }

    #[test]
    fn axes_links() {
        let group = group(
            json!({"signal": "counts", "axes": ["x"], "other_indices": 0}),
            vec![
                field("counts", &[3]),
                Field::new("x", Link::new("/entry/instrument/x")),
                Field::new("other", Link::new("/entry/instrument/other")),
                Field::new("sized", Link::new("/entry/instrument/sized").with_shape(Some(vec![3]))),
                Field::new("unsized", Link::new("/entry/instrument/unsized")),
            ],
        );
        assert_eq!(
            bindings(&group)
                .into_iter()
                .map(|(name, role, _)| (name, role))
                .collect::<Vec<_>>(),
            vec![
                ("counts".to_string(), FieldRole::DataVariable),
                ("x".to_string(), FieldRole::Coordinate),
                ("other".to_string(), FieldRole::Coordinate),
                ("sized".to_string(), FieldRole::DataVariable),
            ]
        );
    }
}
