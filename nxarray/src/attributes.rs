//! Attribute filtering.
//!
//! Group, field, and entry attributes share one namespace with the structural keys that declare the signal, the axes, index hints, link targets, and destination hints.
//! Structural keys are consumed by the conversions and never exposed through user-facing [`Attributes`].

use nxarray_metadata::Attributes;

/// The group attribute naming the primary field.
pub const SIGNAL: &str = "signal";

/// The group attribute listing the dimension names of the signal.
pub const AXES: &str = "axes";

/// The root or entry attribute naming the default child.
pub const DEFAULT: &str = "default";

/// The attribute holding a link target path.
pub const TARGET: &str = "target";

/// The array attribute naming the group an array is written to.
pub const GROUP_HINT: &str = "nxgroup";

/// The dataset attribute naming the entry a dataset is written to.
pub const ENTRY_HINT: &str = "nxentry";

/// The suffix of a group attribute binding a field to a position in the axes.
pub const INDICES_SUFFIX: &str = "_indices";

/// Returns the index hint key of the field `name`, e.g. `x_indices`.
#[must_use]
pub fn indices_key(name: &str) -> String {
    format!("{name}{INDICES_SUFFIX}")
}

/// A set of reserved attribute keys.
///
/// A key is reserved if it equals one of the exact keys or ends with one of the suffixes.
/// Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedKeys {
    exact: &'static [&'static str],
    suffixes: &'static [&'static str],
}

impl ReservedKeys {
    /// The structural keys consumed by the conversions.
    pub const STRUCTURAL: Self = Self::new(
        &[SIGNAL, AXES, DEFAULT, TARGET, GROUP_HINT, ENTRY_HINT],
        &[INDICES_SUFFIX],
    );

    /// No reserved keys.
    pub const NONE: Self = Self::new(&[], &[]);

    /// Create a set of reserved keys.
    #[must_use]
    pub const fn new(exact: &'static [&'static str], suffixes: &'static [&'static str]) -> Self {
        Self { exact, suffixes }
    }

    /// Returns true if `key` is reserved.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.exact.contains(&key) || self.suffixes.iter().any(|suffix| key.ends_with(suffix))
    }
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self::STRUCTURAL
    }
}

/// Copy every attribute of `source` that is not in `reserved` into `destination`.
///
/// Keys are copied in the order of `source`.
/// An existing key of `destination` is overwritten in place.
pub fn copy_attributes(source: &Attributes, destination: &mut Attributes, reserved: &ReservedKeys) {
    for (key, value) in source {
        if !reserved.contains(key) {
            destination.insert(key.clone(), value.clone());
        }
    }
}

/// Returns the attributes of `source` excluding [`ReservedKeys::STRUCTURAL`].
#[must_use]
pub fn filter_attributes(source: &Attributes) -> Attributes {
    let mut attributes = Attributes::new();
    copy_attributes(source, &mut attributes, &ReservedKeys::STRUCTURAL);
    attributes
}

/// Split `source` into its user attributes and its [`ReservedKeys::STRUCTURAL`] attributes.
#[must_use]
pub fn split_attributes(source: &Attributes) -> (Attributes, Attributes) {
    source
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .partition(|(key, _)| !ReservedKeys::STRUCTURAL.contains(key))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attributes(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn reserved_keys() {
        let reserved = ReservedKeys::STRUCTURAL;
        for key in ["signal", "axes", "default", "target", "nxgroup", "nxentry", "x_indices"] {
            assert!(reserved.contains(key), "{key}");
        }
        for key in ["Signal", "units", "indices", "long_name", "axes_names"] {
            assert!(!reserved.contains(key), "{key}");
        }
        assert!(!ReservedKeys::NONE.contains("signal"));
    }

    #[test]
    fn copy_attributes_excludes_reserved() {
        let source = attributes(json!({
            "signal": "counts",
            "units": "mm",
            "x_indices": 0,
            "long_name": "distance",
        }));
        let mut destination = attributes(json!({"units": "m", "title": "scan"}));
        copy_attributes(&source, &mut destination, &ReservedKeys::STRUCTURAL);
        assert_eq!(
            destination,
            attributes(json!({"units": "mm", "title": "scan", "long_name": "distance"}))
        );
        assert_eq!(
            destination.keys().collect::<Vec<_>>(),
            ["units", "title", "long_name"]
        );
    }

    #[test]
    fn split_attributes_partitions() {
        let source = attributes(json!({"default": "data", "title": "scan", "nxentry": "e"}));
        let (user, reserved) = split_attributes(&source);
        assert_eq!(user, attributes(json!({"title": "scan"})));
        assert_eq!(reserved, attributes(json!({"default": "data", "nxentry": "e"})));
        assert_eq!(filter_attributes(&source), user);
    }

    #[test]
    fn indices_key_suffix() {
        assert_eq!(indices_key("x"), "x_indices");
        assert!(ReservedKeys::STRUCTURAL.contains(&indices_key("two_theta")));
    }
}
