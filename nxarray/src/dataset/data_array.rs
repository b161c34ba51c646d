use derive_more::From;
use ndarray::ArrayD;
use nxarray_metadata::Attributes;
use thiserror::Error;

use crate::node::Link;

/// The values of a [`DataArray`].
#[derive(Debug, Clone, PartialEq, From)]
pub enum ArrayValues {
    /// Inline N-dimensional data.
    Inline(ArrayD<f64>),
    /// A link to data stored elsewhere in the container.
    Link(Link),
}

/// A labelled array: values, dimension names, and attributes.
///
/// The destination group and the link target are structural and held apart from the user-facing attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    values: ArrayValues,
    dims: Vec<String>,
    attributes: Attributes,
    group: Option<String>,
}

/// A data array creation error.
#[derive(Debug, Error)]
pub enum DataArrayCreateError {
    /// The number of dimension names does not match the dimensionality of the values.
    #[error("{dims} dimension names given for an array with {ndim} dimensions")]
    IncompatibleDimensionality {
        /// The number of dimension names.
        dims: usize,
        /// The dimensionality of the values.
        ndim: usize,
    },
    /// A coordinate must have exactly one dimension.
    #[error("coordinate {name} has {ndim} dimensions, expected 1")]
    CoordinateNotOneDimensional {
        /// The coordinate name.
        name: String,
        /// The number of dimensions.
        ndim: usize,
    },
}

impl DataArray {
    /// Create a data array with inline `values`.
    ///
    /// # Errors
    /// Returns [`DataArrayCreateError::IncompatibleDimensionality`] if the length of `dims` differs from the dimensionality of `values`.
    pub fn new(values: ArrayD<f64>, dims: Vec<String>) -> Result<Self, DataArrayCreateError> {
        if dims.len() != values.ndim() {
            return Err(DataArrayCreateError::IncompatibleDimensionality {
                dims: dims.len(),
                ndim: values.ndim(),
            });
        }
        Ok(Self {
            values: values.into(),
            dims,
            attributes: Attributes::new(),
            group: None,
        })
    }

    /// Create a data array standing for the data at a `link`.
    ///
    /// # Errors
    /// Returns [`DataArrayCreateError::IncompatibleDimensionality`] if the link shape is known and its length differs from the length of `dims`.
    pub fn new_link(link: Link, dims: Vec<String>) -> Result<Self, DataArrayCreateError> {
        if let Some(shape) = link.shape() {
            if shape.len() != dims.len() {
                return Err(DataArrayCreateError::IncompatibleDimensionality {
                    dims: dims.len(),
                    ndim: shape.len(),
                });
            }
        }
        Ok(Self {
            values: link.into(),
            dims,
            attributes: Attributes::new(),
            group: None,
        })
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the destination group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The values.
    #[must_use]
    pub const fn values(&self) -> &ArrayValues {
        &self.values
    }

    /// The inline values, if the array is not a link.
    #[must_use]
    pub fn inline(&self) -> Option<&ArrayD<f64>> {
        match &self.values {
            ArrayValues::Inline(array) => Some(array),
            ArrayValues::Link(_) => None,
        }
    }

    /// The link, if the array stands for data stored elsewhere.
    #[must_use]
    pub fn link(&self) -> Option<&Link> {
        match &self.values {
            ArrayValues::Link(link) => Some(link),
            ArrayValues::Inline(_) => None,
        }
    }

    /// The shape, or [`None`] for a link of unknown shape.
    #[must_use]
    pub fn shape(&self) -> Option<&[usize]> {
        match &self.values {
            ArrayValues::Inline(array) => Some(array.shape()),
            ArrayValues::Link(link) => link.shape(),
        }
    }

    /// The dimension names.
    #[must_use]
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// The user-facing attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the user-facing attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The destination group, i.e. the group the array was loaded from or is written to.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Set the destination group.
    pub fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;

    #[test]
    fn data_array_new() {
        let array = DataArray::new(ArrayD::zeros(IxDyn(&[2, 3])), vec!["x".into(), "y".into()])
            .unwrap()
            .with_group("data");
        assert_eq!(array.shape(), Some(&[2, 3][..]));
        assert_eq!(array.group(), Some("data"));
        assert!(array.link().is_none());
        assert!(matches!(
            DataArray::new(ArrayD::zeros(IxDyn(&[2, 3])), vec!["x".into()]),
            Err(DataArrayCreateError::IncompatibleDimensionality { dims: 1, ndim: 2 })
        ));
    }

    #[test]
    fn data_array_new_link() {
        let link = Link::new("/entry/data/x");
        let array = DataArray::new_link(link.clone(), vec!["x".into()]).unwrap();
        assert_eq!(array.link(), Some(&link));
        assert!(array.inline().is_none());
        assert!(array.shape().is_none());

        let sized = link.with_shape(Some(vec![4, 5]));
        assert!(DataArray::new_link(sized, vec!["x".into()]).is_err());
    }
}
