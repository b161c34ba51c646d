//! The labelled-array dataset.
//!
//! A [`Dataset`] holds named data variables and named coordinates, each a [`DataArray`] with dimension names and attributes.
//! A dataset loaded from a container also carries a [`SiblingTree`] that restores the structure of its entry on save.

mod data_array;
mod sibling_tree;
mod variables;

pub use data_array::{ArrayValues, DataArray, DataArrayCreateError};
pub use sibling_tree::{SiblingTree, TreeObject};
pub use variables::Variables;

use nxarray_metadata::Attributes;

/// A labelled-array dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    data_vars: Variables,
    coords: Variables,
    attributes: Attributes,
    tree: Option<SiblingTree>,
}

impl Dataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The data variables, in insertion order.
    #[must_use]
    pub const fn data_vars(&self) -> &Variables {
        &self.data_vars
    }

    /// The coordinates, in insertion order.
    #[must_use]
    pub const fn coords(&self) -> &Variables {
        &self.coords
    }

    /// The dataset attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the dataset attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The sibling tree of the entry the dataset was loaded from.
    #[must_use]
    pub const fn tree(&self) -> Option<&SiblingTree> {
        self.tree.as_ref()
    }

    /// Set the sibling tree.
    pub fn set_tree(&mut self, tree: Option<SiblingTree>) {
        self.tree = tree;
    }

    /// Insert a data variable, returning the variable it replaced.
    pub fn insert_data_var(
        &mut self,
        name: impl Into<String>,
        array: DataArray,
    ) -> Option<DataArray> {
        self.data_vars.insert(name, array)
    }

    /// Insert a coordinate, returning the coordinate it replaced.
    ///
    /// # Errors
    /// Returns [`DataArrayCreateError::CoordinateNotOneDimensional`] if `array` does not have exactly one dimension.
    pub fn insert_coordinate(
        &mut self,
        name: impl Into<String>,
        array: DataArray,
    ) -> Result<Option<DataArray>, DataArrayCreateError> {
        let name = name.into();
        if array.dims().len() != 1 {
            return Err(DataArrayCreateError::CoordinateNotOneDimensional {
                name,
                ndim: array.dims().len(),
            });
        }
        Ok(self.coords.insert(name, array))
    }

    /// Add a data variable.
    #[must_use]
    pub fn with_data_var(mut self, name: impl Into<String>, array: DataArray) -> Self {
        self.insert_data_var(name, array);
        self
    }

    /// Add a coordinate.
    ///
    /// # Errors
    /// See [`Dataset::insert_coordinate`].
    pub fn with_coordinate(
        mut self,
        name: impl Into<String>,
        array: DataArray,
    ) -> Result<Self, DataArrayCreateError> {
        self.insert_coordinate(name, array)?;
        Ok(self)
    }

    /// The dimensions of the dataset with their sizes.
    ///
    /// Dimensions are ordered by first appearance over the data variables, then the coordinates.
    /// The size of a dimension is taken from the first array with a known shape that spans it.
    #[must_use]
    pub fn dims(&self) -> Vec<(String, Option<usize>)> {
        let mut dims: Vec<(String, Option<usize>)> = Vec::new();
        for (_, array) in self.data_vars.iter().chain(self.coords.iter()) {
            let shape = array.shape();
            for (i, dim) in array.dims().iter().enumerate() {
                let size = shape.and_then(|shape| shape.get(i).copied());
                if let Some((_, existing)) = dims.iter_mut().find(|(name, _)| name == dim) {
                    if existing.is_none() {
                        *existing = size;
                    }
                } else {
                    dims.push((dim.clone(), size));
                }
            }
        }
        dims
    }
}
