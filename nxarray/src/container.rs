//! Multi-entry containers.
//!
//! [`load_all`] converts the entries of a [`Root`] to a [`DatasetTree`] of named datasets, and [`save_all`] converts it back.

use nxarray_metadata::Attributes;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde_json::Value;
use thiserror::Error;

use crate::{
    attributes::{split_attributes, DEFAULT},
    codec::CodecError,
    convert::{to_dataset, to_entry_named},
    dataset::Dataset,
    node::{Entry, Root},
};

/// A load error.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The requested entry is not in the container.
    #[error("entry {0} not found")]
    EntryNotFound(String),
    /// The container has no entries.
    #[error("the container has no entries")]
    NoEntries,
    /// A file codec error.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Named datasets converted from the entries of a container, with the attributes of the container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetTree {
    attributes: Attributes,
    default_entry: Option<String>,
    datasets: Vec<(String, Dataset)>,
}

impl DatasetTree {
    /// Create an empty dataset tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a dataset.
    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, dataset: Dataset) -> Self {
        self.insert(name, dataset);
        self
    }

    /// The container attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the container attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The name of the default entry, if declared.
    #[must_use]
    pub fn default_entry(&self) -> Option<&str> {
        self.default_entry.as_deref()
    }

    /// Set the name of the default entry.
    pub fn set_default_entry(&mut self, name: Option<String>) {
        self.default_entry = name;
    }

    /// Insert a dataset, returning the dataset it replaced.
    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) -> Option<Dataset> {
        let name = name.into();
        if let Some((_, existing)) = self.datasets.iter_mut().find(|(n, _)| *n == name) {
            Some(std::mem::replace(existing, dataset))
        } else {
            self.datasets.push((name, dataset));
            None
        }
    }

    /// Returns the dataset named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, dataset)| dataset)
    }

    /// Iterate over the names and datasets, in entry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.datasets
            .iter()
            .map(|(name, dataset)| (name.as_str(), dataset))
    }

    /// Iterate over the names, in entry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|(name, _)| name.as_str())
    }

    /// The number of datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns true if there are no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Consume the tree, returning the named datasets.
    #[must_use]
    pub fn into_datasets(self) -> Vec<(String, Dataset)> {
        self.datasets
    }
}

/// Convert the entries of `root` to datasets.
///
/// If `selector` names an entry, only that entry is converted.
/// Otherwise every entry is converted, in parallel when there is more than one.
///
/// # Errors
/// Returns [`LoadError::EntryNotFound`] if `selector` names an entry that is not in `root`.
pub fn load_all(root: &Root, selector: Option<&str>) -> Result<DatasetTree, LoadError> {
    let (attributes, reserved) = split_attributes(root.attributes());
    let entries: Vec<&Entry> = match selector {
        Some(name) => vec![root
            .entry(name)
            .ok_or_else(|| LoadError::EntryNotFound(name.to_string()))?],
        None => root.entries().iter().collect(),
    };

    let convert = |entry: &&Entry| (entry.name().to_string(), to_dataset(entry));
    let datasets: Vec<(String, Dataset)> = if entries.len() > 1 {
        entries.par_iter().map(convert).collect()
    } else {
        entries.iter().map(convert).collect()
    };

    Ok(DatasetTree {
        attributes,
        default_entry: reserved
            .get(DEFAULT)
            .and_then(Value::as_str)
            .map(ToString::to_string),
        datasets,
    })
}

/// Convert the datasets of `tree` to the entries of a root.
///
/// Each dataset is written to an entry of its name in the tree.
#[must_use]
pub fn save_all(tree: &DatasetTree) -> Root {
    let mut attributes = tree.attributes.clone();
    if let Some(default_entry) = &tree.default_entry {
        attributes.insert(DEFAULT.to_string(), Value::String(default_entry.clone()));
    }
    let entries: Vec<Entry> = tree
        .datasets
        .par_iter()
        .map(|(name, dataset)| to_entry_named(dataset, name))
        .collect();
    let mut root = Root::new().with_attributes(attributes);
    for entry in entries {
        root.add_entry(entry);
    }
    root
}
