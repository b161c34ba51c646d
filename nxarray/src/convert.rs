//! Conversion between an [`Entry`] and a [`Dataset`].
//!
//! [`to_dataset`] classifies the fields of every group of an entry with [axis inference](crate::axes) and collects them as data variables and coordinates.
//! [`to_entry`] partitions the arrays of a dataset into groups and synthesizes any missing `signal`, `axes`, and `<field>_indices` declarations.
//! Both are pure, in-memory conversions.

mod dataset_to_group;
mod group_to_dataset;

pub use dataset_to_group::{entry_name, to_entry, to_entry_named};
pub use group_to_dataset::to_dataset;

use crate::{dataset::Dataset, node::Entry};

impl From<&Entry> for Dataset {
    fn from(entry: &Entry) -> Self {
        to_dataset(entry)
    }
}

impl From<&Dataset> for Entry {
    fn from(dataset: &Dataset) -> Self {
        to_entry(dataset)
    }
}
