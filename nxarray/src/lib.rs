//! `nxarray` converts between a hierarchical *group tree* and flat *labelled-array datasets*.
//!
//! A group tree ([`node::Root`]) holds named entries, each holding groups of named fields.
//! A group declares its primary field with a `signal` attribute and the dimension names of that field with an `axes` attribute.
//! A dataset ([`dataset::Dataset`]) holds named data variables and coordinates, each a [`dataset::DataArray`] with dimension names and attributes.
//!
//! ## Conversions
//! - [`convert::to_dataset`] classifies every field of every group of an entry with [axis inference](axes) and collects data variables and coordinates.
//!   Fields that cannot be classified are dropped with a warning logged through the [`log`] facade.
//! - [`convert::to_entry`] partitions the arrays of a dataset into groups and synthesizes the `signal`, `axes`, and `<field>_indices` declarations it needs.
//! - [`container::load_all`] and [`container::save_all`] convert every entry of a container.
//!
//! Structural attributes (`signal`, `axes`, `default`, `target`, `nxgroup`, `nxentry`, and `*_indices`) never appear in dataset or array attributes, see [`attributes`].
//! Non-data children of an entry are carried through a round trip unmodified in a [`dataset::SiblingTree`].
//!
//! ## Loading and saving
//! Containers are read and written by a [`codec::TreeCodec`].
//! [`codec::StoreCodec`] stores a container in any store of the [`storage`] crate, such as an in-memory [`storage::store::MemoryStore`].
//!
//! ```
//! # use std::{path::Path, sync::Arc};
//! use nxarray::{codec::{StoreCodec, StoreWriteOptions}, dataset::{DataArray, Dataset}, storage::store::MemoryStore};
//!
//! let dataset = Dataset::new()
//!     .with_data_var("counts", DataArray::new(ndarray::array![1.0, 2.0, 3.0].into_dyn(), vec!["x".into()])?)
//!     .with_coordinate("x", DataArray::new(ndarray::array![0.1, 0.2, 0.3].into_dyn(), vec!["x".into()])?)?;
//!
//! let codec = StoreCodec::new(Arc::new(MemoryStore::new()));
//! nxarray::save_with(&codec, &dataset, Path::new(""), &StoreWriteOptions::default())?;
//! let loaded = nxarray::load_with(&codec, Path::new(""), None)?.into_dataset().unwrap();
//! assert_eq!(loaded.data_vars().get("counts").unwrap().dims(), ["x"]);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! With the default `filesystem` feature, [`load`] and [`save`] read and write a container in a directory.
//!
//! ## Crate Features
//! - `filesystem` (default): re-export `nxarray_filesystem` as [`filesystem`] and enable [`load`], [`load_default`], [`load_tree`], and [`save`].
//!
//! ## Licence
//! `nxarray` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attributes;
pub mod axes;
pub mod codec;
pub mod config;
pub mod container;
pub mod convert;
pub mod dataset;
pub mod link;
pub mod node;

mod io;

#[cfg(feature = "filesystem")]
pub use nxarray_filesystem as filesystem;
pub use nxarray_metadata as metadata;
pub use nxarray_storage as storage;

pub use io::{load_default_with, load_tree_with, load_with, save_with, Loaded, ToRoot};

#[cfg(feature = "filesystem")]
pub use io::{load, load_default, load_tree, save};
