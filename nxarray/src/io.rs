//! Load and save datasets through a [`TreeCodec`].
//!
//! The `*_with` functions take any codec.
//! With the `filesystem` feature, [`load`], [`load_default`], [`load_tree`], and [`save`] use a [`FilesystemCodec`](crate::codec::FilesystemCodec).

use std::path::Path;

use derive_more::From;

use crate::{
    codec::{CodecError, TreeCodec},
    container::{load_all, save_all, DatasetTree, LoadError},
    convert::{entry_name, to_dataset, to_entry},
    dataset::Dataset,
    node::Root,
};

/// The result of [`load_with`]: a single dataset or named datasets.
#[derive(Debug, Clone, PartialEq, From)]
pub enum Loaded {
    /// A single dataset.
    Dataset(Box<Dataset>),
    /// Named datasets.
    Tree(DatasetTree),
}

impl Loaded {
    /// Returns the dataset if a single dataset was loaded.
    #[must_use]
    pub fn into_dataset(self) -> Option<Dataset> {
        match self {
            Self::Dataset(dataset) => Some(*dataset),
            Self::Tree(_) => None,
        }
    }

    /// Returns the named datasets.
    ///
    /// A single dataset is named by the entry it was loaded from.
    #[must_use]
    pub fn into_tree(self) -> DatasetTree {
        match self {
            Self::Dataset(dataset) => DatasetTree::new().with_dataset(entry_name(&dataset), *dataset),
            Self::Tree(tree) => tree,
        }
    }
}

/// Conversion to a [`Root`] for saving.
pub trait ToRoot {
    /// Convert to a root.
    fn to_root(&self) -> Root;
}

impl ToRoot for Root {
    fn to_root(&self) -> Root {
        self.clone()
    }
}

impl ToRoot for Dataset {
    fn to_root(&self) -> Root {
        Root::new().with_entry(to_entry(self))
    }
}

impl ToRoot for DatasetTree {
    fn to_root(&self) -> Root {
        save_all(self)
    }
}

impl ToRoot for Loaded {
    fn to_root(&self) -> Root {
        match self {
            Self::Dataset(dataset) => dataset.to_root(),
            Self::Tree(tree) => tree.to_root(),
        }
    }
}

/// Load the container at `path` with `codec`.
///
/// Returns a single dataset if `entry_name` is given or the container has exactly one entry, otherwise the named datasets of every entry.
///
/// # Errors
/// Returns [`LoadError::EntryNotFound`] if `entry_name` is not an entry of the container, or [`LoadError::Codec`] if the container cannot be read.
pub fn load_with<C: TreeCodec + ?Sized>(
    codec: &C,
    path: &Path,
    entry_name: Option<&str>,
) -> Result<Loaded, LoadError> {
    let root = codec.open(path)?;
    let entry = match (entry_name, root.entries()) {
        (Some(name), _) => root
            .entry(name)
            .ok_or_else(|| LoadError::EntryNotFound(name.to_string()))?,
        (None, [entry]) => entry,
        (None, _) => return Ok(load_all(&root, None)?.into()),
    };
    Ok(Box::new(to_dataset(entry)).into())
}

/// Load the default entry of the container at `path` with `codec`.
///
/// See [`Root::default_entry`].
///
/// # Errors
/// Returns [`LoadError::NoEntries`] if the container has no entries, or [`LoadError::Codec`] if the container cannot be read.
pub fn load_default_with<C: TreeCodec + ?Sized>(
    codec: &C,
    path: &Path,
) -> Result<Dataset, LoadError> {
    let root = codec.open(path)?;
    let entry = root.default_entry().ok_or(LoadError::NoEntries)?;
    Ok(to_dataset(entry))
}

/// Load the entries of the container at `path` with `codec` as named datasets.
///
/// See [`load_all`].
///
/// # Errors
/// Returns [`LoadError::EntryNotFound`] if `selector` is not an entry of the container, or [`LoadError::Codec`] if the container cannot be read.
pub fn load_tree_with<C: TreeCodec + ?Sized>(
    codec: &C,
    path: &Path,
    selector: Option<&str>,
) -> Result<DatasetTree, LoadError> {
    load_all(&codec.open(path)?, selector)
}

/// Save `data` to the container at `path` with `codec`.
///
/// `options` are forwarded to the codec unchanged.
///
/// # Errors
/// Returns the [`CodecError`] of the codec unchanged.
pub fn save_with<C: TreeCodec + ?Sized, T: ToRoot + ?Sized>(
    codec: &C,
    data: &T,
    path: &Path,
    options: &C::WriteOptions,
) -> Result<(), CodecError> {
    codec.write(&data.to_root(), path, options)
}

#[cfg(feature = "filesystem")]
mod filesystem {
    use std::path::Path;

    use super::{load_default_with, load_tree_with, load_with, save_with, Loaded, ToRoot};
    use crate::{
        codec::{CodecError, FilesystemCodec, StoreWriteOptions},
        container::{DatasetTree, LoadError},
        dataset::Dataset,
    };

    /// Load the container in the directory at `path`.
    ///
    /// See [`load_with`].
    ///
    /// # Errors
    /// See [`load_with`].
    pub fn load(path: impl AsRef<Path>, entry_name: Option<&str>) -> Result<Loaded, LoadError> {
        load_with(&FilesystemCodec, path.as_ref(), entry_name)
    }

    /// Load the default entry of the container in the directory at `path`.
    ///
    /// # Errors
    /// See [`load_default_with`].
    pub fn load_default(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
        load_default_with(&FilesystemCodec, path.as_ref())
    }

    /// Load every entry of the container in the directory at `path`.
    ///
    /// # Errors
    /// See [`load_tree_with`].
    pub fn load_tree(path: impl AsRef<Path>) -> Result<DatasetTree, LoadError> {
        load_tree_with(&FilesystemCodec, path.as_ref(), None)
    }

    /// Save `data` to the container in the directory at `path`.
    ///
    /// Default [`StoreWriteOptions`] are used if `options` is [`None`].
    ///
    /// # Errors
    /// See [`save_with`].
    pub fn save<T: ToRoot + ?Sized>(
        data: &T,
        path: impl AsRef<Path>,
        options: Option<StoreWriteOptions>,
    ) -> Result<(), CodecError> {
        save_with(
            &FilesystemCodec,
            data,
            path.as_ref(),
            &options.unwrap_or_default(),
        )
    }
}

#[cfg(feature = "filesystem")]
pub use filesystem::{load, load_default, load_tree, save};
